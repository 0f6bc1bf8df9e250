//! Request identity: the (method, path) key of the response cache.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Identifies a mockable endpoint.
///
/// Hosts and query strings are not part of the identity, so
/// `GET /users?page=1` and `GET /users?page=2` share one cache record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity", into = "RawIdentity")]
pub struct RequestIdentity {
    method: String,
    path: String,
}

impl RequestIdentity {
    /// Create a validated identity.
    ///
    /// `method` must consist of upper-case ASCII letters only and `path` must
    /// start with `/`.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Result<Self, ValidationError> {
        let method = method.into();
        let path = path.into();

        if method.trim().is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidMethod(method));
        }
        if path.trim().is_empty() || !path.starts_with('/') {
            return Err(ValidationError::InvalidPath(path));
        }

        Ok(Self { method, path })
    }

    /// HTTP method, upper-case
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path, without query or fragment
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RequestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Serialize, Deserialize)]
struct RawIdentity {
    method: String,
    path: String,
}

impl TryFrom<RawIdentity> for RequestIdentity {
    type Error = ValidationError;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        RequestIdentity::new(raw.method, raw.path)
    }
}

impl From<RequestIdentity> for RawIdentity {
    fn from(identity: RequestIdentity) -> Self {
        Self {
            method: identity.method,
            path: identity.path,
        }
    }
}

/// Base for resolving relative references such as `/a?b=1`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Normalized path of a URL, absolute or relative.
///
/// Scheme, authority, query and fragment are dropped and dot-segments are
/// resolved, so every adapter derives the same path for the same target. An
/// empty path becomes `/`. Input that is not a URL at all is returned without
/// its query and fragment and left to identity validation.
pub fn path_from_url(url: &str) -> String {
    let parsed = Url::parse(url).or_else(|_| Url::parse(RELATIVE_BASE)?.join(url));

    match parsed {
        Ok(parsed) if !parsed.cannot_be_a_base() => match parsed.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        },
        _ => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}
