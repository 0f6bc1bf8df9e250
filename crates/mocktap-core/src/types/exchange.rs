//! Client-neutral request and response data produced by adapters.

use crate::error::ValidationError;
use crate::types::headers::Headers;
use crate::types::identity::RequestIdentity;

/// Request data extracted from a native client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestData {
    pub method: String,
    pub path: String,
    pub url: String,
    pub headers: Headers,
}

impl RequestData {
    /// Cache key for this request.
    pub fn identity(&self) -> Result<RequestIdentity, ValidationError> {
        RequestIdentity::new(self.method.clone(), self.path.clone())
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

/// Response data extracted from a native client response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseData {
    pub code: u16,
    pub body: String,
    pub headers: Headers,
    pub is_successful: bool,
}
