//! Response records: real responses, mock overrides and the effective view.

use crate::error::ValidationError;
use crate::types::headers::Headers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// HTTP status code in `100..=599`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct StatusCode(u16);

impl StatusCode {
    /// Validate a raw status code
    pub fn new(code: u16) -> Result<Self, ValidationError> {
        Self::try_from(i64::from(code))
    }

    /// Raw numeric code
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// `true` for 2xx codes
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl TryFrom<i64> for StatusCode {
    type Error = ValidationError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        if (100..=599).contains(&code) {
            Ok(Self(code as u16))
        } else {
            Err(ValidationError::InvalidStatus(code))
        }
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response captured from a live network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealResponse {
    pub code: StatusCode,
    pub body: String,
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
}

impl RealResponse {
    /// Create a real response without headers
    pub fn new(code: u16, body: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            code: StatusCode::new(code)?,
            body: body.into(),
            headers: Headers::new(),
        })
    }

    /// Replace the response headers
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// Lower-case names of headers tied to one particular transfer of a body.
const TRANSFER_HEADERS: &[&str] = &[
    "connection",
    "content-encoding",
    "content-length",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Caller-defined response substituted for the real one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MockResponseBuilder", into = "MockResponseBuilder")]
pub struct MockResponse {
    code: StatusCode,
    body: String,
    delay: Duration,
    headers: Headers,
}

impl MockResponse {
    /// Start building an override with the given status code.
    pub fn builder(code: u16) -> MockResponseBuilder {
        MockResponseBuilder {
            code: i64::from(code),
            ..MockResponseBuilder::default()
        }
    }

    /// Override seeded from a real response, with no delay.
    ///
    /// Framing and hop-by-hop headers are left out; they describe the real
    /// transfer and go stale once the body is edited.
    pub fn from_real(real: &RealResponse) -> Self {
        Self {
            code: real.code,
            body: real.body.clone(),
            delay: Duration::ZERO,
            headers: real
                .headers
                .iter()
                .filter(|(name, _)| !TRANSFER_HEADERS.contains(name))
                .collect(),
        }
    }

    /// Status code to serve
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// Body to serve
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Simulated latency to apply before the response is returned.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Headers to serve, without the mock marker
    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

/// Builder for [`MockResponse`]; validation happens in [`build`](Self::build).
///
/// Also the serialized shape of an override, so that overrides read from
/// config files or a UI pass through the same checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockResponseBuilder {
    code: i64,
    #[serde(default)]
    body: String,
    #[serde(default, rename = "delay")]
    delay_ms: i64,
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    headers: Headers,
}

impl MockResponseBuilder {
    /// Set the response body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Delay in milliseconds; negative values are rejected by `build`.
    pub fn delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Append one header value
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace all headers
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Validate the code and delay and build the override
    pub fn build(self) -> Result<MockResponse, ValidationError> {
        let code = StatusCode::try_from(self.code)?;
        if self.delay_ms < 0 {
            return Err(ValidationError::NegativeDelay(self.delay_ms));
        }

        Ok(MockResponse {
            code,
            body: self.body,
            delay: Duration::from_millis(self.delay_ms as u64),
            headers: self.headers,
        })
    }
}

impl TryFrom<MockResponseBuilder> for MockResponse {
    type Error = ValidationError;

    fn try_from(builder: MockResponseBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<MockResponse> for MockResponseBuilder {
    fn from(mock: MockResponse) -> Self {
        Self {
            code: i64::from(mock.code.as_u16()),
            body: mock.body,
            delay_ms: i64::try_from(mock.delay.as_millis()).unwrap_or(i64::MAX),
            headers: mock.headers,
        }
    }
}

/// One cache entry: the real response plus an optional override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub real: RealResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<MockResponse>,
}

impl ResponseRecord {
    /// Record holding only a real response
    pub fn new(real: RealResponse) -> Self {
        Self { real, mock: None }
    }

    /// `true` if an override is set
    pub fn is_mocked(&self) -> bool {
        self.mock.is_some()
    }

    /// Override if present, else the real response.
    pub fn effective(&self) -> EffectiveResponse<'_> {
        match &self.mock {
            Some(mock) => EffectiveResponse {
                code: mock.code,
                body: &mock.body,
                headers: &mock.headers,
                delay: mock.delay,
                mocked: true,
            },
            None => EffectiveResponse {
                code: self.real.code,
                body: &self.real.body,
                headers: &self.real.headers,
                delay: Duration::ZERO,
                mocked: false,
            },
        }
    }
}

/// Borrowed view of the response a record currently stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveResponse<'a> {
    pub code: StatusCode,
    pub body: &'a str,
    pub headers: &'a Headers,
    pub delay: Duration,
    pub mocked: bool,
}
