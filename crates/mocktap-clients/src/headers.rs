//! Conversions between `http` header maps and the core [`Headers`] type,
//! shared by both adapters.

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Response};
use mocktap_core::{AdapterError, Headers, MockResponse, MOCK_MARKER_HEADER};

/// Marker placed in the extensions of synthesized responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mocked {
    pub marker: String,
}

/// Copy a header map, skipping values that are not valid UTF-8.
pub fn headers_from_map(map: &HeaderMap) -> Headers {
    map.iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
        .collect()
}

/// Body bytes as text; bytes that are not UTF-8 yield an empty body.
pub fn body_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Response body is not UTF-8, recording empty body");
            String::new()
        }
    }
}

/// Build an `http::Response` for an override, tagged with `marker`.
pub fn build_mock_response<B>(
    mock: &MockResponse,
    marker: &str,
    body: B,
) -> Result<Response<B>, AdapterError> {
    let mut response = Response::new(body);
    *response.status_mut() = http::StatusCode::from_u16(mock.code().as_u16())
        .map_err(|e| AdapterError::Build(e.to_string()))?;

    let headers = response.headers_mut();
    for (name, value) in mock.headers().iter() {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            AdapterError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| AdapterError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        headers.append(name, value);
    }

    let marker_value = HeaderValue::from_str(marker).map_err(|e| AdapterError::InvalidHeader {
        name: MOCK_MARKER_HEADER.to_string(),
        reason: e.to_string(),
    })?;
    headers.insert(MOCK_MARKER_HEADER, marker_value);

    response.extensions_mut().insert(Mocked {
        marker: marker.to_owned(),
    });
    Ok(response)
}

/// `true` if the response was synthesized from an override.
pub fn is_mocked<B>(response: &Response<B>) -> bool {
    response.extensions().get::<Mocked>().is_some()
        || response.headers().contains_key(MOCK_MARKER_HEADER)
}
