//! Adapter for `reqwest`.
//!
//! Responses are handled in buffered form, `http::Response<Bytes>`, so the
//! engine can read the body and the caller still receives all of it.

use crate::headers::{body_text, build_mock_response, headers_from_map};
use bytes::Bytes;
use mocktap_core::{
    path_from_url, AdapterError, ClientAdapter, MockResponse, RequestData, ResponseData,
    DEFAULT_MOCK_MARKER,
};
use reqwest::{ResponseBuilderExt, Url};
use tracing::warn;

pub type BufferedResponse = http::Response<Bytes>;

#[derive(Debug, Clone)]
pub struct ReqwestAdapter {
    marker: String,
}

impl ReqwestAdapter {
    /// Adapter using the default mock marker
    pub fn new() -> Self {
        Self::with_marker(DEFAULT_MOCK_MARKER)
    }

    /// Adapter tagging synthesized responses with `marker`.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for ReqwestAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientAdapter for ReqwestAdapter {
    type Request = reqwest::Request;
    type Response = BufferedResponse;

    fn extract_request_data(&self, request: &reqwest::Request) -> RequestData {
        let url = request.url();
        RequestData {
            method: request.method().as_str().to_ascii_uppercase(),
            path: path_from_url(url.as_str()),
            url: url.to_string(),
            headers: headers_from_map(request.headers()),
        }
    }

    fn extract_response_data(&self, response: &BufferedResponse) -> ResponseData {
        ResponseData {
            code: response.status().as_u16(),
            body: body_text(response.body()),
            headers: headers_from_map(response.headers()),
            is_successful: response.status().is_success(),
        }
    }

    fn create_mock_response(
        &self,
        _request: &reqwest::Request,
        mock: &MockResponse,
    ) -> Result<BufferedResponse, AdapterError> {
        build_mock_response(mock, &self.marker, Bytes::from(mock.body().to_owned()))
    }
}

/// Read the whole body of a real response.
pub(crate) async fn buffer(response: reqwest::Response) -> Result<BufferedResponse, reqwest::Error> {
    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    let mut buffered = http::Response::new(body);
    *buffered.status_mut() = status;
    *buffered.version_mut() = version;
    *buffered.headers_mut() = headers;
    Ok(buffered)
}

/// Turn a buffered response back into a `reqwest::Response` reporting `url`.
pub(crate) fn into_reqwest(response: BufferedResponse, url: Url) -> reqwest::Response {
    let (mut parts, body) = response.into_parts();
    match http::Response::builder().url(url).body(()) {
        Ok(carrier) => parts.extensions.extend(carrier.into_parts().0.extensions),
        Err(e) => warn!(error = %e, "Could not attach url to response"),
    }
    reqwest::Response::from(http::Response::from_parts(parts, body))
}
