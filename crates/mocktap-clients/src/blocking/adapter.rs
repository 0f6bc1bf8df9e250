//! Adapter for the blocking client's `http::Request<Vec<u8>>` /
//! `http::Response<Vec<u8>>` pair.

use crate::blocking::{BlockingRequest, BlockingResponse};
use crate::headers::{body_text, build_mock_response, headers_from_map};
use mocktap_core::{
    path_from_url, AdapterError, ClientAdapter, MockResponse, RequestData, ResponseData,
    DEFAULT_MOCK_MARKER,
};

#[derive(Debug, Clone)]
pub struct HttpAdapter {
    marker: String,
}

impl HttpAdapter {
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

impl Default for HttpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientAdapter for HttpAdapter {
    type Request = BlockingRequest;
    type Response = BlockingResponse;

    fn extract_request_data(&self, request: &BlockingRequest) -> RequestData {
        let uri = request.uri();
        RequestData {
            method: request.method().as_str().to_ascii_uppercase(),
            path: path_from_url(&uri.to_string()),
            url: uri.to_string(),
            headers: headers_from_map(request.headers()),
        }
    }

    fn extract_response_data(&self, response: &BlockingResponse) -> ResponseData {
        ResponseData {
            code: response.status().as_u16(),
            body: body_text(response.body()),
            headers: headers_from_map(response.headers()),
            is_successful: response.status().is_success(),
        }
    }

    fn create_mock_response(
        &self,
        _request: &BlockingRequest,
        mock: &MockResponse,
    ) -> Result<BlockingResponse, AdapterError> {
        build_mock_response(mock, &self.marker, mock.body().as_bytes().to_vec())
    }
}
