//! Adapter interface between a native HTTP client and the engine.

use crate::error::AdapterError;
use crate::types::exchange::{RequestData, ResponseData};
use crate::types::response::MockResponse;

/// Default marker text attached to synthesized responses.
pub const DEFAULT_MOCK_MARKER: &str = "Mocked response";

/// Header carrying the marker on synthesized responses.
pub const MOCK_MARKER_HEADER: &str = "x-mocktap";

/// Translates one HTTP client's native request/response types to and from
/// the engine's neutral model.
///
/// Implemented once per client library. Which native types an adapter
/// handles is fixed by its associated types.
pub trait ClientAdapter: Send + Sync {
    type Request;
    type Response;

    /// Method, path, url and headers of a native request.
    ///
    /// Must not fail for a well-formed request. The method is upper-cased and
    /// header extraction is best-effort.
    fn extract_request_data(&self, request: &Self::Request) -> RequestData;

    /// Status, body, headers and success flag of a native response.
    ///
    /// Reading the body must leave the response usable by the caller. An
    /// unreadable body is reported as an empty one.
    fn extract_response_data(&self, response: &Self::Response) -> ResponseData;

    /// Build a native response carrying the override, tagged with the mock marker.
    fn create_mock_response(
        &self,
        request: &Self::Request,
        mock: &MockResponse,
    ) -> Result<Self::Response, AdapterError>;
}
