//! Blocking client pipeline.
//!
//! Requests run on the calling thread through an ordered list of
//! [`Interceptor`]s ending in a [`Transport`]. [`MockInterceptor`] connects
//! the pipeline to the shared response cache. `reqwest::blocking::Client`
//! implements [`Transport`] for real network calls.

pub mod adapter;
pub mod call;
pub mod chain;
pub mod interceptor;
pub mod transport;

pub use adapter::HttpAdapter;
pub use call::CallHandle;
pub use chain::{
    BlockingClient, BlockingClientBuilder, Chain, FnTransport, Interceptor, PendingCall, Transport,
};
pub use interceptor::MockInterceptor;

use thiserror::Error;

pub type BlockingRequest = http::Request<Vec<u8>>;
pub type BlockingResponse = http::Response<Vec<u8>>;

/// Failure of a blocking call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The call was canceled through its [`CallHandle`]
    #[error("call canceled")]
    Canceled,
    /// The transport could not complete the exchange
    #[error("transport error: {0}")]
    Transport(String),
}
