//! HTTP client integrations for mocktap.
//!
//! - [`blocking`]: An interceptor chain running on the calling thread, with
//!   [`MockInterceptor`] serving overrides
//! - [`async_client`]: A `tower` layer for `reqwest`
//!
//! Both sides share one [`CacheRepository`], so an override registered once
//! applies to every client:
//!
//! ```no_run
//! use mocktap_clients::{BlockingClient, FnTransport, MockInterceptor, MockingLayer};
//! use mocktap_core::{CacheRepository, MockerConfig};
//! use std::sync::Arc;
//! use tower::Layer;
//!
//! let repository = Arc::new(CacheRepository::new());
//!
//! let blocking = BlockingClient::builder(FnTransport::new(|_req: &_| todo!()))
//!     .interceptor(MockInterceptor::from_config(Arc::clone(&repository), MockerConfig::default()))
//!     .build();
//!
//! let service = MockingLayer::from_config(Arc::clone(&repository), MockerConfig::default())
//!     .layer(reqwest::Client::new());
//! ```

pub mod async_client;
pub mod blocking;
pub mod headers;

pub use async_client::{MockingLayer, MockingService, ReqwestAdapter};
pub use blocking::{
    BlockingClient, BlockingRequest, BlockingResponse, CallError, CallHandle, FnTransport,
    HttpAdapter, Interceptor, MockInterceptor,
};
pub use headers::{is_mocked, Mocked};
pub use mocktap_core::CacheRepository;
