//! Core of the mocktap HTTP response mocker.
//!
//! Records real responses of outbound HTTP calls and substitutes
//! caller-defined overrides for later calls to the same method and path:
//! - [`types`]: Request identity, headers and response records
//! - [`mocks`]: The shared [`CacheRepository`] and the per-client [`MockingEngine`]
//! - [`adapter`]: The [`ClientAdapter`] interface implemented once per HTTP client
//! - [`config`]: Engine settings and config file loading

pub mod adapter;
pub mod config;
pub mod error;
pub mod mocks;
pub mod types;

pub use adapter::{ClientAdapter, DEFAULT_MOCK_MARKER, MOCK_MARKER_HEADER};
pub use config::{CachePolicy, MockerConfig};
pub use error::{AdapterError, ValidationError};
pub use mocks::{CacheRepository, CacheSnapshot, MockingEngine};
pub use types::exchange::{RequestData, ResponseData};
pub use types::headers::Headers;
pub use types::identity::{path_from_url, RequestIdentity};
pub use types::response::{
    EffectiveResponse, MockResponse, MockResponseBuilder, RealResponse, ResponseRecord, StatusCode,
};
