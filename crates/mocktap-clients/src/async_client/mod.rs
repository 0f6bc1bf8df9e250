//! Async client integration.
//!
//! [`MockingLayer`] wraps any `tower` service speaking `reqwest`'s request and
//! response types, `reqwest::Client` included. Override delays suspend only
//! the calling task; dropping the future abandons the call.

pub mod adapter;
pub mod layer;

pub use adapter::{BufferedResponse, ReqwestAdapter};
pub use layer::{MockingLayer, MockingService};
