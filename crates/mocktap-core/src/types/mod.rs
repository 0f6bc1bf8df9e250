//! Core value types: request identity, headers, responses and exchange data.

pub mod exchange;
pub mod headers;
pub mod identity;
pub mod response;
