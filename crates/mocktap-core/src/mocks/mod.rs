//! Mocking core.
//!
//! This module provides the shared response cache and the engine that drives it:
//! - [`CacheRepository`]: Stores real responses and mock overrides keyed by request identity
//! - [`MockingEngine`]: Connects one HTTP client adapter to the shared repository

pub mod engine;
pub mod repository;

pub use engine::MockingEngine;
pub use repository::{CacheRepository, CacheSnapshot};
