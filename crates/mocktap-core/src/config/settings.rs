//! Engine settings.

use crate::adapter::DEFAULT_MOCK_MARKER;
use serde::{Deserialize, Serialize};

/// Which completed real responses are recorded in the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Only 2xx responses
    #[default]
    SuccessfulOnly,
    /// Every completed response, whatever its status
    AllResponses,
}

impl CachePolicy {
    /// Whether a completed response is recorded; `successful` is the
    /// adapter's verdict on the response.
    pub fn admits(self, successful: bool) -> bool {
        match self {
            CachePolicy::SuccessfulOnly => successful,
            CachePolicy::AllResponses => true,
        }
    }
}

/// Mocking engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockerConfig {
    /// Master switch; when off, no request is mocked or cached
    pub enabled: bool,
    /// Which real responses get cached
    pub cache_policy: CachePolicy,
    /// Marker value attached to synthesized responses
    pub mock_marker: String,
}

impl Default for MockerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_policy: CachePolicy::default(),
            mock_marker: DEFAULT_MOCK_MARKER.to_string(),
        }
    }
}
