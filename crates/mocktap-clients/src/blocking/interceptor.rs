//! Interceptor wiring the mocking engine into the blocking client.

use crate::blocking::adapter::HttpAdapter;
use crate::blocking::chain::{Chain, Interceptor};
use crate::blocking::{BlockingResponse, CallError};
use mocktap_core::{CacheRepository, MockerConfig, MockingEngine};
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves overrides from the repository and records real responses.
///
/// When an override exists the calling thread blocks for its delay and the
/// synthesized response is returned without touching the network.
pub struct MockInterceptor {
    engine: Arc<MockingEngine<HttpAdapter>>,
}

impl MockInterceptor {
    /// Interceptor driving an existing engine
    pub fn new(engine: Arc<MockingEngine<HttpAdapter>>) -> Self {
        Self { engine }
    }

    /// Interceptor whose adapter uses the marker from `config`.
    pub fn from_config(repository: Arc<CacheRepository>, config: MockerConfig) -> Self {
        let adapter = HttpAdapter::with_marker(config.mock_marker.clone());
        Self::new(Arc::new(MockingEngine::new(adapter, repository, config)))
    }

    /// Engine behind this interceptor
    pub fn engine(&self) -> &Arc<MockingEngine<HttpAdapter>> {
        &self.engine
    }
}

impl Interceptor for MockInterceptor {
    fn intercept(&self, chain: &mut Chain<'_>) -> Result<BlockingResponse, CallError> {
        if let Some(mock) = self.engine.get_mock_data(chain.request()) {
            chain.call().sleep(mock.delay())?;

            match self.engine.create_mock_response(chain.request(), &mock) {
                Ok(response) => {
                    debug!(uri = %chain.request().uri(), status = mock.code().as_u16(), "Serving mocked response");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(uri = %chain.request().uri(), error = %e, "Mocked response unavailable, falling back to network");
                }
            }
        }

        let response = chain.proceed()?;
        self.engine.cache_response(chain.request(), &response);
        Ok(response)
    }
}
