//! `tower` middleware serving overrides in front of a `reqwest` service.

use crate::async_client::adapter::{buffer, into_reqwest, ReqwestAdapter};
use futures::future::BoxFuture;
use mocktap_core::{CacheRepository, MockerConfig, MockingEngine};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};
use tracing::{debug, warn};

/// Wraps a service with [`MockingService`].
#[derive(Debug, Clone)]
pub struct MockingLayer {
    engine: Arc<MockingEngine<ReqwestAdapter>>,
}

impl MockingLayer {
    /// Layer driving an existing engine
    pub fn new(engine: Arc<MockingEngine<ReqwestAdapter>>) -> Self {
        Self { engine }
    }

    /// Layer whose adapter uses the marker from `config`.
    pub fn from_config(repository: Arc<CacheRepository>, config: MockerConfig) -> Self {
        let adapter = ReqwestAdapter::with_marker(config.mock_marker.clone());
        Self::new(Arc::new(MockingEngine::new(adapter, repository, config)))
    }

    /// Engine shared by every service this layer produces
    pub fn engine(&self) -> &Arc<MockingEngine<ReqwestAdapter>> {
        &self.engine
    }
}

impl<S> Layer<S> for MockingLayer {
    type Service = MockingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockingService {
            inner,
            engine: Arc::clone(&self.engine),
        }
    }
}

/// Answers overridden requests itself, after suspending the task for the
/// override's delay. Other requests go to `inner`.
///
/// Only responses the cache will record are buffered; everything else,
/// streaming bodies included, reaches the caller untouched.
#[derive(Debug, Clone)]
pub struct MockingService<S> {
    inner: S,
    engine: Arc<MockingEngine<ReqwestAdapter>>,
}

impl<S> MockingService<S>
where
    S: Service<reqwest::Request, Response = reqwest::Response, Error = reqwest::Error>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    /// Send one request through a clone of this service.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error> {
        self.clone().oneshot(request).await
    }
}

impl<S> Service<reqwest::Request> for MockingService<S>
where
    S: Service<reqwest::Request, Response = reqwest::Response, Error = reqwest::Error>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = BoxFuture<'static, Result<reqwest::Response, reqwest::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: reqwest::Request) -> Self::Future {
        // The readied service goes into the future; a fresh clone stays behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let engine = Arc::clone(&self.engine);

        Box::pin(async move {
            if !engine.config().enabled {
                return inner.call(request).await;
            }

            if let Some(mock) = engine.get_mock_data(&request) {
                if !mock.delay().is_zero() {
                    tokio::time::sleep(mock.delay()).await;
                }

                match engine.create_mock_response(&request, &mock) {
                    Ok(response) => {
                        debug!(url = %request.url(), status = mock.code().as_u16(), "Serving mocked response");
                        return Ok(into_reqwest(response, request.url().clone()));
                    }
                    Err(e) => {
                        warn!(url = %request.url(), error = %e, "Mocked response unavailable, falling back to network");
                    }
                }
            }

            let mut head = reqwest::Request::new(request.method().clone(), request.url().clone());
            *head.headers_mut() = request.headers().clone();

            let response = inner.call(request).await?;
            if !engine.will_cache(&head, response.status().as_u16()) {
                return Ok(response);
            }

            let url = response.url().clone();
            let buffered = buffer(response).await?;
            engine.cache_response(&head, &buffered);
            Ok(into_reqwest(buffered, url))
        })
    }
}
