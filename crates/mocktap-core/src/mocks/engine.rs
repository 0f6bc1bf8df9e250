//! Mocking engine: looks up overrides and records real responses for one
//! HTTP client, through that client's adapter.
//!
//! The engine never waits. It hands the override (with its delay) back to the
//! calling strategy, which applies the delay in its own concurrency model.

use crate::adapter::ClientAdapter;
use crate::config::settings::MockerConfig;
use crate::error::AdapterError;
use crate::mocks::repository::CacheRepository;
use crate::types::exchange::RequestData;
use crate::types::identity::RequestIdentity;
use crate::types::response::{MockResponse, RealResponse, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates one adapter and the shared repository.
#[derive(Debug)]
pub struct MockingEngine<A> {
    adapter: A,
    repository: Arc<CacheRepository>,
    config: MockerConfig,
}

impl<A: ClientAdapter> MockingEngine<A> {
    /// Create an engine driving `adapter` against the shared `repository`.
    pub fn new(adapter: A, repository: Arc<CacheRepository>, config: MockerConfig) -> Self {
        Self {
            adapter,
            repository,
            config,
        }
    }

    /// Override registered for this request, if any.
    ///
    /// Returns `None` when the engine is disabled or the request has no valid
    /// identity.
    pub fn get_mock_data(&self, request: &A::Request) -> Option<MockResponse> {
        if !self.config.enabled {
            return None;
        }

        let data = self.adapter.extract_request_data(request);
        let identity = identity_of(&data)?;
        let mock = self.repository.get_mock(&identity);

        if let Some(mock) = &mock {
            debug!(
                method = identity.method(),
                path = identity.path(),
                status = mock.code().as_u16(),
                delay_ms = mock.delay().as_millis() as u64,
                "Mock found"
            );
        }
        mock
    }

    /// Synthesize the native response for an override.
    pub fn create_mock_response(
        &self,
        request: &A::Request,
        mock: &MockResponse,
    ) -> Result<A::Response, AdapterError> {
        self.adapter.create_mock_response(request, mock)
    }

    /// Record a completed real response.
    ///
    /// Returns `true` if the response was stored. Responses rejected by the
    /// cache policy, or with an invalid identity or status, are skipped.
    pub fn cache_response(&self, request: &A::Request, response: &A::Response) -> bool {
        if !self.config.enabled {
            return false;
        }

        let data = self.adapter.extract_request_data(request);
        let Some(identity) = identity_of(&data) else {
            return false;
        };

        let extracted = self.adapter.extract_response_data(response);
        let successful = extracted.is_successful;
        let real = match RealResponse::new(extracted.code, extracted.body) {
            Ok(real) => real.with_headers(extracted.headers),
            Err(e) => {
                warn!(
                    method = identity.method(),
                    path = identity.path(),
                    error = %e,
                    "Skipping cache: invalid response"
                );
                return false;
            }
        };

        if !self.config.cache_policy.admits(successful) {
            debug!(
                method = identity.method(),
                path = identity.path(),
                status = real.code.as_u16(),
                "Skipping cache: rejected by cache policy"
            );
            return false;
        }

        self.repository.cache(identity, real);
        true
    }

    /// Whether a response with status line `status` to `request` would be
    /// recorded by [`cache_response`](Self::cache_response).
    ///
    /// Lets a strategy skip reading the body of responses the cache would
    /// reject anyway.
    pub fn will_cache(&self, request: &A::Request, status: u16) -> bool {
        if !self.config.enabled {
            return false;
        }
        let Ok(code) = StatusCode::new(status) else {
            return false;
        };

        let data = self.adapter.extract_request_data(request);
        identity_of(&data).is_some() && self.config.cache_policy.admits(code.is_success())
    }

    /// Adapter this engine was built with
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Shared repository
    pub fn repository(&self) -> &Arc<CacheRepository> {
        &self.repository
    }

    /// Active configuration
    pub fn config(&self) -> &MockerConfig {
        &self.config
    }
}

/// Identity of extracted request data; invalid identities are logged and
/// treated as not mockable.
fn identity_of(data: &RequestData) -> Option<RequestIdentity> {
    match data.identity() {
        Ok(identity) => Some(identity),
        Err(e) => {
            warn!(url = %data.url, error = %e, "Request is not mockable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::CachePolicy;
    use crate::types::exchange::ResponseData;
    use crate::types::headers::Headers;
    use crate::types::identity::path_from_url;
    use rstest::{fixture, rstest};

    struct FakeRequest {
        method: &'static str,
        url: &'static str,
    }

    #[derive(Debug)]
    struct FakeResponse {
        status: u16,
        body: Option<&'static str>,
        marker: Option<String>,
    }

    struct FakeAdapter;

    impl ClientAdapter for FakeAdapter {
        type Request = FakeRequest;
        type Response = FakeResponse;

        fn extract_request_data(&self, request: &FakeRequest) -> RequestData {
            RequestData {
                method: request.method.to_uppercase(),
                path: path_from_url(request.url),
                url: request.url.to_string(),
                headers: Headers::new(),
            }
        }

        fn extract_response_data(&self, response: &FakeResponse) -> ResponseData {
            ResponseData {
                code: response.status,
                body: response.body.unwrap_or_default().to_string(),
                headers: Headers::new(),
                is_successful: (200..300).contains(&response.status),
            }
        }

        fn create_mock_response(
            &self,
            _request: &FakeRequest,
            mock: &MockResponse,
        ) -> Result<FakeResponse, AdapterError> {
            Ok(FakeResponse {
                status: mock.code().as_u16(),
                body: None,
                marker: Some("mocked".to_string()),
            })
        }
    }

    const WEATHER: FakeRequest = FakeRequest {
        method: "get",
        url: "https://api.example.com/weather?city=Oslo",
    };

    fn ok(body: &'static str) -> FakeResponse {
        FakeResponse {
            status: 200,
            body: Some(body),
            marker: None,
        }
    }

    fn weather_identity() -> RequestIdentity {
        RequestIdentity::new("GET", "/weather").unwrap()
    }

    #[fixture]
    fn engine() -> MockingEngine<FakeAdapter> {
        MockingEngine::new(
            FakeAdapter,
            Arc::new(CacheRepository::new()),
            MockerConfig::default(),
        )
    }

    #[rstest]
    fn test_cache_response_records_real_response(engine: MockingEngine<FakeAdapter>) {
        assert!(engine.cache_response(&WEATHER, &ok("sunny")));

        let record = engine.repository().get(&weather_identity()).expect("cached");
        assert_eq!(record.real.body, "sunny");
        assert!(record.mock.is_none());
        assert_eq!(engine.get_mock_data(&WEATHER), None);
    }

    #[rstest]
    fn test_get_mock_data_returns_override_with_delay(engine: MockingEngine<FakeAdapter>) {
        engine.cache_response(&WEATHER, &ok("sunny"));
        let mock = MockResponse::builder(500).delay_ms(50).build().unwrap();
        assert!(engine.repository().mock(&weather_identity(), mock.clone()));

        let found = engine.get_mock_data(&WEATHER).expect("override");
        assert_eq!(found, mock);

        let response = engine.create_mock_response(&WEATHER, &found).unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.marker.as_deref(), Some("mocked"));
    }

    #[rstest]
    fn test_query_string_does_not_change_identity(engine: MockingEngine<FakeAdapter>) {
        let other_city = FakeRequest {
            method: "GET",
            url: "https://api.example.com/weather?city=Bergen",
        };
        engine.cache_response(&WEATHER, &ok("sunny"));
        engine
            .repository()
            .mock(&weather_identity(), MockResponse::builder(418).build().unwrap());

        assert_eq!(engine.get_mock_data(&other_city).unwrap().code().as_u16(), 418);
    }

    #[rstest]
    #[case(CachePolicy::SuccessfulOnly, 500, false)]
    #[case(CachePolicy::SuccessfulOnly, 201, true)]
    #[case(CachePolicy::AllResponses, 500, true)]
    fn test_cache_policy_applies(
        #[case] cache_policy: CachePolicy,
        #[case] status: u16,
        #[case] stored: bool,
    ) {
        let engine = MockingEngine::new(
            FakeAdapter,
            Arc::new(CacheRepository::new()),
            MockerConfig {
                cache_policy,
                ..MockerConfig::default()
            },
        );
        let response = FakeResponse {
            status,
            body: Some("x"),
            marker: None,
        };

        assert_eq!(engine.cache_response(&WEATHER, &response), stored);
        assert_eq!(engine.repository().len(), usize::from(stored));
    }

    /// Treats 3xx as success, unlike [`FakeAdapter`].
    struct LenientAdapter;

    impl ClientAdapter for LenientAdapter {
        type Request = FakeRequest;
        type Response = FakeResponse;

        fn extract_request_data(&self, request: &FakeRequest) -> RequestData {
            FakeAdapter.extract_request_data(request)
        }

        fn extract_response_data(&self, response: &FakeResponse) -> ResponseData {
            ResponseData {
                is_successful: response.status < 400,
                ..FakeAdapter.extract_response_data(response)
            }
        }

        fn create_mock_response(
            &self,
            request: &FakeRequest,
            mock: &MockResponse,
        ) -> Result<FakeResponse, AdapterError> {
            FakeAdapter.create_mock_response(request, mock)
        }
    }

    #[rstest]
    fn test_cache_policy_follows_adapter_verdict() {
        let engine = MockingEngine::new(
            LenientAdapter,
            Arc::new(CacheRepository::new()),
            MockerConfig::default(),
        );
        let not_modified = FakeResponse {
            status: 304,
            body: None,
            marker: None,
        };

        assert!(engine.cache_response(&WEATHER, &not_modified));
        assert_eq!(engine.repository().len(), 1);
    }

    #[rstest]
    #[case(MockerConfig::default(), "GET", 200, true)]
    #[case(MockerConfig::default(), "GET", 503, false)]
    #[case(MockerConfig::default(), "M-SEARCH", 200, false)]
    #[case(MockerConfig::default(), "GET", 42, false)]
    #[case(MockerConfig { cache_policy: CachePolicy::AllResponses, ..MockerConfig::default() }, "GET", 503, true)]
    #[case(MockerConfig { enabled: false, ..MockerConfig::default() }, "GET", 200, false)]
    fn test_will_cache(
        #[case] config: MockerConfig,
        #[case] method: &'static str,
        #[case] status: u16,
        #[case] expected: bool,
    ) {
        let engine = MockingEngine::new(FakeAdapter, Arc::new(CacheRepository::new()), config);
        let request = FakeRequest {
            method,
            url: "https://api.example.com/weather",
        };

        assert_eq!(engine.will_cache(&request, status), expected);
        assert!(engine.repository().is_empty());
    }

    #[rstest]
    fn test_invalid_identity_is_skipped(engine: MockingEngine<FakeAdapter>) {
        let request = FakeRequest {
            method: "M-SEARCH",
            url: "http://239.255.255.250:1900/",
        };
        assert!(!engine.cache_response(&request, &ok("x")));
        assert_eq!(engine.get_mock_data(&request), None);
        assert!(engine.repository().is_empty());
    }

    #[rstest]
    fn test_invalid_status_is_skipped(engine: MockingEngine<FakeAdapter>) {
        let response = FakeResponse {
            status: 42,
            body: None,
            marker: None,
        };
        assert!(!engine.cache_response(&WEATHER, &response));
        assert!(engine.repository().is_empty());
    }

    #[rstest]
    fn test_disabled_engine_is_transparent() {
        let repository = Arc::new(CacheRepository::new());
        let enabled = MockingEngine::new(FakeAdapter, Arc::clone(&repository), MockerConfig::default());
        let disabled = MockingEngine::new(
            FakeAdapter,
            Arc::clone(&repository),
            MockerConfig {
                enabled: false,
                ..MockerConfig::default()
            },
        );

        enabled.cache_response(&WEATHER, &ok("sunny"));
        repository.mock(&weather_identity(), MockResponse::builder(500).build().unwrap());

        assert!(enabled.get_mock_data(&WEATHER).is_some());
        assert_eq!(disabled.get_mock_data(&WEATHER), None);
        assert!(!disabled.cache_response(&WEATHER, &ok("cloudy")));
        assert_eq!(repository.get(&weather_identity()).unwrap().real.body, "sunny");
    }

    #[rstest]
    fn test_engines_share_repository() {
        let repository = Arc::new(CacheRepository::new());
        let first = MockingEngine::new(FakeAdapter, Arc::clone(&repository), MockerConfig::default());
        let second = MockingEngine::new(FakeAdapter, Arc::clone(&repository), MockerConfig::default());

        first.cache_response(&WEATHER, &ok("sunny"));
        repository.mock(&weather_identity(), MockResponse::builder(503).build().unwrap());

        assert_eq!(second.get_mock_data(&WEATHER).unwrap().code().as_u16(), 503);
    }
}
