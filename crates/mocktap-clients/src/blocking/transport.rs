//! Network transport for the blocking client, backed by
//! `reqwest::blocking::Client`.
//!
//! The reqwest blocking client runs its own runtime; do not drive it from
//! inside an async task.

use crate::blocking::chain::Transport;
use crate::blocking::{BlockingRequest, BlockingResponse, CallError};
use reqwest::Url;
use tracing::debug;

impl Transport for reqwest::blocking::Client {
    fn execute(&self, request: &BlockingRequest) -> Result<BlockingResponse, CallError> {
        let url = Url::parse(&request.uri().to_string())
            .map_err(|e| CallError::Transport(format!("invalid url {}: {e}", request.uri())))?;

        let response = self
            .request(request.method().clone(), url)
            .headers(request.headers().clone())
            .body(request.body().clone())
            .send()
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| CallError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), "Received response");

        let mut native = http::Response::new(body.to_vec());
        *native.status_mut() = status;
        *native.version_mut() = version;
        *native.headers_mut() = headers;
        Ok(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocking::{BlockingClient, MockInterceptor};
    use crate::headers::is_mocked;
    use mocktap_core::{CacheRepository, MockResponse, MockerConfig, RequestIdentity};
    use rstest::rstest;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::thread;

    /// Serve one canned HTTP/1.1 response; the handle yields the raw request head.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    fn get(uri: &str) -> BlockingRequest {
        http::Request::builder()
            .uri(uri)
            .header("x-trace", "abc")
            .body(Vec::new())
            .unwrap()
    }

    #[rstest]
    fn test_executes_over_the_network() {
        let (base, server) = serve_once(
            "HTTP/1.1 201 Created\r\ncontent-type: text/plain\r\ncontent-length: 5\r\nconnection: close\r\n\r\nsunny",
        );

        let client = reqwest::blocking::Client::new();
        let response =
            Transport::execute(&client, &get(&format!("{base}/weather?city=Oslo"))).unwrap();
        let head = server.join().unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(response.body(), b"sunny");
        assert!(head.starts_with("GET /weather?city=Oslo HTTP/1.1"));
        assert!(head.to_lowercase().contains("x-trace: abc"));
    }

    #[rstest]
    fn test_connection_failure_is_a_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let client = reqwest::blocking::Client::new();
        let result = Transport::execute(&client, &get(&format!("http://{addr}/weather")));
        assert!(matches!(result, Err(CallError::Transport(_))));
    }

    #[rstest]
    fn test_mocking_client_over_the_network() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\n\r\nsunny",
        );
        let repository = Arc::new(CacheRepository::new());
        let client = BlockingClient::builder(reqwest::blocking::Client::new())
            .interceptor(MockInterceptor::from_config(
                Arc::clone(&repository),
                MockerConfig::default(),
            ))
            .build();

        let response = client.execute(get(&format!("{base}/weather"))).unwrap();
        server.join().unwrap();
        assert_eq!(response.body(), b"sunny");

        let weather = RequestIdentity::new("GET", "/weather").unwrap();
        assert_eq!(repository.get(&weather).unwrap().real.body, "sunny");

        repository.mock(&weather, MockResponse::builder(503).build().unwrap());
        let response = client.execute(get(&format!("{base}/weather"))).unwrap();
        assert_eq!(response.status(), 503);
        assert!(is_mocked(&response));
    }
}
