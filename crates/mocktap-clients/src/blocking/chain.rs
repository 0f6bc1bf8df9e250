//! Interceptor chain for the blocking client.
//!
//! Each interceptor receives a [`Chain`] and either answers the request
//! itself or calls [`Chain::proceed`] to hand it to the next interceptor,
//! and finally to the [`Transport`].

use crate::blocking::call::CallHandle;
use crate::blocking::{BlockingRequest, BlockingResponse, CallError};
use std::sync::Arc;
use tracing::debug;

/// Step in the request pipeline of a [`BlockingClient`].
pub trait Interceptor: Send + Sync {
    fn intercept(&self, chain: &mut Chain<'_>) -> Result<BlockingResponse, CallError>;
}

/// The network step at the end of the chain.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &BlockingRequest) -> Result<BlockingResponse, CallError>;
}

/// [`Transport`] backed by a closure.
pub struct FnTransport<F>(F);

impl<F> FnTransport<F>
where
    F: Fn(&BlockingRequest) -> Result<BlockingResponse, CallError> + Send + Sync,
{
    /// Wrap a closure performing the exchange
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Transport for FnTransport<F>
where
    F: Fn(&BlockingRequest) -> Result<BlockingResponse, CallError> + Send + Sync,
{
    fn execute(&self, request: &BlockingRequest) -> Result<BlockingResponse, CallError> {
        (self.0)(request)
    }
}

/// Position of one call inside the interceptor list.
pub struct Chain<'a> {
    request: &'a mut BlockingRequest,
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
    call: &'a CallHandle,
}

impl<'a> Chain<'a> {
    /// Request as seen at this point of the chain
    pub fn request(&self) -> &BlockingRequest {
        &*self.request
    }

    /// Mutable request, for interceptors that rewrite it before proceeding
    pub fn request_mut(&mut self) -> &mut BlockingRequest {
        &mut *self.request
    }

    /// Handle of the call being executed
    pub fn call(&self) -> &CallHandle {
        self.call
    }

    /// Pass the request to the rest of the chain.
    pub fn proceed(&mut self) -> Result<BlockingResponse, CallError> {
        self.call.check()?;

        match self.interceptors.split_first() {
            Some((next, rest)) => {
                let mut chain = Chain {
                    request: &mut *self.request,
                    interceptors: rest,
                    transport: self.transport,
                    call: self.call,
                };
                next.intercept(&mut chain)
            }
            None => {
                debug!(method = %self.request.method(), uri = %self.request.uri(), "Executing request");
                let response = self.transport.execute(&*self.request)?;
                self.call.check()?;
                Ok(response)
            }
        }
    }
}

/// Blocking HTTP client: an ordered interceptor list in front of a transport.
#[derive(Clone)]
pub struct BlockingClient {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl BlockingClient {
    /// Start a client sending requests through `transport`
    pub fn builder(transport: impl Transport + 'static) -> BlockingClientBuilder {
        BlockingClientBuilder {
            interceptors: Vec::new(),
            transport: Arc::new(transport),
        }
    }

    /// Run a request through the chain on the current thread.
    pub fn execute(&self, request: BlockingRequest) -> Result<BlockingResponse, CallError> {
        self.new_call(request).execute()
    }

    /// Prepare a call whose [`CallHandle`] can cancel it from another thread.
    pub fn new_call(&self, request: BlockingRequest) -> PendingCall {
        PendingCall {
            client: self.clone(),
            request,
            handle: CallHandle::new(),
        }
    }
}

pub struct BlockingClientBuilder {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl BlockingClientBuilder {
    /// Append an interceptor; interceptors run in the order they are added.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Finish the client
    pub fn build(self) -> BlockingClient {
        BlockingClient {
            interceptors: self.interceptors,
            transport: self.transport,
        }
    }
}

/// A request bound to a client, not yet executed.
pub struct PendingCall {
    client: BlockingClient,
    request: BlockingRequest,
    handle: CallHandle,
}

impl PendingCall {
    /// Handle that cancels this call, usable from any thread
    pub fn handle(&self) -> CallHandle {
        self.handle.clone()
    }

    /// Run the call on the current thread
    pub fn execute(mut self) -> Result<BlockingResponse, CallError> {
        let mut chain = Chain {
            request: &mut self.request,
            interceptors: &self.client.interceptors,
            transport: self.client.transport.as_ref(),
            call: &self.handle,
        };
        chain.proceed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, Response};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Recorder {
        fn intercept(&self, chain: &mut Chain<'_>) -> Result<BlockingResponse, CallError> {
            self.log.lock().unwrap().push(format!("{} before", self.name));
            let response = chain.proceed();
            self.log.lock().unwrap().push(format!("{} after", self.name));
            response
        }
    }

    struct ShortCircuit;

    impl Interceptor for ShortCircuit {
        fn intercept(&self, _chain: &mut Chain<'_>) -> Result<BlockingResponse, CallError> {
            Ok(Response::builder().status(204).body(Vec::new()).unwrap())
        }
    }

    struct AddHeader;

    impl Interceptor for AddHeader {
        fn intercept(&self, chain: &mut Chain<'_>) -> Result<BlockingResponse, CallError> {
            chain
                .request_mut()
                .headers_mut()
                .insert("x-added", http::HeaderValue::from_static("1"));
            chain.proceed()
        }
    }

    fn counting_transport(calls: Arc<AtomicUsize>) -> impl Transport {
        FnTransport::new(move |request: &BlockingRequest| {
            calls.fetch_add(1, Ordering::SeqCst);
            let echoed = request
                .headers()
                .get("x-added")
                .map(|v| v.as_bytes().to_vec())
                .unwrap_or_default();
            Ok(Response::builder().status(200).body(echoed).unwrap())
        })
    }

    fn get(uri: &str) -> BlockingRequest {
        Request::builder().uri(uri).body(Vec::new()).unwrap()
    }

    #[rstest]
    fn test_interceptors_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let client = BlockingClient::builder(counting_transport(Arc::clone(&calls)))
            .interceptor(Recorder {
                name: "outer",
                log: Arc::clone(&log),
            })
            .interceptor(Recorder {
                name: "inner",
                log: Arc::clone(&log),
            })
            .build();

        let response = client.execute(get("http://localhost/a")).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer before", "inner before", "inner after", "outer after"]
        );
    }

    #[rstest]
    fn test_interceptor_can_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = BlockingClient::builder(counting_transport(Arc::clone(&calls)))
            .interceptor(ShortCircuit)
            .build();

        let response = client.execute(get("http://localhost/a")).unwrap();
        assert_eq!(response.status(), 204);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn test_interceptor_can_rewrite_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = BlockingClient::builder(counting_transport(calls))
            .interceptor(AddHeader)
            .build();

        let response = client.execute(get("http://localhost/a")).unwrap();
        assert_eq!(response.body(), b"1");
    }

    #[rstest]
    fn test_canceled_call_never_reaches_transport() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = BlockingClient::builder(counting_transport(Arc::clone(&calls))).build();

        let call = client.new_call(get("http://localhost/a"));
        call.handle().cancel();

        assert!(matches!(call.execute(), Err(CallError::Canceled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn test_transport_error_is_returned() {
        let client = BlockingClient::builder(FnTransport::new(|_: &BlockingRequest| {
            Err(CallError::Transport("connection refused".into()))
        }))
        .build();

        let result = client.execute(get("http://localhost/a"));
        assert!(matches!(result, Err(CallError::Transport(_))));
    }
}
