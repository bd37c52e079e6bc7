//! Scripted in-process gateway.
//!
//! Tests script the authority's answers per route and then assert on what
//! the client sent. Two kinds of answers exist:
//!
//! - **ready** answers resolve as soon as the call is made;
//! - **gated** answers hold the call in flight until the test releases it,
//!   which is how concurrent, interleaved requests are reproduced.
//!
//! Answers for the same route are consumed first in, first out. A call to a
//! route with nothing scripted resolves to `Unreachable`.

use std::collections::{HashMap, VecDeque};

use courtside_protocol::{Credential, Method, Route};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::{GatewayError, RemoteGateway};

/// One request observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    /// Raw bearer token, if one was attached.
    pub credential: Option<String>,
}

enum Scripted {
    Ready(Result<Value, GatewayError>),
    Gated {
        entered: oneshot::Sender<()>,
        release: oneshot::Receiver<Result<Value, GatewayError>>,
    },
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    calls: Vec<RecordedCall>,
}

/// A [`RemoteGateway`] whose answers are scripted by the test.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

/// Test-side handle of a gated answer.
pub struct GateHandle {
    entered: oneshot::Receiver<()>,
    release: oneshot::Sender<Result<Value, GatewayError>>,
}

impl GateHandle {
    /// Waits until a call has reached this gate.
    pub async fn entered(&mut self) {
        let _ = (&mut self.entered).await;
    }

    /// Resolves the held call with `result`.
    pub fn release(self, result: Result<Value, GatewayError>) {
        let _ = self.release.send(result);
    }
}

impl MockGateway {
    /// Creates a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for the next call to `route`.
    pub fn respond(
        &self,
        route: Route<'_>,
        result: Result<Value, GatewayError>,
    ) -> &Self {
        self.push(route, Scripted::Ready(result));
        self
    }

    /// Queues a successful answer for the next call to `route`.
    pub fn respond_ok(&self, route: Route<'_>, value: Value) -> &Self {
        self.respond(route, Ok(value))
    }

    /// Queues an answer that is held until the returned handle releases it.
    pub fn gate(&self, route: Route<'_>) -> GateHandle {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.push(
            route,
            Scripted::Gated {
                entered: entered_tx,
                release: release_rx,
            },
        );
        GateHandle {
            entered: entered_rx,
            release: release_tx,
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Total number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Number of calls made to `route`.
    pub fn calls_to(&self, route: Route<'_>) -> usize {
        let method = route.method();
        let path = route.path();
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    /// Number of scripted answers not consumed yet.
    pub fn pending_answers(&self) -> usize {
        self.state.lock().routes.values().map(VecDeque::len).sum()
    }

    fn push(&self, route: Route<'_>, answer: Scripted) {
        self.state
            .lock()
            .routes
            .entry((route.method(), route.path()))
            .or_default()
            .push_back(answer);
    }
}

impl RemoteGateway for MockGateway {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        credential: Option<&Credential>,
    ) -> Result<Value, GatewayError> {
        // The lock is released before any await below.
        let answer = {
            let mut state = self.state.lock();
            state.calls.push(RecordedCall {
                method,
                path: path.to_string(),
                body,
                credential: credential.map(|c| c.as_str().to_string()),
            });
            state
                .routes
                .get_mut(&(method, path.to_string()))
                .and_then(VecDeque::pop_front)
        };

        match answer {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated { entered, release }) => {
                let _ = entered.send(());
                release.await.unwrap_or_else(|_| {
                    Err(GatewayError::Unreachable("gate dropped".into()))
                })
            }
            None => Err(GatewayError::Unreachable(format!(
                "no scripted answer for {method} {path}"
            ))),
        }
    }
}
