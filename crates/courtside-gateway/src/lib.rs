//! Request/response boundary between the Courtside client and its authority.
//!
//! Provides the [`RemoteGateway`] trait that every stateful component talks
//! through, an HTTP implementation, and typed helpers for each route of the
//! authority's contract.
//!
//! # Feature Flags
//!
//! - `http` (default) — [`HttpGateway`] via `reqwest`
//! - `mock` — [`MockGateway`], a scripted in-process gateway for tests

#![allow(async_fn_in_trait)]

pub mod endpoints;
mod error;
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "mock")]
mod mock;

pub use error::GatewayError;
#[cfg(feature = "http")]
pub use http::{GatewayConfig, HttpGateway};
#[cfg(feature = "mock")]
pub use mock::{GateHandle, MockGateway, RecordedCall};

use courtside_protocol::{Credential, Method};
use serde_json::Value;

/// A stateless, typed request/response channel to the authority.
///
/// Every call is an independent request. When `credential` is `Some`, the
/// implementation attaches `Authorization: Bearer <credential>`.
///
/// Implementations never retry. Mutating calls are not guaranteed to be
/// idempotent, so retrying is left to whoever issued the intent.
///
/// # Errors
///
/// - [`GatewayError::Unauthorized`] — the credential is no longer valid
/// - [`GatewayError::Rejected`] — the authority refused the request for a
///   domain reason, carried verbatim
/// - [`GatewayError::Unreachable`] — transport failure or server fault
pub trait RemoteGateway: Send + Sync + 'static {
    /// Sends one request and returns the decoded JSON body.
    ///
    /// An empty success body (`204 No Content`) yields `Value::Null`.
    fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        credential: Option<&Credential>,
    ) -> impl std::future::Future<Output = Result<Value, GatewayError>> + Send;
}
