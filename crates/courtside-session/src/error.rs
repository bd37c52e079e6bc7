//! Error types for the session layer.

use courtside_gateway::GatewayError;

/// Errors returned by [`SessionStore`](crate::SessionStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs an authenticated session and there is none.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Local validation failed before any request was sent
    /// (empty email, passwords that don't match, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The session was replaced or cleared while the request was in
    /// flight, so its result was dropped.
    #[error("session changed while the request was in flight")]
    Superseded,

    /// Writing the credential to durable storage failed.
    #[error("credential storage failed: {0}")]
    Storage(#[source] std::io::Error),

    /// The authority rejected the request or could not be reached.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SessionError {
    /// Returns `true` if the authority rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_unauthorized())
    }

    /// Returns `true` if a manual retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_transient())
    }
}
