//! Error types for the roster layer.

use courtside_gateway::GatewayError;

/// Errors returned by roster mutations and loads.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The roster is full. Raised locally; no request was sent.
    #[error("roster is full ({capacity} players)")]
    CapacityExceeded { capacity: usize },

    /// There is no authenticated session. Local state was not touched.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The authority refused the change or could not be reached. The
    /// optimistic change has already been rolled back.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl RosterError {
    /// Returns `true` if the authority rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_unauthorized())
    }

    /// Returns `true` if a manual retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_transient())
    }
}
