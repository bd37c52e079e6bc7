//! Error types for the league layer.

use courtside_gateway::GatewayError;
use courtside_protocol::LeagueId;

/// Errors returned by [`MembershipCoordinator`](crate::MembershipCoordinator).
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    /// Empty name or invite code. No request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The user may not delete this league: not the owner and not an
    /// admin. No request was sent.
    #[error("not allowed to delete league {0}")]
    Forbidden(LeagueId),

    /// There is no authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl LeagueError {
    /// Returns `true` if the authority rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_unauthorized())
    }

    /// Returns `true` if a manual retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_transient())
    }
}
