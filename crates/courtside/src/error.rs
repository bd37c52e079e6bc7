//! Unified error type for the Courtside client.

use courtside_gateway::GatewayError;
use courtside_league::LeagueError;
use courtside_protocol::ProtocolError;
use courtside_roster::RosterError;
use courtside_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CourtsideError {
    /// A payload could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The authority refused a request or could not be reached.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Login, restore or account operations.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Roster mutations and loads.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// League create/join/delete/list.
    #[error(transparent)]
    League(#[from] LeagueError),
}

impl CourtsideError {
    /// Returns `true` if the authority rejected the credential. The
    /// session is already anonymous when this is seen.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Protocol(_) => false,
            Self::Gateway(e) => e.is_unauthorized(),
            Self::Session(e) => e.is_unauthorized(),
            Self::Roster(e) => e.is_unauthorized(),
            Self::League(e) => e.is_unauthorized(),
        }
    }

    /// Returns `true` if a manual retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Protocol(_) => false,
            Self::Gateway(e) => e.is_transient(),
            Self::Session(e) => e.is_transient(),
            Self::Roster(e) => e.is_transient(),
            Self::League(e) => e.is_transient(),
        }
    }
}
