//! Wire protocol for the Courtside fantasy client.
//!
//! This crate defines what the client and the authority exchange:
//!
//! - **Types** ([`Player`], [`UserProfile`], [`League`], request bodies) —
//!   the JSON documents that travel over HTTP.
//! - **Routes** ([`Route`], [`Method`]) — the request contract: which
//!   method and path each operation uses and whether it needs a bearer
//!   credential.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those documents are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about sessions, rosters, or the network.
//! It only describes shapes and addresses.
//!
//! ```text
//! Gateway (HTTP) → Protocol (typed documents) → Session / Roster / League
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod routes;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use routes::{Method, Route};
pub use types::{
    ChangePasswordRequest, CreateLeagueRequest, Credential, League, LeagueId,
    LoginRequest, Player, PlayerId, RegisterRequest, Role, TokenResponse,
    UpdateProfileRequest, UserId, UserProfile, UserSummary,
};
