//! # Courtside
//!
//! Session and roster synchronization engine for the Courtside fantasy
//! basketball client.
//!
//! A single [`SessionStore`](courtside_session::SessionStore) owns the
//! credential and profile. The roster is updated optimistically with
//! rollback; leagues are re-listed after every confirmed change. Every
//! component talks to the authority through one
//! [`RemoteGateway`](courtside_gateway::RemoteGateway).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courtside::prelude::*;
//!
//! # async fn run() -> Result<(), CourtsideError> {
//! courtside::telemetry::init();
//! let client = CourtsideClientBuilder::from_env().build()?;
//! client.start().await;
//! client.roster().add(PlayerId(23)).await?;
//! client.after_roster_change().await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod client;
mod error;
pub mod telemetry;

pub use client::{CourtsideClient, CourtsideClientBuilder, ENV_API_URL, ENV_STORAGE_DIR};
pub use error::CourtsideError;

pub use courtside_gateway as gateway;
pub use courtside_league as league;
pub use courtside_protocol as protocol;
pub use courtside_roster as roster;
pub use courtside_session as session;

pub mod prelude {
    pub use crate::{CourtsideClient, CourtsideClientBuilder, CourtsideError};
    pub use courtside_gateway::{GatewayConfig, GatewayError, HttpGateway, RemoteGateway};
    pub use courtside_league::{LeagueError, MembershipCoordinator};
    pub use courtside_protocol::{League, LeagueId, Player, PlayerId, Role, UserId, UserProfile};
    pub use courtside_roster::{RosterChange, RosterConfig, RosterError, RosterSynchronizer};
    pub use courtside_session::{
        FileCredentialStore, MemoryCredentialStore, RestoreOutcome, SessionConfig,
        SessionError, SessionState, SessionStore,
    };
}
