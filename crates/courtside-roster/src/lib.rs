//! Optimistic roster synchronization for Courtside.
//!
//! The local roster changes the moment the user asks for it; the request
//! to the authority follows. If the authority refuses or can't be reached,
//! the change is compensated and the error surfaces unchanged.
//!
//! # Key types
//!
//! - [`RosterSynchronizer`] — add/remove with rollback, plus projections
//! - [`Membership`] — the bounded, duplicate-free set of player ids
//! - [`PendingMutation`] — one in-flight change and how to undo it
//! - [`RosterConfig`] — capacity and per-player serialization

mod config;
mod error;
mod membership;
mod mutation;
mod queue;
mod synchronizer;

pub use config::RosterConfig;
pub use error::RosterError;
pub use membership::Membership;
pub use mutation::{MutationKind, PendingMutation};
pub use synchronizer::{RosterChange, RosterSynchronizer};
