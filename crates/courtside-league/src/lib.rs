//! League membership coordination for Courtside.
//!
//! Unlike the roster, league changes are not optimistic: every create,
//! join or delete waits for the authority and then re-lists the user's
//! leagues.
//!
//! # Key types
//!
//! - [`MembershipCoordinator`] — create/join/delete/list plus projections
//! - [`LeagueError`] — local validation failures and gateway errors

mod coordinator;
mod error;

pub use coordinator::MembershipCoordinator;
pub use error::LeagueError;
