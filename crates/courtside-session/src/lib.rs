//! Authenticated session management for the Courtside client.
//!
//! This crate owns the lifecycle of the user's session:
//!
//! 1. **Restoration** — picking up a persisted credential at start-up and
//!    confirming it with the authority ([`SessionStore::restore`])
//! 2. **Login / logout** — exchanging credentials for a token, all or
//!    nothing, and forgetting it again
//! 3. **Invalidation** — dropping back to anonymous whenever the authority
//!    rejects the credential
//! 4. **Persistence** — keeping the credential across process restarts
//!    ([`CredentialStore`] trait)
//!
//! # How it fits in the stack
//!
//! ```text
//! Roster / League (above)  ← read the credential, report rejections
//!     ↕
//! Session (this crate)     ← credential + profile snapshot
//!     ↕
//! Gateway (below)          ← one request per call
//! ```

mod error;
mod persist;
mod state;
mod store;

pub use error::SessionError;
pub use persist::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use state::{RestoreOutcome, SessionConfig, SessionState};
pub use store::SessionStore;
