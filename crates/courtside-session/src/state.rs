//! Session configuration, lifecycle states and restoration outcomes.

use std::fmt;

use courtside_gateway::GatewayError;
use courtside_protocol::UserProfile;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the slot the credential is persisted under.
    ///
    /// Default: `"token"`. With [`FileCredentialStore`](crate::FileCredentialStore)
    /// this is the file name inside the storage directory.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "token".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the session is in its lifecycle.
///
/// ```text
///   Anonymous ──(restore / login)──→ Restoring ──(profile ok)──→ Authenticated
///       ↑                                │                            │
///       └─────────(profile failed)───────┘                            │
///       └──────────────(logout / credential rejected)─────────────────┘
/// ```
///
/// - **Anonymous**: no credential in memory. Only unauthenticated views
///   may render.
/// - **Restoring**: a credential is held but the authority hasn't
///   confirmed it with a profile yet.
/// - **Authenticated**: credential and profile are both present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Restoring,
    Authenticated,
}

impl SessionState {
    /// Returns `true` when authenticated views may render.
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Restoring => write!(f, "Restoring"),
            Self::Authenticated => write!(f, "Authenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// RestoreOutcome
// ---------------------------------------------------------------------------

/// How [`SessionStore::restore`](crate::SessionStore::restore) ended.
///
/// Restoration never fails from the caller's point of view: a credential
/// the authority no longer accepts simply ends in `Discarded` and the
/// session is anonymous.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// Nothing was persisted; the session stays anonymous.
    NoCredential,

    /// The persisted credential was confirmed.
    Restored(UserProfile),

    /// The persisted credential was rejected or the profile could not be
    /// fetched. The credential has been cleared from storage.
    Discarded(GatewayError),

    /// A login or logout happened while restoration was in flight and
    /// took precedence.
    Superseded,
}

impl RestoreOutcome {
    /// The restored profile, if any.
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Restored(profile) => Some(profile),
            _ => None,
        }
    }
}
