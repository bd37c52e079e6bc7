//! In-flight roster changes as compensating-action records.
//!
//! A [`PendingMutation`] is created when an optimistic change is applied
//! locally and lives until the authority answers. On failure its
//! [`compensate`](PendingMutation::compensate) restores the player's prior
//! membership against whatever the roster looks like *at that moment*,
//! not against a snapshot. Other mutations that completed in between are
//! left alone.

use std::fmt;

use courtside_protocol::PlayerId;

use crate::Membership;

/// Direction of a roster change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Remove,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// One optimistic change awaiting the authority's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub player_id: PlayerId,
    pub kind: MutationKind,
    /// Whether the player was on the roster before the change was applied.
    pub prior: bool,
}

impl PendingMutation {
    /// Records an add of a player who is not on the roster.
    pub fn add(player_id: PlayerId) -> Self {
        Self {
            player_id,
            kind: MutationKind::Add,
            prior: false,
        }
    }

    /// Records a removal of a player who is on the roster.
    pub fn remove(player_id: PlayerId) -> Self {
        Self {
            player_id,
            kind: MutationKind::Remove,
            prior: true,
        }
    }

    /// Applies the change. Returns `true` if the membership changed.
    pub fn apply(&self, membership: &mut Membership) -> bool {
        match self.kind {
            MutationKind::Add => membership.insert(self.player_id),
            MutationKind::Remove => membership.remove(self.player_id),
        }
    }

    /// Restores the player's prior membership. A removed player is only
    /// put back if absent and the roster still has room.
    ///
    /// Returns `true` if the membership changed.
    pub fn compensate(&self, membership: &mut Membership, capacity: usize) -> bool {
        if self.prior {
            if membership.contains(self.player_id) || membership.len() >= capacity {
                return false;
            }
            membership.insert(self.player_id)
        } else {
            membership.remove(self.player_id)
        }
    }
}
