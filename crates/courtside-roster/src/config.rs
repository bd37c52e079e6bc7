//! Roster configuration.

/// Default number of players a roster may hold.
pub const DEFAULT_CAPACITY: usize = 10;

/// Configuration for a [`RosterSynchronizer`](crate::RosterSynchronizer).
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Maximum number of distinct players on the roster.
    ///
    /// Checked locally before any request is sent. The authority enforces
    /// its own limit and wins any disagreement.
    pub capacity: usize,

    /// Run mutations on the same player one after another.
    ///
    /// When `false` (the default), an add and a remove of the same player
    /// can be in flight together and whichever resolves last decides the
    /// final state. Mutations on different players always run concurrently.
    pub serialize_per_player: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            serialize_per_player: false,
        }
    }
}
