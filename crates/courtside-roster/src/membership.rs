//! The set of player ids on a roster.

use courtside_protocol::PlayerId;

/// Duplicate-free player ids in the order they were added.
///
/// `Membership` does not know the capacity; the synchronizer checks it
/// before inserting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    ids: Vec<PlayerId>,
}

impl Membership {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a membership from `ids`, keeping the first occurrence of each.
    pub fn from_ids(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut membership = Self::new();
        for id in ids {
            membership.insert(id);
        }
        membership
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    /// Adds `id`. Returns `false` if it was already present.
    pub fn insert(&mut self, id: PlayerId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Removes `id`. Returns `false` if it wasn't present.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        match self.ids.iter().position(|&m| m == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
