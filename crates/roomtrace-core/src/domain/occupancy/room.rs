//! Room entity holding the set of currently-present users

use crate::domain::ids::UserId;
use std::collections::HashSet;

/// A single room's occupancy state
///
/// Holds nothing but the occupant set. Plain data: synchronization is the
/// responsibility of whoever holds the room (see `OccupancyEngine`).
#[derive(Debug, Default)]
pub struct Room {
    occupants: HashSet<UserId>,
}

impl Room {
    /// Create an empty room
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a user is currently recorded as present
    pub fn is_present(&self, user_id: &UserId) -> bool {
        self.occupants.contains(user_id)
    }

    /// Record a user as present
    ///
    /// Returns `false` if the user was already present (set semantics).
    pub fn insert(&mut self, user_id: UserId) -> bool {
        self.occupants.insert(user_id)
    }

    /// Remove a user from the occupant set
    ///
    /// Returns `false` if the user was not present; removing an absent user
    /// is not an error.
    pub fn remove(&mut self, user_id: &UserId) -> bool {
        self.occupants.remove(user_id)
    }

    /// Current occupants, sorted for stable output
    pub fn occupants(&self) -> Vec<UserId> {
        let mut out: Vec<UserId> = self.occupants.iter().cloned().collect();
        out.sort();
        out
    }

    /// Number of users currently present
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// True when nobody is present
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}
