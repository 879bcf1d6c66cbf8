//! Identifier newtypes for rooms and users
//!
//! Rooms and users are addressed by caller-defined tokens. Wrapping them in
//! newtypes keeps the two from being mixed up in signatures and leaves the
//! representation open to callers: badge numbers, lock serials, and UUIDs
//! all arrive as strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a room (or lock) as assigned by the access-control system
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a room identifier from any string-like token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a person carrying an access credential
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user identifier from any string-like token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_conversions() {
        let from_str: RoomId = "lobby".into();
        let from_string: RoomId = String::from("lobby").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.as_str(), "lobby");
        assert_eq!(from_str.to_string(), "lobby");
    }

    #[test]
    fn test_user_id_conversions() {
        let id = UserId::new("badge-42");
        assert_eq!(id.as_str(), "badge-42");
        assert_eq!(id, UserId::from("badge-42"));
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Same token, different meaning; equality only within a type
        let room = RoomId::new("7");
        let user = UserId::new("7");
        assert_eq!(room.as_str(), user.as_str());
    }
}
