//! Room registry mapping room identifiers to live room state
//!
//! Each room lives behind its own `Mutex`; that mutex is the serialization
//! point for every access decision touching the room. The registry's outer
//! `RwLock` only guards the id-to-room map itself and is write-locked just
//! once per newly-sighted room, so traffic for unrelated rooms never
//! contends on it.

use super::room::Room;
use crate::domain::ids::RoomId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Shared handle to one room's state and its lock
pub type RoomSlot = Arc<Mutex<Room>>;

/// Registry of all rooms ever referenced by an access event
///
/// Rooms are created implicitly on first reference and never deleted.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, RoomSlot>>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a room, creating it empty on first sighting
    pub async fn get_or_create(&self, room_id: &RoomId) -> RoomSlot {
        {
            let rooms = self.rooms.read().await;
            if let Some(slot) = rooms.get(room_id) {
                return Arc::clone(slot);
            }
        }

        let mut rooms = self.rooms.write().await;
        // Re-check under the write lock: another caller may have created
        // the room between our read and write acquisitions.
        let slot = rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                debug!(room = %room_id, "Registered new room");
                Arc::new(Mutex::new(Room::new()))
            });
        Arc::clone(slot)
    }

    /// Look up a room without creating it
    pub async fn get(&self, room_id: &RoomId) -> Option<RoomSlot> {
        self.rooms.read().await.get(room_id).map(Arc::clone)
    }

    /// Check whether a room has ever been referenced
    pub async fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    /// All known room identifiers, sorted for stable output
    pub async fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of known rooms
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// True when no room has been referenced yet
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}
