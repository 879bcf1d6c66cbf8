//! Occupancy domain module
//!
//! Tracks which users are physically present in which rooms.
//!
//! # Architecture
//!
//! - **Entity**: `Room`, a bare occupant set with no locking of its own
//! - **Registry**: `RoomRegistry`, resolving room identifiers to shared,
//!   individually-locked room slots
//!
//! The entry/exit decision itself lives in the engine, which holds a room's
//! lock across the whole read-decide-write sequence.

pub mod registry;
pub mod room;

pub use registry::{RoomRegistry, RoomSlot};
pub use room::Room;
