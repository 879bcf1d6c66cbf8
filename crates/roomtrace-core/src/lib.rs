//! Roomtrace Core Library
//!
//! This crate provides the core functionality for Roomtrace, including:
//! - Occupancy tracking (which users are present in which rooms)
//! - Visit sessions (opened on entry, closed on exit)
//! - Append-only history of completed visits
//! - The occupancy engine that derives entry/exit from toggle events,
//!   serialized per room and parallel across rooms

pub mod domain;
pub mod engine;
pub mod error;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::domain::ids::{RoomId, UserId};
    pub use crate::domain::visit::VisitSession;
    pub use crate::engine::{AccessOutcome, OccupancyEngine, OccupancyStats};
    pub use crate::error::{Error, Result};
}
