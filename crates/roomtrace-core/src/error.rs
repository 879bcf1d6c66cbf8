//! Error types for Roomtrace

use crate::domain::ids::{RoomId, UserId};
use thiserror::Error;

/// Result type alias using Roomtrace's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Roomtrace error types
///
/// Access recording itself is infallible; these errors only surface from
/// setup-time operations such as seeding initial occupancy.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("user '{user}' is already present in room '{room}'")]
    AlreadyPresent {
        /// The user that was found in an occupant set
        user: UserId,
        /// The room the user already occupies
        room: RoomId,
    },
}
