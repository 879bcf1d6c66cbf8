//! Visit domain module
//!
//! Models a user's stay in a room from entry to exit.
//!
//! # Architecture
//!
//! - **Entity**: `VisitSession` with open/closed lifecycle
//! - **Tracker**: `SessionTracker` holding at most one open session per user
//! - **History**: `SessionHistory`, the append-only archive closed sessions
//!   move into when a user exits

pub mod history;
pub mod session;
pub mod tracker;

pub use history::SessionHistory;
pub use session::VisitSession;
pub use tracker::SessionTracker;
