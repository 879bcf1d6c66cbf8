//! Tracker for currently-open visit sessions
//!
//! Keeps at most one open session per user. Plain data like `Room`: the
//! engine serializes access, so no locking happens here.

use super::session::VisitSession;
use crate::domain::ids::{RoomId, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::warn;

/// Open sessions keyed by the visiting user
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: HashMap<UserId, VisitSession>,
}

impl SessionTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a user entering a room
    ///
    /// A user entering should never already hold an open session; finding
    /// one means occupancy and session state have drifted apart. The stale
    /// session is discarded in favor of the new one, with a warning.
    pub fn open(&mut self, user_id: UserId, room_id: RoomId, started_at: DateTime<Utc>) -> VisitSession {
        let session = VisitSession::begin(user_id, room_id, started_at);
        if let Some(stale) = self.active.insert(session.user_id.clone(), session.clone()) {
            warn!(
                user = %stale.user_id,
                room = %stale.room_id,
                "Discarding stale open session for entering user"
            );
        }
        session
    }

    /// Close a user's open session, removing it from the active set
    ///
    /// Returns `None` when no open session exists for the user; the caller
    /// decides how to report that gap. It is not an error here.
    pub fn close(&mut self, user_id: &UserId, ended_at: DateTime<Utc>) -> Option<VisitSession> {
        let mut session = self.active.remove(user_id)?;
        session.close(ended_at);
        Some(session)
    }

    /// The open session for a user, if any
    pub fn open_session(&self, user_id: &UserId) -> Option<&VisitSession> {
        self.active.get(user_id)
    }

    /// Number of sessions currently open
    pub fn open_count(&self) -> usize {
        self.active.len()
    }

    /// Users with an open session, sorted for stable output
    pub fn open_user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.active.keys().cloned().collect();
        ids.sort();
        ids
    }
}
