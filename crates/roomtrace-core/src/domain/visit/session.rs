//! Visit session entity
//!
//! A visit session records one user's stay in one room: opened on entry,
//! closed on exit. Closed sessions are immutable once archived.

use crate::domain::ids::{RoomId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's visit to one room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSession {
    /// Unique session identifier
    pub id: Uuid,

    /// The visiting user
    pub user_id: UserId,

    /// The room being visited
    pub room_id: RoomId,

    /// When the user entered
    pub started_at: DateTime<Utc>,

    /// When the user left; `None` while the visit is in progress
    pub ended_at: Option<DateTime<Utc>>,
}

impl VisitSession {
    /// Open a new session at the given entry time
    pub fn begin(user_id: UserId, room_id: RoomId, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            room_id,
            started_at,
            ended_at: None,
        }
    }

    /// Stamp the exit time, closing the session
    ///
    /// The end is forced strictly after the start so consumers can rely on
    /// every closed session having a positive duration, even when two clock
    /// reads land on the same instant.
    pub fn close(&mut self, ended_at: DateTime<Utc>) {
        let floor = self.started_at + Duration::nanoseconds(1);
        self.ended_at = Some(ended_at.max(floor));
    }

    /// True while the visit is still in progress
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Length of the visit; `None` while still open
    pub fn duration(&self) -> Option<Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> VisitSession {
        VisitSession::begin(UserId::new("badge-42"), RoomId::new("lab-1"), Utc::now())
    }

    #[test]
    fn test_begin_is_open() {
        let s = session();
        assert!(s.is_open());
        assert!(s.duration().is_none());
    }

    #[test]
    fn test_close_stamps_end() {
        let mut s = session();
        let end = s.started_at + Duration::seconds(90);
        s.close(end);

        assert!(!s.is_open());
        assert_eq!(s.ended_at, Some(end));
        assert_eq!(s.duration(), Some(Duration::seconds(90)));
    }

    #[test]
    fn test_close_never_produces_zero_duration() {
        let mut s = session();
        // Same instant as the start: end must still land strictly after
        s.close(s.started_at);

        let end = s.ended_at.expect("session should be closed");
        assert!(end > s.started_at);
    }

    #[test]
    fn test_close_never_produces_negative_duration() {
        let mut s = session();
        // A clock that stepped backwards must not yield an inverted interval
        s.close(s.started_at - Duration::seconds(5));

        assert!(s.ended_at.expect("closed") > s.started_at);
    }
}
