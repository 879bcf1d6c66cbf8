//! Append-only archive of completed visit sessions

use super::session::VisitSession;
use std::sync::RwLock;

/// Completed sessions in closure order
///
/// Entries are never mutated, reordered, or removed once appended. The
/// internal lock is the archive's own critical section: closures racing in
/// from different rooms append safely without touching any room lock.
#[derive(Debug, Default)]
pub struct SessionHistory {
    completed: RwLock<Vec<VisitSession>>,
}

impl SessionHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closed session
    pub fn append(&self, session: VisitSession) {
        debug_assert!(!session.is_open(), "only closed sessions are archived");
        self.completed.write().unwrap().push(session);
    }

    /// Owned copy of all completed sessions, in closure order
    ///
    /// A snapshot: later appends do not show up in it, and mutating it
    /// cannot touch the archive.
    pub fn snapshot(&self) -> Vec<VisitSession> {
        self.completed.read().unwrap().clone()
    }

    /// Number of completed sessions
    pub fn len(&self) -> usize {
        self.completed.read().unwrap().len()
    }

    /// True when nothing has been archived yet
    pub fn is_empty(&self) -> bool {
        self.completed.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{RoomId, UserId};
    use chrono::Utc;

    fn closed_session(user: &str) -> VisitSession {
        let mut s = VisitSession::begin(UserId::new(user), RoomId::new("lobby"), Utc::now());
        s.close(Utc::now());
        s
    }

    #[test]
    fn test_append_preserves_order() {
        let history = SessionHistory::new();
        history.append(closed_session("a"));
        history.append(closed_session("b"));
        history.append(closed_session("c"));

        let all = history.snapshot();
        let users: Vec<&str> = all.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(users, vec!["a", "b", "c"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let history = SessionHistory::new();
        history.append(closed_session("a"));

        let mut snapshot = history.snapshot();
        snapshot.clear();

        assert!(snapshot.is_empty());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_earlier_snapshot_is_prefix_of_later() {
        let history = SessionHistory::new();
        history.append(closed_session("a"));
        let first = history.snapshot();

        history.append(closed_session("b"));
        let second = history.snapshot();

        assert_eq!(&second[..first.len()], &first[..]);
    }
}
