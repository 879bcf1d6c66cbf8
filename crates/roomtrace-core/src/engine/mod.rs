//! Occupancy engine orchestrating rooms, sessions, and history
//!
//! The engine owns all shared state (no ambient globals) and exposes the
//! single mutating operation, [`OccupancyEngine::record_access`]. Whether an
//! event is an entry or an exit is inferred from current occupancy: first
//! event for a user toggles them in, the next toggles them out.
//!
//! # Concurrency
//!
//! Each room has its own lock, held across the whole read-decide-write
//! sequence, so events for one room apply strictly one at a time while
//! events for different rooms proceed in parallel. A user can only ever be
//! present in one room, so per-room serialization also serializes each
//! user's session transitions. History keeps its own critical section for
//! appends racing in from different rooms.
//!
//! Lock order is always room, then tracker, then history; never the
//! reverse.

use crate::domain::ids::{RoomId, UserId};
use crate::domain::occupancy::RoomRegistry;
use crate::domain::visit::{SessionHistory, SessionTracker, VisitSession};
use crate::error::{Error, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// How the engine interpreted one access event
///
/// Recording an access never fails; the outcome is a diagnostic for callers
/// that want to observe what the toggle resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessOutcome {
    /// The user entered the room; a session was opened
    Entered {
        /// The freshly opened session
        session: VisitSession,
    },
    /// The user exited the room; their session was closed and archived
    Exited {
        /// The closed session, as archived
        session: VisitSession,
    },
    /// The user exited, but no open session was found for them
    ///
    /// Presence was still removed; nothing was archived. Happens for users
    /// whose presence was seeded, or after occupancy and session state have
    /// drifted apart.
    ExitedUntracked,
}

impl AccessOutcome {
    /// True when the event was interpreted as an entry
    pub fn is_entry(&self) -> bool {
        matches!(self, Self::Entered { .. })
    }

    /// True when the event was interpreted as an exit
    pub fn is_exit(&self) -> bool {
        !self.is_entry()
    }
}

/// Point-in-time counts across the whole engine
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyStats {
    /// Rooms ever referenced
    pub rooms: usize,
    /// Users currently present, summed over all rooms
    pub occupants: usize,
    /// Sessions currently open
    pub open_sessions: usize,
    /// Sessions archived in history
    pub completed_sessions: usize,
    /// Exits recorded without a matching open session
    pub anomalies: u64,
}

/// Engine deriving presence and visit history from access events
#[derive(Debug, Default)]
pub struct OccupancyEngine {
    registry: RoomRegistry,
    tracker: Mutex<SessionTracker>,
    history: SessionHistory,
    anomalies: AtomicU64,
}

impl OccupancyEngine {
    /// Create an engine with no rooms and no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one access event for a user at a room
    ///
    /// Unknown rooms are created on the spot and the event counts as an
    /// entry. For known rooms the event toggles the user's presence:
    /// absent means entry, present means exit. On exit the user's session
    /// is closed and archived; if no session is open for them the exit
    /// still removes presence, and the gap is reported as
    /// [`AccessOutcome::ExitedUntracked`].
    ///
    /// Identifiers are treated as opaque tokens; callers validate them at
    /// the ingestion boundary.
    pub async fn record_access(&self, room_id: &RoomId, user_id: &UserId) -> AccessOutcome {
        let slot = self.registry.get_or_create(room_id).await;
        let mut room = slot.lock().await;
        let now = Utc::now();

        if !room.is_present(user_id) {
            room.insert(user_id.clone());
            let session = self
                .tracker
                .lock()
                .await
                .open(user_id.clone(), room_id.clone(), now);

            info!(user = %user_id, room = %room_id, "User entered room");
            AccessOutcome::Entered { session }
        } else {
            room.remove(user_id);
            match self.tracker.lock().await.close(user_id, now) {
                Some(session) => {
                    self.history.append(session.clone());
                    info!(user = %user_id, room = %room_id, "User exited room");
                    AccessOutcome::Exited { session }
                }
                None => {
                    self.anomalies.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        user = %user_id,
                        room = %room_id,
                        "User was present but had no open session; exit recorded without history entry"
                    );
                    AccessOutcome::ExitedUntracked
                }
            }
        }
    }

    /// Seed a room with users already present, without opening sessions
    ///
    /// Mirrors installations where occupancy is known at startup but entry
    /// times are not: seeded users exist only in the occupant set, so their
    /// first exit resolves to [`AccessOutcome::ExitedUntracked`].
    ///
    /// Fails if any identifier is empty or any user is already present
    /// somewhere. Intended for initialization, before event traffic starts.
    pub async fn seed_room(
        &self,
        room_id: &RoomId,
        occupants: impl IntoIterator<Item = UserId>,
    ) -> Result<()> {
        if room_id.as_str().is_empty() {
            return Err(Error::InvalidIdentifier("empty room identifier".to_string()));
        }

        let occupants: Vec<UserId> = occupants.into_iter().collect();
        for user in &occupants {
            if user.as_str().is_empty() {
                return Err(Error::InvalidIdentifier("empty user identifier".to_string()));
            }
        }

        for existing in self.registry.room_ids().await {
            let Some(slot) = self.registry.get(&existing).await else {
                continue;
            };
            let room = slot.lock().await;
            for user in &occupants {
                if room.is_present(user) {
                    return Err(Error::AlreadyPresent {
                        user: user.clone(),
                        room: existing,
                    });
                }
            }
        }

        let slot = self.registry.get_or_create(room_id).await;
        let mut room = slot.lock().await;
        let seeded = occupants.len();
        for user in occupants {
            room.insert(user);
        }

        info!(room = %room_id, occupants = seeded, "Seeded room occupancy");
        Ok(())
    }

    // ========== Read-only queries ==========

    /// Completed sessions in closure order (owned snapshot)
    pub fn completed_sessions(&self) -> Vec<VisitSession> {
        self.history.snapshot()
    }

    /// Whether a room has ever been referenced
    pub async fn room_exists(&self, room_id: &RoomId) -> bool {
        self.registry.contains(room_id).await
    }

    /// Whether a user is currently present in a room
    ///
    /// `false` for rooms that have never been referenced.
    pub async fn is_present(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        match self.registry.get(room_id).await {
            Some(slot) => slot.lock().await.is_present(user_id),
            None => false,
        }
    }

    /// Current occupants of a room, sorted; empty for unknown rooms
    pub async fn occupants(&self, room_id: &RoomId) -> Vec<UserId> {
        match self.registry.get(room_id).await {
            Some(slot) => slot.lock().await.occupants(),
            None => Vec::new(),
        }
    }

    /// The open session for a user, if any
    pub async fn open_session(&self, user_id: &UserId) -> Option<VisitSession> {
        self.tracker.lock().await.open_session(user_id).cloned()
    }

    /// All open sessions, ordered by user identifier
    pub async fn open_sessions(&self) -> Vec<VisitSession> {
        let tracker = self.tracker.lock().await;
        tracker
            .open_user_ids()
            .iter()
            .filter_map(|user| tracker.open_session(user).cloned())
            .collect()
    }

    /// Exits seen without a matching open session so far
    pub fn anomaly_count(&self) -> u64 {
        self.anomalies.load(Ordering::Relaxed)
    }

    /// Point-in-time counts across rooms, sessions, and history
    pub async fn stats(&self) -> OccupancyStats {
        let room_ids = self.registry.room_ids().await;
        let mut occupants = 0;
        for id in &room_ids {
            if let Some(slot) = self.registry.get(id).await {
                occupants += slot.lock().await.len();
            }
        }

        OccupancyStats {
            rooms: room_ids.len(),
            occupants,
            open_sessions: self.tracker.lock().await.open_count(),
            completed_sessions: self.history.len(),
            anomalies: self.anomaly_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_access_enters_and_creates_room() {
        let engine = OccupancyEngine::new();
        let room = RoomId::new("1");
        let user = UserId::new("42");

        assert!(!engine.room_exists(&room).await);

        let outcome = engine.record_access(&room, &user).await;
        assert!(outcome.is_entry());
        assert!(engine.room_exists(&room).await);
        assert!(engine.is_present(&room, &user).await);
        assert_eq!(engine.occupants(&room).await, vec![user.clone()]);

        let open = engine.open_session(&user).await.expect("session open");
        assert!(open.is_open());
        assert_eq!(open.room_id, room);
        assert!(engine.completed_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_second_access_exits_and_archives() {
        let engine = OccupancyEngine::new();
        let room = RoomId::new("1");
        let user = UserId::new("42");

        engine.record_access(&room, &user).await;
        let outcome = engine.record_access(&room, &user).await;

        let session = match outcome {
            AccessOutcome::Exited { session } => session,
            other => panic!("expected exit, got {other:?}"),
        };
        assert!(!engine.is_present(&room, &user).await);
        assert!(engine.open_session(&user).await.is_none());

        let history = engine.completed_sessions();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, session.id);
        assert_eq!(history[0].user_id, user);
        assert_eq!(history[0].room_id, room);
        assert!(history[0].ended_at.expect("closed") > history[0].started_at);
    }

    #[tokio::test]
    async fn test_toggle_cycle_can_repeat() {
        let engine = OccupancyEngine::new();
        let room = RoomId::new("lab");
        let user = UserId::new("7");

        for _ in 0..3 {
            assert!(engine.record_access(&room, &user).await.is_entry());
            assert!(engine.record_access(&room, &user).await.is_exit());
        }

        assert_eq!(engine.completed_sessions().len(), 3);
        assert!(engine.occupants(&room).await.is_empty());
    }

    #[tokio::test]
    async fn test_seeded_exit_is_untracked() {
        let engine = OccupancyEngine::new();
        let room = RoomId::new("2");
        let user = UserId::new("4");

        engine
            .seed_room(&room, [user.clone(), UserId::new("5"), UserId::new("6")])
            .await
            .expect("seeding should succeed");
        assert_eq!(engine.occupants(&room).await.len(), 3);
        assert!(engine.open_session(&user).await.is_none());

        let outcome = engine.record_access(&room, &user).await;
        assert_eq!(outcome, AccessOutcome::ExitedUntracked);
        assert!(!engine.is_present(&room, &user).await);
        assert!(engine.completed_sessions().is_empty());
        assert_eq!(engine.anomaly_count(), 1);
    }

    #[tokio::test]
    async fn test_seeded_user_reentry_opens_session() {
        let engine = OccupancyEngine::new();
        let room = RoomId::new("2");
        let user = UserId::new("4");
        engine.seed_room(&room, [user.clone()]).await.unwrap();

        // Exit without history, then a normal visit
        engine.record_access(&room, &user).await;
        assert!(engine.record_access(&room, &user).await.is_entry());
        assert!(engine.record_access(&room, &user).await.is_exit());

        assert_eq!(engine.completed_sessions().len(), 1);
        assert_eq!(engine.anomaly_count(), 1);
    }

    #[tokio::test]
    async fn test_seed_rejects_duplicate_presence() {
        let engine = OccupancyEngine::new();
        let user = UserId::new("4");

        engine.seed_room(&RoomId::new("a"), [user.clone()]).await.unwrap();
        let err = engine
            .seed_room(&RoomId::new("b"), [user.clone()])
            .await
            .expect_err("user is already present elsewhere");

        assert!(matches!(err, Error::AlreadyPresent { .. }));
    }

    #[tokio::test]
    async fn test_seed_rejects_empty_identifiers() {
        let engine = OccupancyEngine::new();

        let err = engine
            .seed_room(&RoomId::new(""), [UserId::new("4")])
            .await
            .expect_err("empty room id");
        assert!(matches!(err, Error::InvalidIdentifier(_)));

        let err = engine
            .seed_room(&RoomId::new("a"), [UserId::new("")])
            .await
            .expect_err("empty user id");
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_stats_reflect_state() {
        let engine = OccupancyEngine::new();
        engine.record_access(&RoomId::new("a"), &UserId::new("1")).await;
        engine.record_access(&RoomId::new("b"), &UserId::new("2")).await;
        engine.record_access(&RoomId::new("b"), &UserId::new("2")).await;

        let stats = engine.stats().await;
        assert_eq!(stats.rooms, 2);
        assert_eq!(stats.occupants, 1);
        assert_eq!(stats.open_sessions, 1);
        assert_eq!(stats.completed_sessions, 1);
        assert_eq!(stats.anomalies, 0);
    }

    #[tokio::test]
    async fn test_open_sessions_ordered_by_user() {
        let engine = OccupancyEngine::new();
        engine.record_access(&RoomId::new("a"), &UserId::new("zed")).await;
        engine.record_access(&RoomId::new("b"), &UserId::new("amy")).await;

        let open = engine.open_sessions().await;
        let users: Vec<&str> = open.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(users, vec!["amy", "zed"]);
    }
}
