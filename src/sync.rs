use std::time::{Duration, Instant};

use crate::models::LogEntry;
use crate::store::KvStore;

/// The single logical slot holding the serialized collection. Shared with
/// the original web client, which uses the same key.
pub const STORAGE_KEY: &str = "facility_logs";

/// How long the "saved" indicator stays up before reverting to idle
pub const SAVED_HOLD: Duration = Duration::from_millis(1500);

/// Visible synchronization state. `Error` is sticky until the next write
/// attempt succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Saving,
    Saved,
    Error,
}

/// Keeps the in-memory collection eventually consistent with the shared
/// store. The whole collection is the unit of exchange: loads and polls
/// replace local state wholesale, and every persist writes the entire
/// serialized collection back to one slot. Two clients writing
/// concurrently race and the last write wins; that is the accepted
/// consistency model, not something this engine tries to repair.
pub struct SyncEngine {
    store: Box<dyn KvStore>,
    key: String,
    status: SyncStatus,
    saved_at: Option<Instant>,
    ready: bool,
    last_poll: Option<Instant>,
    poll_interval: Duration,
    saved_hold: Duration,
}

impl SyncEngine {
    pub fn new(store: Box<dyn KvStore>, poll_interval: Duration) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
            status: SyncStatus::Idle,
            saved_at: None,
            ready: false,
            last_poll: None,
            poll_interval,
            saved_hold: SAVED_HOLD,
        }
    }

    #[cfg(test)]
    fn with_saved_hold(mut self, hold: Duration) -> Self {
        self.saved_hold = hold;
        self
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Readiness gates persisting and polling: nothing else talks to the
    /// store until the one startup load has completed or failed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// One startup load. Fetch and parse failures degrade silently to an
    /// empty collection so the UI always becomes ready.
    pub fn load(&mut self) -> Vec<LogEntry> {
        let entries = match self.store.get(&self.key) {
            Ok(Some(value)) => serde_json::from_str(&value).unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(_) => Vec::new(),
        };
        self.ready = true;
        self.last_poll = Some(Instant::now());
        entries
    }

    /// Write the entire collection to the shared slot. Called after every
    /// local mutation. One attempt, no retry, no rollback of local state:
    /// on failure the error status stays visible until a later write
    /// succeeds.
    pub fn persist(&mut self, entries: &[LogEntry]) {
        if !self.ready {
            return;
        }
        self.status = SyncStatus::Saving;
        self.saved_at = None;

        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(_) => {
                self.status = SyncStatus::Error;
                return;
            }
        };
        match self.store.set(&self.key, &json) {
            Ok(()) => {
                self.status = SyncStatus::Saved;
                self.saved_at = Some(Instant::now());
            }
            Err(_) => {
                self.status = SyncStatus::Error;
            }
        }
    }

    /// Poll the store if the interval has elapsed. Returns the fetched
    /// collection for wholesale replacement of local state, or None when
    /// the poll is not due or failed (failures are best-effort refreshes
    /// and are swallowed; local state stays unchanged until the next
    /// poll).
    pub fn maybe_refresh(&mut self) -> Option<Vec<LogEntry>> {
        if !self.ready {
            return None;
        }
        let due = match self.last_poll {
            Some(at) => at.elapsed() >= self.poll_interval,
            None => true,
        };
        if !due {
            return None;
        }
        self.refresh()
    }

    /// Force one fetch regardless of the poll schedule (same error policy)
    pub fn refresh(&mut self) -> Option<Vec<LogEntry>> {
        if !self.ready {
            return None;
        }
        self.last_poll = Some(Instant::now());
        match self.store.get(&self.key) {
            Ok(Some(value)) => serde_json::from_str(&value).ok(),
            // An absent slot means nobody has written yet
            Ok(None) => Some(Vec::new()),
            Err(_) => None,
        }
    }

    /// Timer hook, called once per event-loop iteration: reverts the
    /// "saved" indicator to idle after its hold time.
    pub fn tick(&mut self) {
        if self.status == SyncStatus::Saved {
            if let Some(at) = self.saved_at {
                if at.elapsed() >= self.saved_hold {
                    self.status = SyncStatus::Idle;
                    self.saved_at = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::models::{IssueStatus, LogEntry, Meridiem, TimeSpec, Urgency, WorkItem};
    use crate::store::StoreError;

    /// In-memory store standing in for the shared slot
    struct FakeStore {
        data: RefCell<HashMap<String, String>>,
        fail_get: bool,
        fail_set: bool,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                data: RefCell::new(HashMap::new()),
                fail_get: false,
                fail_set: false,
            }
        }

        fn seeded(key: &str, value: &str) -> Self {
            let store = Self::new();
            store.data.borrow_mut().insert(key.to_string(), value.to_string());
            store
        }
    }

    impl KvStore for FakeStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_get {
                return Err(StoreError::DirectoryError("offline".to_string()));
            }
            Ok(self.data.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_set {
                return Err(StoreError::DirectoryError("offline".to_string()));
            }
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn entry(id: &str, status: IssueStatus) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            created_at: "2024-05-01T09:00:00+00:00".to_string(),
            updated_at: None,
            date: "2024-05-01".to_string(),
            job: "전기".to_string(),
            writer: "임상식".to_string(),
            work_items: vec![WorkItem {
                id: format!("{}-w", id),
                time: TimeSpec::Twelve {
                    ampm: Meridiem::Am,
                    hour: "09".to_string(),
                    min: "00".to_string(),
                },
                content: "점검".to_string(),
            }],
            has_issue: true,
            issue: "이상 소음".to_string(),
            action: String::new(),
            status,
            urgency: Urgency::Normal,
            need_report: false,
        }
    }

    fn engine_with(store: FakeStore) -> SyncEngine {
        SyncEngine::new(Box::new(store), Duration::ZERO)
    }

    #[test]
    fn load_absent_slot_gives_empty_and_ready() {
        let mut engine = engine_with(FakeStore::new());
        assert!(!engine.is_ready());
        let entries = engine.load();
        assert!(entries.is_empty());
        assert!(engine.is_ready());
        assert_eq!(engine.status(), SyncStatus::Idle);
    }

    #[test]
    fn load_failure_degrades_to_empty() {
        let mut store = FakeStore::new();
        store.fail_get = true;
        let mut engine = engine_with(store);
        let entries = engine.load();
        assert!(entries.is_empty());
        // Readiness is not blocked by the failure
        assert!(engine.is_ready());
    }

    #[test]
    fn load_parse_failure_degrades_to_empty() {
        let mut engine = engine_with(FakeStore::seeded(STORAGE_KEY, "not json"));
        assert!(engine.load().is_empty());
        assert!(engine.is_ready());
    }

    #[test]
    fn persist_before_load_is_gated() {
        let mut engine = engine_with(FakeStore::new());
        engine.persist(&[entry("a", IssueStatus::Done)]);
        assert_eq!(engine.status(), SyncStatus::Idle);
        engine.load();
        // Nothing was written before readiness
        assert!(engine.refresh().unwrap().is_empty());
    }

    #[test]
    fn persist_success_shows_saved_then_reverts_to_idle() {
        let mut engine = engine_with(FakeStore::new()).with_saved_hold(Duration::ZERO);
        engine.load();
        engine.persist(&[entry("a", IssueStatus::Done)]);
        assert_eq!(engine.status(), SyncStatus::Saved);
        engine.tick();
        assert_eq!(engine.status(), SyncStatus::Idle);
    }

    #[test]
    fn saved_status_holds_until_the_delay_elapses() {
        let mut engine = engine_with(FakeStore::new()).with_saved_hold(Duration::from_secs(60));
        engine.load();
        engine.persist(&[entry("a", IssueStatus::Done)]);
        engine.tick();
        assert_eq!(engine.status(), SyncStatus::Saved);
    }

    #[test]
    fn persist_failure_is_sticky_until_next_success() {
        let mut store = FakeStore::new();
        store.fail_set = true;
        let mut engine = engine_with(store);
        engine.load();
        engine.persist(&[entry("a", IssueStatus::Done)]);
        assert_eq!(engine.status(), SyncStatus::Error);

        // Ticks do not clear the error
        engine.tick();
        assert_eq!(engine.status(), SyncStatus::Error);
    }

    #[test]
    fn persist_round_trips_through_refresh() {
        let mut engine = engine_with(FakeStore::new());
        engine.load();
        let entries = vec![entry("a", IssueStatus::Open), entry("b", IssueStatus::Done)];
        engine.persist(&entries);
        assert_eq!(engine.refresh().unwrap(), entries);
    }

    #[test]
    fn poll_replaces_local_state_wholesale() {
        // Local collection A mutated to A'; a poll that resolves with an
        // unrelated remote B must yield exactly B, not a merge.
        let mut engine = engine_with(FakeStore::new());
        let mut local = engine.load();
        local.insert(0, entry("local-edit", IssueStatus::Open));

        let remote = vec![entry("remote-1", IssueStatus::Done)];
        let json = serde_json::to_string(&remote).unwrap();
        // Another client wins the race for the slot
        let other = FakeStore::seeded(STORAGE_KEY, &json);
        let mut engine = engine_with(other);
        engine.load();

        let fetched = engine.maybe_refresh().unwrap();
        assert_eq!(fetched, remote);
    }

    #[test]
    fn poll_respects_the_interval() {
        let store = FakeStore::seeded(STORAGE_KEY, "[]");
        let mut engine = SyncEngine::new(Box::new(store), Duration::from_secs(600));
        engine.load();
        // Just loaded, next poll is not due yet
        assert!(engine.maybe_refresh().is_none());
    }

    #[test]
    fn poll_fetch_failure_is_swallowed() {
        let mut store = FakeStore::seeded(STORAGE_KEY, "[]");
        store.fail_get = true;
        let mut engine = engine_with(store);
        engine.load();
        assert!(engine.refresh().is_none());
        // Status is untouched by poll failures
        assert_eq!(engine.status(), SyncStatus::Idle);
    }

    #[test]
    fn poll_parse_failure_is_swallowed() {
        let mut engine = engine_with(FakeStore::seeded(STORAGE_KEY, "{broken"));
        engine.load();
        assert!(engine.refresh().is_none());
        assert_eq!(engine.status(), SyncStatus::Idle);
    }

    #[test]
    fn refresh_not_ready_returns_none() {
        let mut engine = engine_with(FakeStore::seeded(STORAGE_KEY, "[]"));
        assert!(engine.refresh().is_none());
    }
}
