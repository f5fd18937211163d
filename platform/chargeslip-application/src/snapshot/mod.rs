use chargeslip_domain::repositories::snapshot::SnapshotStore;
use chargeslip_domain::value_objects::snapshot::{FormSnapshot, SNAPSHOT_VERSION};
use std::time::{Duration, Instant};

/// Loads the last snapshot, falling back to `fallback` when there is none,
/// it cannot be read, or it was written by an unknown format version.
pub fn restore(store: &dyn SnapshotStore, fallback: FormSnapshot) -> FormSnapshot {
    match store.load() {
        Ok(Some(snapshot)) if snapshot.version == SNAPSHOT_VERSION => {
            tracing::info!(
                forms = snapshot.forms.len(),
                active = %snapshot.active_category,
                "restored form snapshot"
            );
            snapshot
        }
        Ok(Some(snapshot)) => {
            tracing::warn!(
                version = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "ignoring snapshot with unsupported version"
            );
            fallback
        }
        Ok(None) => fallback,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load snapshot; starting fresh");
            fallback
        }
    }
}

pub fn persist(store: &dyn SnapshotStore, snapshot: &FormSnapshot) -> Result<(), String> {
    let mut stamped = snapshot.clone();
    stamped.version = SNAPSHOT_VERSION;
    stamped.saved_at = Some(chrono::Utc::now());
    store.save(&stamped)
}

/// Coalesces bursts of edits into one write once `delay` has passed since
/// the last edit.
#[derive(Debug, Clone)]
pub struct DebouncedSnapshot {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl DebouncedSnapshot {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn mark_dirty(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True (and clears the pending edit) when a write is due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// Clears a pending edit regardless of timing (used on shutdown).
    pub fn take_pending(&mut self) -> bool {
        self.pending_since.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{persist, restore, DebouncedSnapshot};
    use chargeslip_domain::repositories::snapshot::SnapshotStore;
    use chargeslip_domain::value_objects::instrument::InstrumentCategory;
    use chargeslip_domain::value_objects::snapshot::{FormSnapshot, Theme};
    use std::cell::RefCell;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct MemoryStore {
        slot: RefCell<Option<FormSnapshot>>,
        fail_load: bool,
    }

    impl SnapshotStore for MemoryStore {
        fn load(&self) -> Result<Option<FormSnapshot>, String> {
            if self.fail_load {
                return Err("disk on fire".to_string());
            }
            Ok(self.slot.borrow().clone())
        }

        fn save(&self, snapshot: &FormSnapshot) -> Result<(), String> {
            *self.slot.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }
    }

    #[test]
    fn persist_then_restore_returns_saved_state() {
        let store = MemoryStore::default();
        let snapshot = FormSnapshot {
            theme: Theme::Light,
            active_category: InstrumentCategory::EquityOptions,
            ..FormSnapshot::default()
        };
        persist(&store, &snapshot).expect("persist");

        let restored = restore(&store, FormSnapshot::default());
        assert_eq!(restored.theme, Theme::Light);
        assert_eq!(restored.active_category, InstrumentCategory::EquityOptions);
        assert!(restored.saved_at.is_some());
    }

    #[test]
    fn unknown_version_restores_fallback() {
        let store = MemoryStore::default();
        store
            .save(&FormSnapshot {
                version: 99,
                theme: Theme::Light,
                ..FormSnapshot::default()
            })
            .expect("save");
        let restored = restore(&store, FormSnapshot::default());
        assert_eq!(restored, FormSnapshot::default());
    }

    #[test]
    fn load_error_restores_fallback() {
        let store = MemoryStore {
            fail_load: true,
            ..MemoryStore::default()
        };
        let fallback = FormSnapshot {
            active_category: InstrumentCategory::CurrencyFutures,
            ..FormSnapshot::default()
        };
        assert_eq!(restore(&store, fallback.clone()), fallback);
    }

    #[test]
    fn debounce_waits_for_quiet_period() {
        let mut debounce = DebouncedSnapshot::new(Duration::from_millis(500));
        let t0 = Instant::now();
        assert!(!debounce.take_due(t0));

        debounce.mark_dirty(t0);
        assert!(!debounce.take_due(t0 + Duration::from_millis(300)));

        debounce.mark_dirty(t0 + Duration::from_millis(400));
        assert!(!debounce.take_due(t0 + Duration::from_millis(800)));
        assert!(debounce.take_due(t0 + Duration::from_millis(900)));
        assert!(!debounce.is_pending());
        assert!(!debounce.take_due(t0 + Duration::from_millis(2000)));
    }

    #[test]
    fn take_pending_flushes_immediately() {
        let mut debounce = DebouncedSnapshot::new(Duration::from_secs(60));
        debounce.mark_dirty(Instant::now());
        assert!(debounce.take_pending());
        assert!(!debounce.take_pending());
    }
}
