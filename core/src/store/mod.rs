//! Key-Value State Store
//!
//! Holds the application state as a [`Value`] tree seeded from the typed
//! [`AppState`] defaults, and notifies registered observers when a value
//! actually changes.
//!
//! # Contract
//!
//! - All mutation goes through [`StateStore::set`] / [`StateStore::update`];
//!   the store is the only shared mutable resource in the core.
//! - A write of an equal value is a no-op: no notification fires.
//! - Observers on the exact written path run synchronously, in registration
//!   order, each receiving `(new, old)`. An observer error is recorded in
//!   the log sink and does not stop the remaining observers.
//! - Observers must not reach back into the store; they run while the
//!   caller holds it.

mod state;
mod value;

use std::collections::HashMap;
use std::sync::Arc;

pub use state::{keys, AnimationFlags, AppState, Theme, View};
pub use value::Value;

use crate::logsink::LogSink;

/// Observer callback: receives `(new, old)` for the watched path.
pub type ObserverFn = Box<dyn FnMut(&Value, &Value) -> anyhow::Result<()> + Send>;

/// Handle returned by [`StateStore::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct ObserverSlot {
    id: ObserverId,
    callback: ObserverFn,
}

/// The state store.
pub struct StateStore {
    root: Value,
    observers: HashMap<String, Vec<ObserverSlot>>,
    next_observer: u64,
    log: Arc<LogSink>,
}

impl StateStore {
    /// Create a store seeded from `initial`.
    #[must_use]
    pub fn new(initial: AppState, log: Arc<LogSink>) -> Self {
        Self {
            root: initial.to_value(),
            observers: HashMap::new(),
            next_observer: 0,
            log,
        }
    }

    /// Read the value at a dot-separated path; `None` if absent.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.root.get_path(path)
    }

    /// Write `value` at `path`, creating intermediate maps as needed.
    ///
    /// No notification fires when the new value equals the old one;
    /// otherwise observers on exactly `path` run synchronously with
    /// `(new, old)`. A previously absent path reports `Value::Null` as the
    /// old value.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let new = value.into();
        let old = self
            .root
            .get_path(path)
            .cloned()
            .unwrap_or(Value::Null);
        if old == new {
            return;
        }
        self.root.set_path(path, new.clone());
        self.notify(path, &new, &old);
    }

    /// Apply multiple writes sequentially via [`StateStore::set`], in the
    /// iteration order of `pairs`; each write triggers its own
    /// notification.
    pub fn update<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (path, value) in pairs {
            self.set(&path, value);
        }
    }

    /// Restore the fixed initial defaults as a bulk replacement.
    ///
    /// No per-key notifications fire; registered observers stay
    /// subscribed.
    pub fn reset(&mut self) {
        self.root = AppState::default().to_value();
    }

    /// Register `callback` for changes at exactly `path`.
    ///
    /// Each call creates a distinct slot with its own id; a slot fires at
    /// most once per notification cycle.
    pub fn subscribe<F>(&mut self, path: &str, callback: F) -> ObserverId
    where
        F: FnMut(&Value, &Value) -> anyhow::Result<()> + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers
            .entry(path.to_string())
            .or_default()
            .push(ObserverSlot {
                id,
                callback: Box::new(callback),
            });
        id
    }

    /// Remove a previously registered observer.
    ///
    /// Returns `false` when the id is unknown (already unsubscribed).
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        for slots in self.observers.values_mut() {
            if let Some(pos) = slots.iter().position(|slot| slot.id == id) {
                slots.remove(pos);
                return true;
            }
        }
        false
    }

    fn notify(&mut self, path: &str, new: &Value, old: &Value) {
        let Some(slots) = self.observers.get_mut(path) else {
            return;
        };
        for slot in slots.iter_mut() {
            if let Err(err) = (slot.callback)(new, old) {
                self.log.error_with(
                    &format!("observer failed for '{path}'"),
                    serde_json::json!({ "error": err.to_string() }),
                );
            }
        }
    }

    // === Typed convenience readers ===

    /// Current view; falls back to `Home` if the tree was damaged.
    #[must_use]
    pub fn view(&self) -> View {
        self.get(keys::VIEW)
            .and_then(Value::as_str)
            .and_then(View::parse)
            .unwrap_or_default()
    }

    /// Current 1-based project index (0 when no project is open).
    #[must_use]
    pub fn project_index(&self) -> usize {
        self.get(keys::PROJECT_INDEX)
            .and_then(Value::as_int)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0)
    }

    /// Whether audio cues are enabled.
    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.get(keys::SOUND_ENABLED)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Current theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.get(keys::THEME)
            .and_then(Value::as_str)
            .and_then(Theme::parse)
            .unwrap_or_default()
    }

    /// Whether startup is still in progress.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.get(keys::LOADING)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Whether transitions should skip their delays.
    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.get(keys::ANIM_REDUCED_MOTION)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::logsink::{LogLevel, LogSink};

    fn store() -> (StateStore, Arc<LogSink>) {
        let log = Arc::new(LogSink::new(100, false));
        (StateStore::new(AppState::default(), Arc::clone(&log)), log)
    }

    fn record_changes(
        store: &mut StateStore,
        path: &str,
    ) -> Arc<Mutex<Vec<(Value, Value)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(path, move |new, old| {
            sink.lock().push((new.clone(), old.clone()));
            Ok(())
        });
        seen
    }

    #[test]
    fn test_set_notifies_once_with_new_and_old() {
        let (mut store, _log) = store();
        let seen = record_changes(&mut store, keys::VIEW);

        store.set(keys::VIEW, "portfolio");

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (Value::from("portfolio"), Value::from("home")));
    }

    #[test]
    fn test_equal_value_does_not_notify() {
        let (mut store, _log) = store();
        let seen = record_changes(&mut store, keys::VIEW);

        store.set(keys::VIEW, "portfolio");
        store.set(keys::VIEW, "portfolio");

        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_two_distinct_values_notify_twice() {
        let (mut store, _log) = store();
        let seen = record_changes(&mut store, keys::VIEW);

        store.set(keys::VIEW, "portfolio");
        store.set(keys::VIEW, "project");

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (Value::from("project"), Value::from("portfolio")));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let (mut store, _log) = store();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(keys::VIEW, move |_, _| {
            *sink.lock() += 1;
            Ok(())
        });
        let still = record_changes(&mut store, keys::VIEW);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));

        store.set(keys::VIEW, "portfolio");

        assert_eq!(*seen.lock(), 0);
        assert_eq!(still.lock().len(), 1);
    }

    #[test]
    fn test_observer_error_does_not_halt_cycle() {
        let (mut store, log) = store();
        store.subscribe(keys::VIEW, |_, _| anyhow::bail!("boom"));
        let seen = record_changes(&mut store, keys::VIEW);

        store.set(keys::VIEW, "portfolio");

        assert_eq!(seen.lock().len(), 1);
        assert_eq!(log.by_level(LogLevel::Error).len(), 1);
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let (mut store, _log) = store();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            store.subscribe(keys::VIEW, move |_, _| {
                sink.lock().push(tag);
                Ok(())
            });
        }

        store.set(keys::VIEW, "portfolio");

        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_update_applies_in_iteration_order() {
        let (mut store, _log) = store();
        let views = record_changes(&mut store, keys::VIEW);
        let indices = record_changes(&mut store, keys::PROJECT_INDEX);

        store.update([
            (keys::VIEW.to_string(), Value::from("project")),
            (keys::PROJECT_INDEX.to_string(), Value::from(2usize)),
        ]);

        assert_eq!(views.lock().len(), 1);
        assert_eq!(indices.lock().len(), 1);
        assert_eq!(store.view(), View::Project);
        assert_eq!(store.project_index(), 2);
    }

    #[test]
    fn test_reset_restores_defaults_without_notifying() {
        let (mut store, _log) = store();
        store.set(keys::VIEW, "project");
        store.set(keys::PROJECT_INDEX, 4usize);
        store.set(keys::SOUND_ENABLED, false);
        store.set(keys::THEME, "light");
        store.set(keys::LOADING, true);

        let seen = record_changes(&mut store, keys::VIEW);
        store.reset();

        assert_eq!(seen.lock().len(), 0);
        assert_eq!(store.view(), View::Home);
        assert_eq!(store.project_index(), 0);
        assert!(store.sound_enabled());
        assert_eq!(store.theme(), Theme::Dark);
        assert!(!store.loading());
    }

    #[test]
    fn test_absent_path_reads_none_and_deep_write_creates() {
        let (mut store, _log) = store();
        assert_eq!(store.get("nothing.here"), None);

        store.set("debug.grid.outline", true);
        assert_eq!(
            store.get("debug.grid.outline").and_then(Value::as_bool),
            Some(true)
        );
    }

    #[test]
    fn test_first_write_reports_null_old_value() {
        let (mut store, _log) = store();
        let seen = record_changes(&mut store, "debug.outline");

        store.set("debug.outline", true);

        assert_eq!(seen.lock()[0].1, Value::Null);
    }
}
