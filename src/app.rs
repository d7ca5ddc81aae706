use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;

use crate::{
    config::Config,
    counter::KeyCounter,
    report::Reporter,
    store::CountStore,
};

pub struct AppState {
    pub counter: KeyCounter,
    pub reporter: Arc<Reporter>,
    store: CountStore,
    total: AtomicU64,
    last_saved: AtomicU64,
}

impl AppState {
    pub fn initialize(config: &Config) -> Result<Arc<Self>> {
        let store = CountStore::new(config)?;
        let reporter = Arc::new(Reporter::new(config.report_url(), config.report_field())?);

        Self::with_store(store, reporter)
    }

    fn with_store(store: CountStore, reporter: Arc<Reporter>) -> Result<Arc<Self>> {
        let total = store.load_total()?;

        Ok(Arc::new(Self {
            counter: KeyCounter::new(),
            reporter,
            store,
            total: AtomicU64::new(total),
            last_saved: AtomicU64::new(0),
        }))
    }

    pub fn count(&self) -> u64 {
        self.counter.read()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Reset the session count. The save baseline resets with it, so the
    /// next save does not attribute discarded keystrokes to the total.
    pub fn reset(&self) {
        self.counter.reset();
        self.last_saved.store(0, Ordering::SeqCst);
    }

    /// Append a `(now, count)` line to the session log and fold keystrokes
    /// recorded since the previous save into the lifetime total.
    ///
    /// Saving twice without new keystrokes appends two log lines but leaves
    /// the total untouched, so the close-time flush never double-counts.
    pub fn save_snapshot(&self) -> Result<()> {
        let count = self.counter.read();
        self.store.append_session(Local::now(), count)?;

        let delta = count.saturating_sub(self.last_saved.load(Ordering::SeqCst));
        if delta > 0 {
            let total = self.total.load(Ordering::SeqCst).saturating_add(delta);
            self.store.save_total(total)?;
            self.total.store(total, Ordering::SeqCst);
        }
        self.last_saved.store(count, Ordering::SeqCst);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::at(dir.path()).unwrap();
        let reporter = Arc::new(Reporter::new("", "count").unwrap());
        let state = AppState::with_store(store, reporter).unwrap();
        (state, dir)
    }

    fn press(state: &AppState, n: u64) {
        for _ in 0..n {
            state.counter.increment();
        }
    }

    #[test]
    fn save_folds_new_keystrokes_into_the_total() {
        let (state, _dir) = state();

        press(&state, 5);
        state.save_snapshot().unwrap();
        assert_eq!(state.total(), 5);

        press(&state, 3);
        state.save_snapshot().unwrap();
        assert_eq!(state.total(), 8);
    }

    #[test]
    fn repeated_saves_do_not_double_count() {
        let (state, dir) = state();

        press(&state, 3);
        state.save_snapshot().unwrap();
        state.save_snapshot().unwrap();

        assert_eq!(state.total(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("total.txt")).unwrap().trim(),
            "3"
        );

        // Both saves still appended their own session line.
        let log = fs::read_to_string(dir.path().join("count.txt")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn reset_zeroes_count_and_save_baseline() {
        let (state, _dir) = state();

        press(&state, 4);
        state.save_snapshot().unwrap();

        state.reset();
        assert_eq!(state.count(), 0);

        press(&state, 2);
        state.save_snapshot().unwrap();
        assert_eq!(state.total(), 6);
    }

    #[test]
    fn total_survives_across_runs() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = CountStore::at(dir.path()).unwrap();
            let reporter = Arc::new(Reporter::new("", "count").unwrap());
            let state = AppState::with_store(store, reporter).unwrap();
            press(&state, 7);
            state.save_snapshot().unwrap();
        }

        let store = CountStore::at(dir.path()).unwrap();
        let reporter = Arc::new(Reporter::new("", "count").unwrap());
        let state = AppState::with_store(store, reporter).unwrap();
        assert_eq!(state.total(), 7);
        assert_eq!(state.count(), 0);
    }
}
