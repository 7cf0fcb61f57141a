use crate::domain::models::{appointment::Appointment, availability::WeeklyAvailability};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

pub type SlotKey = (String, NaiveDate);

/// Store reads behind one `(trainer, date)` slot list.
#[derive(Debug, Clone)]
pub struct DayInputs {
    pub weekly: WeeklyAvailability,
    pub booked: Vec<Appointment>,
}

struct Entry {
    inputs: DayInputs,
    stored_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<SlotKey, Entry>,
    // bumped by every invalidation, so fetches that started earlier cannot store
    generations: HashMap<SlotKey, u64>,
}

/// Short-lived per-date cache. Entries are dropped on every write that
/// touches their key and expire after `ttl` regardless.
///
/// Readers take a `generation` before going to the store and hand it back to
/// `insert`; an invalidation in between makes that insert a no-op.
pub struct SlotCache {
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl SlotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, state: RwLock::new(CacheState::default()) }
    }

    pub fn get(&self, trainer_id: &str, date: NaiveDate) -> Option<DayInputs> {
        let state = self.state.read().ok()?;
        let entry = state.entries.get(&(trainer_id.to_string(), date))?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        debug!(trainer_id, %date, "Slot cache hit");
        Some(entry.inputs.clone())
    }

    pub fn generation(&self, trainer_id: &str, date: NaiveDate) -> u64 {
        self.state
            .read()
            .ok()
            .and_then(|state| state.generations.get(&(trainer_id.to_string(), date)).copied())
            .unwrap_or(0)
    }

    /// Stores `inputs` unless the key was invalidated after `generation` was read.
    pub fn insert(&self, trainer_id: &str, date: NaiveDate, generation: u64, inputs: DayInputs) {
        if self.ttl.is_zero() {
            return;
        }
        let Ok(mut state) = self.state.write() else {
            return;
        };
        let key = (trainer_id.to_string(), date);
        let current = state.generations.get(&key).copied().unwrap_or(0);
        if current != generation {
            debug!(trainer_id, %date, "Discarding slot inputs fetched before an invalidation");
            return;
        }
        state.entries.insert(key, Entry { inputs, stored_at: Instant::now() });
    }

    pub fn invalidate(&self, trainer_id: &str, date: NaiveDate) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        let key = (trainer_id.to_string(), date);
        *state.generations.entry(key.clone()).or_insert(0) += 1;
        if state.entries.remove(&key).is_some() {
            debug!(trainer_id, %date, "Slot cache invalidated");
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
