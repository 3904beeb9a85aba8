use crate::config::Settings;
use crate::estimate::EstimationClient;
use crate::factors::EmissionFactorTable;
use crate::pipeline::{AggregationPipeline, GenerationTracker};
use crate::source::{ActivityRecordSource, HttpRecordSource, SessionCredential};
use std::{
    collections::HashMap,
    ops::Deref,
    sync::{Arc, Mutex, MutexGuard},
};

type Trackers = Arc<Mutex<HashMap<SessionCredential, Arc<GenerationTracker>>>>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: AggregationPipeline<dyn ActivityRecordSource>,
    pub records: HttpRecordSource,
    pub estimator: EstimationClient,
    generations: Trackers,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let records = HttpRecordSource::new(settings)?;
        let source: Arc<dyn ActivityRecordSource> = Arc::new(records.clone());
        Ok(Self {
            pipeline: AggregationPipeline::new(source, EmissionFactorTable::default()),
            records,
            estimator: EstimationClient::new(settings)?,
            generations: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    // Report requests from one session share a tracker while any of them is
    // in flight; the entry goes away with the last lease.
    pub fn tracker_for(&self, credential: &SessionCredential) -> TrackerLease {
        let tracker = Arc::clone(lock(&self.generations).entry(credential.clone()).or_default());
        TrackerLease {
            trackers: Arc::clone(&self.generations),
            credential: credential.clone(),
            tracker,
        }
    }

    pub fn active_sessions(&self) -> usize {
        lock(&self.generations).len()
    }
}

pub struct TrackerLease {
    trackers: Trackers,
    credential: SessionCredential,
    tracker: Arc<GenerationTracker>,
}

impl Deref for TrackerLease {
    type Target = GenerationTracker;

    fn deref(&self) -> &GenerationTracker {
        &self.tracker
    }
}

impl Drop for TrackerLease {
    fn drop(&mut self) {
        let mut trackers = lock(&self.trackers);
        // The map and this lease are the only holders left.
        let idle = trackers.get(&self.credential).is_some_and(|tracker| {
            Arc::ptr_eq(tracker, &self.tracker) && Arc::strong_count(&self.tracker) == 2
        });
        if idle {
            trackers.remove(&self.credential);
        }
    }
}

fn lock(trackers: &Trackers) -> MutexGuard<'_, HashMap<SessionCredential, Arc<GenerationTracker>>> {
    trackers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trackers_are_released_after_requests() {
        let state = AppState::new(&Settings::default()).unwrap();
        for i in 0..100 {
            let lease = state.tracker_for(&SessionCredential::new(format!("random-{i}")));
            lease.begin();
        }
        assert_eq!(state.active_sessions(), 0);
    }

    #[test]
    fn concurrent_requests_share_one_tracker() {
        let state = AppState::new(&Settings::default()).unwrap();
        let alice = SessionCredential::new("alice");

        let first = state.tracker_for(&alice);
        let older = first.begin();
        let second = state.tracker_for(&alice);
        let newer = second.begin();
        let _bob = state.tracker_for(&SessionCredential::new("bob"));
        assert_eq!(state.active_sessions(), 2);
        assert!(!first.is_current(older));
        assert!(first.is_current(newer));

        drop(second);
        assert_eq!(state.active_sessions(), 2);
        drop(first);
        assert_eq!(state.active_sessions(), 1);
    }
}
