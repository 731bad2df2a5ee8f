//! InMemoryInsightsStore - テスト用のアドバイスキャッシュ

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{AdvisoryPatch, AdvisoryState};
use crate::error::Result;
use crate::ports::{Clock, InsightsStore, SystemClock};

pub struct InMemoryInsightsStore {
    state: Mutex<AdvisoryState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryInsightsStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(AdvisoryState::default()),
            clock,
        }
    }
}

impl Default for InMemoryInsightsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightsStore for InMemoryInsightsStore {
    fn read(&self) -> AdvisoryState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn merge(&self, patch: AdvisoryPatch) -> Result<AdvisoryState> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.merge(patch, self.clock.now_utc());
        Ok(state.clone())
    }
}
