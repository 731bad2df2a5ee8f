//! JsonFileInsightsStore - アドバイス状態を JSON ファイルに保存

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{AdvisoryPatch, AdvisoryState};
use crate::error::{Error, Result};
use crate::ports::{Clock, InsightsStore, SystemClock};

pub struct JsonFileInsightsStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl JsonFileInsightsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<AdvisoryState> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AdvisoryState::default()),
            Err(e) => return Err(Error::Insights(format!("{}: {e}", self.path.display()))),
        };
        if raw.trim().is_empty() {
            return Ok(AdvisoryState::default());
        }
        serde_json::from_str(&raw)
            .map_err(|e| Error::Insights(format!("{}: {e}", self.path.display())))
    }
}

impl InsightsStore for JsonFileInsightsStore {
    fn read(&self) -> AdvisoryState {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unable to read advisory cache, starting empty");
            AdvisoryState::default()
        })
    }

    fn merge(&self, patch: AdvisoryPatch) -> Result<AdvisoryState> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // 壊れたファイルは上書きして立て直す
        let mut state = self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable advisory cache");
            AdvisoryState::default()
        });
        state.merge(patch, self.clock.now_utc());

        let json =
            serde_json::to_string_pretty(&state).map_err(|e| Error::Insights(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Insights(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(&self.path, json)
            .map_err(|e| Error::Insights(format!("{}: {e}", self.path.display())))?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdvisoryAction;

    #[test]
    fn merge_persists_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.json");
        let store = JsonFileInsightsStore::new(&path);

        store
            .merge(AdvisoryPatch {
                base_tips: Some(vec!["Use the Pomodoro Technique".into()]),
                ..AdvisoryPatch::default()
            })
            .unwrap();
        store
            .merge(AdvisoryPatch {
                last_action: Some(AdvisoryAction::Analyze),
                ..AdvisoryPatch::default()
            })
            .unwrap();

        let reopened = JsonFileInsightsStore::new(&path);
        let state = reopened.read();
        assert_eq!(state.base_tips, vec!["Use the Pomodoro Technique".to_string()]);
        assert_eq!(state.last_action, Some(AdvisoryAction::Analyze));
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn unreadable_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let store = JsonFileInsightsStore::new(&path);
        assert_eq!(store.read(), AdvisoryState::default());

        // merge で立て直せる
        let state = store.merge(AdvisoryPatch::default()).unwrap();
        assert!(state.updated_at.is_some());
        assert_eq!(store.read(), state);
    }
}
