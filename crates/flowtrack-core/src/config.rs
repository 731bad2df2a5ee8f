//! Config - 設定の読み込み
//!
//! TOML ファイル（任意）→ `FLOWTRACK_*` 環境変数の順に上書きする。
//! ファイルが無ければデフォルト値。環境変数の不正値はログに残して無視する。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::plan::PlanBuilder;

pub const ENV_PLAN_SIZE: &str = "FLOWTRACK_PLAN_SIZE";
pub const ENV_STORE: &str = "FLOWTRACK_STORE";
pub const ENV_INSIGHTS: &str = "FLOWTRACK_INSIGHTS";
pub const ENV_LOG: &str = "FLOWTRACK_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Number of tasks in the daily plan.
    pub plan_size: usize,
    /// JSON file backing the remote store. In-memory when unset.
    pub store_path: Option<PathBuf>,
    /// JSON file for the advisory cache. In-memory when unset.
    pub insights_path: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            plan_size: PlanBuilder::DEFAULT_SIZE,
            store_path: None,
            insights_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Read `path` if given and present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                toml::from_str(&contents).map_err(|e| {
                    Error::Config(format!("failed to parse {}: {e}", path.display()))
                })?
            }
            Some(path) => {
                tracing::debug!(path = %path.display(), "config file not found; using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production).
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        if let Some(raw) = get(ENV_PLAN_SIZE) {
            match raw.parse::<usize>() {
                Ok(0) => tracing::warn!("invalid {ENV_PLAN_SIZE}, ignoring: must be at least 1"),
                Ok(size) => self.plan_size = size,
                Err(err) => tracing::warn!("invalid {ENV_PLAN_SIZE}, ignoring: {err}"),
            }
        }
        if let Some(raw) = get(ENV_STORE) {
            self.store_path = Some(PathBuf::from(raw));
        }
        if let Some(raw) = get(ENV_INSIGHTS) {
            self.insights_path = Some(PathBuf::from(raw));
        }
        if let Some(raw) = get(ENV_LOG) {
            self.log_filter = raw;
        }
    }
}
