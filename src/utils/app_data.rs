use crate::query::{DEFAULT_CONTEXT, WorkTable, default_works};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "shakesearch";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured corpus path
pub const CORPUS_ENV: &str = "SHAKESEARCH_CORPUS";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text file holding the whole anthology
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    /// Bytes of context shown on each side of a match
    #[serde(default = "default_context_width")]
    pub context_width: usize,

    /// Threads used to build the suffix array
    /// If 0, uses the number of CPU cores
    #[serde(default)]
    pub index_threads: usize,

    /// Daemon socket; the per-user runtime location when unset
    #[serde(default)]
    pub socket_path: Option<PathBuf>,

    /// Work name to line range
    #[serde(default = "default_works")]
    pub works: WorkTable,
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("completeworks.txt")
}

fn default_context_width() -> usize {
    DEFAULT_CONTEXT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            context_width: default_context_width(),
            index_threads: 0,
            socket_path: None,
            works: default_works(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    ///
    /// `SHAKESEARCH_CORPUS` overrides the corpus path either way.
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides (`SHAKESEARCH_CORPUS`)
    pub fn apply_env(&mut self) {
        if let Some(path) = std::env::var_os(CORPUS_ENV) {
            self.corpus_path = PathBuf::from(path);
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(config_path)
    }

    /// Get the effective build thread count (resolves 0 to CPU count)
    pub fn effective_index_threads(&self) -> usize {
        if self.index_threads == 0 {
            num_cpus()
        } else {
            self.index_threads
        }
    }
}

/// Get the number of CPUs available
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}
