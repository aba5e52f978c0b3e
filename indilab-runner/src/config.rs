//! Runner configuration, loaded from TOML.
//!
//! Every field has a default and a missing section means defaults, so an
//! empty file is a valid configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file when none is given explicitly.
pub const CONFIG_ENV: &str = "INDILAB_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub worker: WorkerConfig,
    pub pool: PoolConfig,
}

/// The dedicated compute worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// OS thread name of the worker.
    pub thread_name: String,
    /// Series of at most this many bars are computed inline by the client.
    pub inline_threshold: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: "indilab-worker".into(),
            inline_threshold: 1000,
        }
    }
}

/// The private batch pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of pool threads; 0 means available parallelism.
    pub threads: usize,
    /// Pool threads are named `{thread_prefix}-{index}`.
    pub thread_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            thread_prefix: "indilab-pool".into(),
        }
    }
}

impl PoolConfig {
    /// Thread count with 0 resolved to the machine's available parallelism.
    pub fn resolved_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

impl RunnerConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file: an explicit path first, then `INDILAB_CONFIG`,
    /// then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(explicit, std::env::var_os(CONFIG_ENV))
    }

    fn load_with_env(explicit: Option<&Path>, env: Option<OsString>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match env {
            Some(path) if !path.is_empty() => Self::from_file(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker.thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("worker.thread_name must not be empty".into()));
        }
        if self.worker.thread_name.contains('\0') {
            return Err(ConfigError::Invalid("worker.thread_name must not contain NUL".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = RunnerConfig::from_toml("").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.worker.thread_name, "indilab-worker");
        assert_eq!(config.worker.inline_threshold, 1000);
        assert_eq!(config.pool.threads, 0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RunnerConfig::from_toml("[worker]\ninline_threshold = 50\n").unwrap();
        assert_eq!(config.worker.inline_threshold, 50);
        assert_eq!(config.worker.thread_name, "indilab-worker");
        assert_eq!(config.pool, PoolConfig::default());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = RunnerConfig::from_toml("[worker]\ninline_threshold = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_thread_name_is_invalid() {
        let err = RunnerConfig::from_toml("[worker]\nthread_name = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn resolved_threads() {
        let fixed = PoolConfig {
            threads: 3,
            ..PoolConfig::default()
        };
        assert_eq!(fixed.resolved_threads(), 3);
        assert!(PoolConfig::default().resolved_threads() >= 1);
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pool]\nthreads = 2").unwrap();
        let config = RunnerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pool.threads, 2);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = RunnerConfig::from_file(Path::new("/nonexistent/indilab.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/indilab.toml"));
    }

    #[test]
    fn explicit_path_beats_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[worker]\ninline_threshold = 7").unwrap();
        let config = RunnerConfig::load_with_env(
            Some(file.path()),
            Some(OsString::from("/nonexistent/indilab.toml")),
        )
        .unwrap();
        assert_eq!(config.worker.inline_threshold, 7);
    }

    #[test]
    fn environment_path_is_used_without_explicit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[worker]\ninline_threshold = 9").unwrap();
        let env = Some(file.path().as_os_str().to_os_string());
        let config = RunnerConfig::load_with_env(None, env).unwrap();
        assert_eq!(config.worker.inline_threshold, 9);
        assert_eq!(RunnerConfig::load_with_env(None, None).unwrap(), RunnerConfig::default());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = RunnerConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(RunnerConfig::from_toml(&text).unwrap(), config);
    }
}
