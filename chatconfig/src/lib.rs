//! Process configuration for the chat backend: `.env` loading plus the typed
//! `ChatConfig` the server and agent read their tunables from.
//!
//! Precedence when a key is missing from the process environment: value from
//! project `.env` (current directory or an override directory), else the
//! built-in default documented on each `ChatConfig` field.

mod dotenv;

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
    #[error("invalid {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Typed process configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub api_v1: String,
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub openai_model: String,
    pub max_history_messages: usize,
    pub default_max_iterations: u32,
    pub extra_iterations_on_plan: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_v1: String::new(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            openai_api_key: None,
            openai_api_base: None,
            openai_model: "gpt-4o-mini".to_string(),
            max_history_messages: 10,
            default_max_iterations: 3,
            extra_iterations_on_plan: 1,
        }
    }
}

impl ChatConfig {
    /// Loads `.env` (if present) into the process environment, not overwriting
    /// variables that are already set, then reads `ChatConfig` from the
    /// environment, falling back to defaults for anything unset.
    pub fn load(override_dir: Option<&Path>) -> Result<Self, LoadError> {
        apply_dotenv(override_dir)?;
        Self::from_env()
    }

    /// Reads `ChatConfig` straight from the current process environment,
    /// without touching `.env`. Useful in tests that set vars directly.
    pub fn from_env() -> Result<Self, LoadError> {
        let defaults = Self::default();
        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|_| LoadError::InvalidValue("PORT", v))?,
            Err(_) => defaults.port,
        };
        let max_history_messages = match std::env::var("MAX_HISTORY_MESSAGES") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|_| LoadError::InvalidValue("MAX_HISTORY_MESSAGES", v))?,
            Err(_) => defaults.max_history_messages,
        };
        let default_max_iterations = match std::env::var("DEFAULT_MAX_ITERATIONS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|_| LoadError::InvalidValue("DEFAULT_MAX_ITERATIONS", v))?,
            Err(_) => defaults.default_max_iterations,
        };
        let extra_iterations_on_plan = match std::env::var("EXTRA_ITERATIONS_ON_PLAN") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|_| LoadError::InvalidValue("EXTRA_ITERATIONS_ON_PLAN", v))?,
            Err(_) => defaults.extra_iterations_on_plan,
        };

        Ok(Self {
            api_v1: std::env::var("API_V1").unwrap_or(defaults.api_v1),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_api_base: std::env::var("OPENAI_API_BASE").ok(),
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            max_history_messages,
            default_max_iterations,
            extra_iterations_on_plan,
        })
    }
}

fn apply_dotenv(override_dir: Option<&Path>) -> Result<(), LoadError> {
    let map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;
    for (key, value) in map {
        if std::env::var(&key).is_err() {
            std::env::set_var(key, value);
        }
    }
    Ok(())
}

/// Installs a `tracing` subscriber reading its filter from `RUST_LOG`
/// (defaulting to `info`). Call once from a binary's `main`.
#[cfg(feature = "tracing-init")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        for key in [
            "API_V1",
            "HOST",
            "PORT",
            "OPENAI_API_KEY",
            "OPENAI_API_BASE",
            "OPENAI_MODEL",
            "MAX_HISTORY_MESSAGES",
            "DEFAULT_MAX_ITERATIONS",
            "EXTRA_ITERATIONS_ON_PLAN",
        ] {
            std::env::remove_var(key);
        }
        let cfg = ChatConfig::from_env().unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.max_history_messages, 10);
        assert_eq!(cfg.default_max_iterations, 3);
        assert_eq!(cfg.extra_iterations_on_plan, 1);
        assert!(cfg.openai_api_key.is_none());
    }

    #[test]
    fn reads_overrides_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("PORT", "9001");
        std::env::set_var("MAX_HISTORY_MESSAGES", "25");
        let cfg = ChatConfig::from_env().unwrap();
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.max_history_messages, 25);
        std::env::remove_var("PORT");
        std::env::remove_var("MAX_HISTORY_MESSAGES");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("PORT", "not-a-number");
        let err = ChatConfig::from_env().unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue("PORT", _)));
        std::env::remove_var("PORT");
    }

    #[test]
    fn load_missing_dotenv_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("PORT");
        let dir = tempfile::tempdir().unwrap();
        let cfg = ChatConfig::load(Some(dir.path())).unwrap();
        assert_eq!(cfg.port, 8000);
    }

    #[test]
    fn load_reads_dotenv_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("OPENAI_MODEL");
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "OPENAI_MODEL=gpt-5\n").unwrap();
        let cfg = ChatConfig::load(Some(dir.path())).unwrap();
        assert_eq!(cfg.openai_model, "gpt-5");
        std::env::remove_var("OPENAI_MODEL");
    }
}
