use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::report::SectionLabels;
use crate::ticket::DEFAULT_TRACKER_BASE_URL;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "TASKLEDGER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub worklog: WorklogConfig,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklogConfig {
    #[serde(default = "default_worklog_path")]
    pub path: PathBuf,
}

impl Default for WorklogConfig {
    fn default() -> Self {
        Self {
            path: default_worklog_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl JiraConfig {
    /// Bearer token from the configured environment variable, if set.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        env::var(&self.token_env)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

/// Section label overrides; unset labels keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub completed_label: Option<String>,
    #[serde(default)]
    pub next_up_label: Option<String>,
    #[serde(default)]
    pub blocked_label: Option<String>,
}

impl ReportConfig {
    #[must_use]
    pub fn labels(&self) -> SectionLabels {
        let defaults = SectionLabels::default();
        SectionLabels {
            completed: self
                .completed_label
                .clone()
                .unwrap_or(defaults.completed),
            next_up: self.next_up_label.clone().unwrap_or(defaults.next_up),
            blocked: self.blocked_label.clone().unwrap_or(defaults.blocked),
        }
    }
}

/// Where the config lives: explicit flag, then `$TASKLEDGER_CONFIG`, then the
/// user config directory.
#[must_use]
pub fn config_path(explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(value));
    }
    dirs::config_dir().map(|dir| dir.join("taskledger/config.toml"))
}

/// Load the effective config.
///
/// A missing file at the default location yields defaults; a missing file
/// that was asked for explicitly is an error.
///
/// # Errors
///
/// Fails when an explicitly requested file is missing or when the file
/// cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<LedgerConfig> {
    let env_value = env::var(CONFIG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let requested = explicit.is_some() || env_value.is_some();
    let Some(path) = config_path(explicit, env_value) else {
        return Ok(LedgerConfig::default());
    };

    if !path.exists() {
        if requested {
            bail!("Config file {} does not exist", path.display());
        }
        return Ok(LedgerConfig::default());
    }

    load_config_file(&path)
}

/// Parse one config file.
///
/// # Errors
///
/// Fails when the file cannot be read or is not valid TOML for
/// [`LedgerConfig`].
pub fn load_config_file(path: &Path) -> Result<LedgerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<LedgerConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn default_worklog_path() -> PathBuf {
    PathBuf::from("worklog.yml")
}

fn default_base_url() -> String {
    DEFAULT_TRACKER_BASE_URL.to_string()
}

fn default_token_env() -> String {
    "JIRA_PAT".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}
