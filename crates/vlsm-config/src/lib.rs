//! Shared configuration for the `vlsm` CLI.
//!
//! TOML file with output defaults and named plans (a parent block plus its
//! subnet requirements), layered with `VLSM_*` environment overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vlsm_core::{SubnetRequirement, validate_cidr};

/// Parent block offered when nothing else is configured.
pub const DEFAULT_PARENT: &str = "192.168.0.0/24";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "VLSM_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("plan '{name}' not found")]
    PlanNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Plan used by `allocate` when neither a parent nor `--plan` is given.
    pub default_plan: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named allocation plans.
    #[serde(default)]
    pub plans: BTreeMap<String, Plan>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A saved allocation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Plan {
    /// Parent block in CIDR notation.
    pub parent: String,

    /// Requirements, in the order they were entered.
    #[serde(default)]
    pub subnets: Vec<SubnetRequirement>,
}

impl Plan {
    /// Check the same guards the CLI applies before allocating.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !validate_cidr(&self.parent) {
            return Err(ConfigError::Validation {
                field: "parent".into(),
                reason: format!("'{}' is not valid CIDR notation", self.parent),
            });
        }
        if self.subnets.is_empty() {
            return Err(ConfigError::Validation {
                field: "subnets".into(),
                reason: "a plan needs at least one subnet requirement".into(),
            });
        }
        Ok(())
    }
}

impl Config {
    /// Look up a plan by name.
    pub fn plan(&self, name: &str) -> Result<&Plan, ConfigError> {
        self.plans.get(name).ok_or_else(|| ConfigError::PlanNotFound {
            name: name.into(),
            available: self.available_plans(),
        })
    }

    /// Comma-separated plan names for diagnostics, or `(none)`.
    pub fn available_plans(&self) -> String {
        if self.plans.is_empty() {
            "(none)".into()
        } else {
            self.plans.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$VLSM_CONFIG`, then XDG / platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("com", "vlsm", "vlsm").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vlsm");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file, layered over defaults and under `VLSM_*` env vars.
///
/// A missing file is not an error; the defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VLSM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the canonical file for editing: defaults plus the file, no env layer.
///
/// Commands that write the file back start from this, so `VLSM_*` overrides
/// are never persisted and a file that fails to parse is reported rather
/// than replaced.
pub fn load_config_for_update() -> Result<Config, ConfigError> {
    load_config_file(&config_path())
}

/// Defaults layered under the TOML file at `path`, without env overrides.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if it is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
