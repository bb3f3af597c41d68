//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vlsm_config::ConfigError;
use vlsm_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INSUFFICIENT_SPACE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input guards ─────────────────────────────────────────────────
    #[error("No parent network given")]
    #[diagnostic(
        code(vlsm::missing_parent),
        help(
            "Pass the block to carve up, e.g.: vlsm allocate 192.168.0.0/24 Sales=100\n\
             Or select a saved plan with --plan, or set one with: vlsm config use <plan>"
        )
    )]
    MissingParent,

    #[error("Invalid parent network CIDR: '{input}'")]
    #[diagnostic(
        code(vlsm::invalid_cidr),
        help("Use A.B.C.D/P with octets 0-255 and a prefix 0-32, e.g. 10.0.0.0/16")
    )]
    InvalidCidr { input: String },

    #[error("No subnet requirements given")]
    #[diagnostic(
        code(vlsm::no_requirements),
        help(
            "Add at least one subnet requirement as NAME=HOSTS or HOSTS, e.g.:\n\
             vlsm allocate 192.168.0.0/24 Sales=100 Ops=50"
        )
    )]
    NoRequirements,

    #[error("Invalid subnet requirement '{input}': {reason}")]
    #[diagnostic(
        code(vlsm::invalid_requirement),
        help("Write requirements as NAME=HOSTS (Sales=100) or just HOSTS (100)")
    )]
    InvalidRequirement { input: String, reason: String },

    // ── Allocation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(vlsm::insufficient_space),
        help(
            "Subnet '{name}' ({hosts} hosts) does not fit in what is left of {parent}.\n\
             Use a larger parent block (shorter prefix) or reduce the host counts."
        )
    )]
    InsufficientSpace {
        message: String,
        parent: String,
        name: String,
        hosts: u32,
    },

    #[error("Malformed address: {message}")]
    #[diagnostic(code(vlsm::malformed_address))]
    MalformedAddress { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vlsm::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Plan '{name}' not found in configuration")]
    #[diagnostic(
        code(vlsm::plan_not_found),
        help(
            "Available plans: {available}\n\
             Save one with: vlsm allocate <PARENT> <SUBNET>... --save {name}"
        )
    )]
    PlanNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(vlsm::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(vlsm::config_write))]
    ConfigWrite(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(vlsm::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML payload: {0}")]
    #[diagnostic(code(vlsm::yaml), help("Check the YAML file contents and try again."))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingParent
            | Self::InvalidCidr { .. }
            | Self::NoRequirements
            | Self::InvalidRequirement { .. }
            | Self::MalformedAddress { .. }
            | Self::Validation { .. } => exit_code::USAGE,
            Self::InsufficientSpace { .. } => exit_code::INSUFFICIENT_SPACE,
            Self::PlanNotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Format { .. } => CliError::MalformedAddress { message },
            CoreError::CapacityExceeded {
                parent,
                name,
                hosts,
            } => CliError::InsufficientSpace {
                message,
                parent,
                name,
                hosts,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::PlanNotFound { name, available } => {
                CliError::PlanNotFound { name, available }
            }
            ConfigError::Figment(inner) => CliError::Config(inner),
            ConfigError::Io(inner) => CliError::Io(inner),
            ConfigError::Serialization(inner) => CliError::ConfigWrite(inner.to_string()),
        }
    }
}
