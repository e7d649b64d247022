use thiserror::Error;

use crate::topology::{InvalidDirective, OrderingViolation};

/// Structural problems with the loaded configuration bundle.
///
/// Recoverable by the caller: these are propagated, never turned into a process exit here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing the following required configuration options: {}.", .0.join(", "))]
    MissingSections(Vec<String>),

    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Configuration section '{section}' is invalid: {reason}")]
    InvalidSection { section: String, reason: String },
}

/// Failure of a single external process invocation.
///
/// `Display` is the raw failure text so callers can surface it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProbeError {
    pub command: String,
    pub message: String,
}

impl ProbeError {
    pub fn new(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// A required runtime or binary could not be verified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("{source}")]
    RuntimeProbe { runtime: String, source: ProbeError },

    #[error("{source}")]
    MissingBinary { binary: String, source: ProbeError },
}

/// Environment violations that leave shard ownership or credentials undefined.
///
/// The `Display` text of every variant is the operator-facing diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("Missing the following required environment variables: {}. Exiting...", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error(
        "NODE_ENV is not set to development or production. Please set it to either of these values. Exiting..."
    )]
    InvalidNodeEnv(String),

    #[error(
        "{variable} is not set to AUTO or a valid number. Please set it to AUTO or the total number of shards. Exiting..."
    )]
    InvalidSizing {
        variable: &'static str,
        source: InvalidDirective,
    },

    #[error("{0}")]
    Ordering(#[from] OrderingViolation),
}

/// Outbound HTTP failures during the release lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Response from {url} is not valid JSON: {reason}")]
    Decode { url: String, reason: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Any failure surfaced by the startup sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl StartupError {
    /// True when the failure must end the process rather than propagate.
    pub fn is_process_fatal(&self) -> bool {
        matches!(self, StartupError::Environment(_))
    }
}

pub type Result<T> = std::result::Result<T, StartupError>;
