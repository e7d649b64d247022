// ============================================================================
// Shard Preflight Library
// ============================================================================
//
// Startup guard for sharded bot deployments: checks configuration,
// external dependencies and environment, resolves the shard topology,
// and compares the running version with the latest release.

pub mod core;
pub mod logger;
pub mod topology;
pub mod config;
pub mod dependency;
pub mod environment;
pub mod version;
pub mod validator;

// Re-export main types for convenience
pub use crate::core::{
    ConfigurationError, DependencyError, EnvironmentError, FetchError, ProbeError, Result,
    StartupError,
};
pub use logger::{LogFacade, LogRecord, RecordingLogger, StartupLogger};
pub use validator::{CoreValidator, CoreValidatorBuilder, ExitProcess, ProcessControl, StartupReport};

// Re-export topology API
pub use topology::{
    FixedHost, HostCapability, OrderingViolation, ResolvedTopology, ShardCounts, ShardTier,
    ShardTopologyResolver, SizingDirective, SystemHost, check_ordering,
};

// Re-export collaborator seams
pub use config::{
    ConfigurationBundle, ConfigurationLoader, FileConfigurationLoader, StaticConfigurationLoader,
};
pub use dependency::{BinaryRequirement, DependencyRequirements, ProcessProbe, RuntimeRequirement};
pub use environment::{EnvironmentSnapshot, NodeEnv, ValidatedEnvironment};
pub use version::{HttpFetch, PackageInfo, ReqwestFetch};
