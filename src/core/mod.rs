pub mod error;

pub use error::{
    ConfigurationError, DependencyError, EnvironmentError, FetchError, ProbeError, Result,
    StartupError,
};
