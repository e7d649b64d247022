//! Configuration bundle loading and structural validation.

mod bundle;
mod sections;
mod validator;

pub use bundle::{
    ConfigurationBundle, ConfigurationLoader, FileConfigurationLoader, StaticConfigurationLoader,
    deep_merge,
};
pub use sections::{HealthCheckConfig, LoggerServiceConfig, ShardClientConfig, ShardConcurrency};
pub use validator::{
    ConfigurationValidator, HEALTH_CHECK_SECTION, LOGGER_SERVICE_SECTION, REQUIRED_SECTIONS,
    SHARD_CLIENT_SECTION,
};

impl ConfigurationBundle {
    pub fn shard_client_config(&self) -> Result<ShardClientConfig, crate::core::ConfigurationError> {
        self.section(SHARD_CLIENT_SECTION)
    }

    pub fn logger_service_config(
        &self,
    ) -> Result<LoggerServiceConfig, crate::core::ConfigurationError> {
        self.section(LOGGER_SERVICE_SECTION)
    }

    pub fn health_check_config(&self) -> Result<HealthCheckConfig, crate::core::ConfigurationError> {
        self.section(HEALTH_CHECK_SECTION)
    }
}
