use crate::core::ConfigurationError;
use crate::logger::StartupLogger;

use super::bundle::{ConfigurationBundle, ConfigurationLoader};

pub const SHARD_CLIENT_SECTION: &str = "shardClientConfig";
pub const LOGGER_SERVICE_SECTION: &str = "loggerServiceConfig";
pub const HEALTH_CHECK_SECTION: &str = "healthCheckConfig";

/// Sections every deployment must define, in reporting order.
pub const REQUIRED_SECTIONS: [&str; 3] = [
    SHARD_CLIENT_SECTION,
    LOGGER_SERVICE_SECTION,
    HEALTH_CHECK_SECTION,
];

/// Checks that the loaded bundle carries every mandatory section.
///
/// Presence only: section contents are not inspected here.
pub struct ConfigurationValidator<'a> {
    logger: &'a dyn StartupLogger,
    loader: &'a dyn ConfigurationLoader,
}

impl<'a> ConfigurationValidator<'a> {
    pub fn new(logger: &'a dyn StartupLogger, loader: &'a dyn ConfigurationLoader) -> Self {
        Self { logger, loader }
    }

    pub fn validate(&self) -> Result<ConfigurationBundle, ConfigurationError> {
        self.logger.debug("Validating configuration...");

        let bundle = self.loader.load_bundle().inspect_err(|e| {
            self.logger.error(&e.to_string());
        })?;
        self.logger.debug_with(&bundle.to_value(), "Using configuration:");

        let missing = bundle.missing(&REQUIRED_SECTIONS);
        if !missing.is_empty() {
            let err = ConfigurationError::MissingSections(
                missing.into_iter().map(String::from).collect(),
            );
            self.logger.error(&err.to_string());
            return Err(err);
        }

        self.logger.debug("Successfully validated configuration.");
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfigurationLoader;
    use crate::logger::RecordingLogger;
    use log::Level;
    use serde_json::json;

    #[test]
    fn test_reports_missing_sections_in_declared_order() {
        let logger = RecordingLogger::new();
        let loader = StaticConfigurationLoader::new(
            ConfigurationBundle::new()
                .with_section(HEALTH_CHECK_SECTION, json!({}))
                .with_section(LOGGER_SERVICE_SECTION, json!(null)),
        );

        let err = ConfigurationValidator::new(&logger, &loader)
            .validate()
            .unwrap_err();

        let expected = "Missing the following required configuration options: shardClientConfig, loggerServiceConfig.";
        assert_eq!(err.to_string(), expected);
        assert_eq!(logger.messages(Level::Error), vec![expected]);
    }

    #[test]
    fn test_empty_bundle_lists_all_sections() {
        let logger = RecordingLogger::new();
        let loader = StaticConfigurationLoader::default();

        let err = ConfigurationValidator::new(&logger, &loader)
            .validate()
            .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::MissingSections(vec![
                "shardClientConfig".to_string(),
                "loggerServiceConfig".to_string(),
                "healthCheckConfig".to_string(),
            ])
        );
    }
}
