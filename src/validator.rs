use std::sync::Arc;

use crate::config::{
    ConfigurationBundle, ConfigurationLoader, ConfigurationValidator, FileConfigurationLoader,
};
use crate::core::{ConfigurationError, DependencyError, EnvironmentError, Result};
use crate::dependency::{
    DependencyChecker, DependencyRequirements, ProcessProbe, RuntimeVersion, SystemProcessProbe,
};
use crate::environment::{EnvironmentSnapshot, EnvironmentValidator, NODE_ENV, ValidatedEnvironment};
use crate::logger::{LogFacade, StartupLogger};
use crate::topology::{HostCapability, ShardCounts, SystemHost};
use crate::version::{HttpFetch, PackageInfo, ReqwestFetch, VersionChecker};

/// Ends the process on fatal startup input.
pub trait ProcessControl: Send + Sync {
    fn terminate(&self);
}

/// Exits the current process with status 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitProcess;

impl ProcessControl for ExitProcess {
    fn terminate(&self) {
        std::process::exit(1);
    }
}

/// Outcome of a complete startup validation pass.
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub configuration: ConfigurationBundle,
    pub runtime: RuntimeVersion,
    pub environment: ValidatedEnvironment,
    /// `None` when the lookup failed or was skipped
    pub latest_version: Option<String>,
}

/// Startup guard run before any connection or business logic.
///
/// Runs, strictly in order: configuration, dependencies, environment, version.
/// The first three are gates; the version check only ever warns.
///
/// # Examples
///
/// ```no_run
/// use shard_preflight::{CoreValidator, ExitProcess, PackageInfo};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let validator = CoreValidator::builder(PackageInfo::new("1.0.0", "https://github.com/user/repo"))
///     .build()?;
/// let report = validator.run_with(&ExitProcess).await?;
/// println!("serving {} shards", report.environment.topology.local);
/// # Ok(())
/// # }
/// ```
pub struct CoreValidator {
    logger: Arc<dyn StartupLogger>,
    loader: Arc<dyn ConfigurationLoader>,
    probe: Arc<dyn ProcessProbe>,
    fetch: Option<Arc<dyn HttpFetch>>,
    host: Arc<dyn HostCapability>,
    env: EnvironmentSnapshot,
    package: PackageInfo,
    requirements: DependencyRequirements,
}

impl CoreValidator {
    pub fn builder(package: PackageInfo) -> CoreValidatorBuilder {
        CoreValidatorBuilder::new(package)
    }

    pub fn validate_configuration(&self) -> std::result::Result<ConfigurationBundle, ConfigurationError> {
        ConfigurationValidator::new(self.logger.as_ref(), self.loader.as_ref()).validate()
    }

    pub async fn check_dependencies(&self) -> std::result::Result<RuntimeVersion, DependencyError> {
        DependencyChecker::new(self.logger.as_ref(), self.probe.as_ref(), &self.requirements)
            .check()
            .await
    }

    pub fn validate_environment_variables(
        &self,
    ) -> std::result::Result<ValidatedEnvironment, EnvironmentError> {
        EnvironmentValidator::new(self.logger.as_ref(), &self.env, self.host.as_ref()).validate()
    }

    /// Advisory; returns the latest published version if it could be fetched.
    pub async fn check_application_version(&self) -> Option<String> {
        let Some(fetch) = self.fetch.as_deref() else {
            self.logger.debug("Skipping application version check.");
            return None;
        };
        VersionChecker::new(self.logger.as_ref(), fetch, &self.package)
            .check()
            .await
    }

    /// Run every check in order, stopping at the first gate that fails.
    pub async fn run(&self) -> Result<StartupReport> {
        self.logger.info("Starting startup validation...");

        let configuration = self.validate_configuration()?;
        let runtime = self.check_dependencies().await?;
        let environment = self.validate_environment_variables()?;
        let latest_version = self.check_application_version().await;

        self.logger.info("Startup validation complete.");
        Ok(StartupReport {
            configuration,
            runtime,
            environment,
            latest_version,
        })
    }

    /// Like [`run`](Self::run), but process-fatal failures go through `control` first.
    pub async fn run_with(&self, control: &dyn ProcessControl) -> Result<StartupReport> {
        let result = self.run().await;
        if let Err(err) = &result {
            if err.is_process_fatal() {
                control.terminate();
            }
        }
        result
    }

    /// Live shard-count accessors bound to the same host as validation.
    pub fn shard_counts(&self) -> ShardCounts {
        ShardCounts::new(Arc::clone(&self.host))
    }

    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.env
    }
}

/// Builds a [`CoreValidator`], defaulting every collaborator to its production implementation.
pub struct CoreValidatorBuilder {
    package: PackageInfo,
    logger: Option<Arc<dyn StartupLogger>>,
    loader: Option<Arc<dyn ConfigurationLoader>>,
    probe: Option<Arc<dyn ProcessProbe>>,
    fetch: Option<Arc<dyn HttpFetch>>,
    host: Option<Arc<dyn HostCapability>>,
    env: Option<EnvironmentSnapshot>,
    requirements: DependencyRequirements,
    check_version: bool,
}

impl CoreValidatorBuilder {
    const DEFAULT_CONFIG_DIR: &'static str = "config";

    pub fn new(package: PackageInfo) -> Self {
        Self {
            package,
            logger: None,
            loader: None,
            probe: None,
            fetch: None,
            host: None,
            env: None,
            requirements: DependencyRequirements::default(),
            check_version: true,
        }
    }

    pub fn logger(mut self, logger: Arc<dyn StartupLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn ConfigurationLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn ProcessProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn fetch(mut self, fetch: Arc<dyn HttpFetch>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn host(mut self, host: Arc<dyn HostCapability>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn environment(mut self, env: EnvironmentSnapshot) -> Self {
        self.env = Some(env);
        self
    }

    pub fn requirements(mut self, requirements: DependencyRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Disable the release lookup entirely
    pub fn skip_version_check(mut self, skip: bool) -> Self {
        self.check_version = !skip;
        self
    }

    pub fn build(self) -> Result<CoreValidator> {
        let env = self.env.unwrap_or_else(EnvironmentSnapshot::capture);

        let loader: Arc<dyn ConfigurationLoader> = match self.loader {
            Some(loader) => loader,
            None => {
                let mut file_loader = FileConfigurationLoader::new(Self::DEFAULT_CONFIG_DIR);
                if let Some(node_env) = env.non_empty(NODE_ENV) {
                    file_loader = file_loader.environment(node_env);
                }
                Arc::new(file_loader)
            }
        };

        let fetch = match (self.check_version, self.fetch) {
            (false, _) => None,
            (true, Some(fetch)) => Some(fetch),
            (true, None) => Some(Arc::new(ReqwestFetch::new()?) as Arc<dyn HttpFetch>),
        };

        Ok(CoreValidator {
            logger: self.logger.unwrap_or_else(|| Arc::new(LogFacade)),
            loader,
            probe: self.probe.unwrap_or_else(|| Arc::new(SystemProcessProbe)),
            fetch,
            host: self.host.unwrap_or_else(|| Arc::new(SystemHost)),
            env,
            package: self.package,
            requirements: self.requirements,
        })
    }
}
