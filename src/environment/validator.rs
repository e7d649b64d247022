use std::fmt;

use crate::core::EnvironmentError;
use crate::logger::StartupLogger;
use crate::topology::{
    HostCapability, ResolvedTopology, ShardTier, ShardTopologyResolver, SizingDirective,
};

use super::credentials::{CREDENTIAL_VARIABLE, CredentialSlot, CredentialSlotSet};
use super::snapshot::{EnvironmentSnapshot, NodeEnv};

pub const NODE_ENV: &str = "NODE_ENV";
pub const DISCORD_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const DISCORD_APPLICATION_ID: &str = "DISCORD_APPLICATION_ID";

/// Variables that must be set and non-empty, in reporting order.
pub const REQUIRED_VARIABLES: [&str; 6] = [
    NODE_ENV,
    DISCORD_BOT_TOKEN,
    DISCORD_APPLICATION_ID,
    ShardTier::GLOBAL_VARIABLE,
    ShardTier::LOCAL_VARIABLE,
    ShardTier::WORKER_VARIABLE,
];

/// Everything the environment check established.
#[derive(Clone)]
pub struct ValidatedEnvironment {
    pub node_env: NodeEnv,
    pub bot_token: String,
    pub application_id: String,
    pub topology: ResolvedTopology,
    /// Well-formed extractor credentials only
    pub credentials: Vec<CredentialSlot>,
}

impl fmt::Debug for ValidatedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedEnvironment")
            .field("node_env", &self.node_env)
            .field("bot_token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("topology", &self.topology)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Validates the process environment.
///
/// Detection only: violations come back as [`EnvironmentError`] after being
/// logged, and the caller decides whether to end the process.
pub struct EnvironmentValidator<'a> {
    logger: &'a dyn StartupLogger,
    env: &'a EnvironmentSnapshot,
    host: &'a dyn HostCapability,
}

impl<'a> EnvironmentValidator<'a> {
    pub fn new(
        logger: &'a dyn StartupLogger,
        env: &'a EnvironmentSnapshot,
        host: &'a dyn HostCapability,
    ) -> Self {
        Self { logger, env, host }
    }

    pub fn validate(&self) -> Result<ValidatedEnvironment, EnvironmentError> {
        self.logger.debug("Validating environment variables...");

        self.check_required()?;
        let node_env = self.check_node_env()?;
        let topology = self.resolve_topology()?;
        let credentials = self.check_credentials();

        self.logger
            .debug("Successfully validated environment variables.");

        Ok(ValidatedEnvironment {
            node_env,
            bot_token: self.required(DISCORD_BOT_TOKEN).to_string(),
            application_id: self.required(DISCORD_APPLICATION_ID).to_string(),
            topology,
            credentials,
        })
    }

    fn fail(&self, err: EnvironmentError) -> EnvironmentError {
        self.logger.error(&err.to_string());
        err
    }

    // Only called after `check_required` passed.
    fn required(&self, name: &str) -> &'a str {
        self.env.non_empty(name).unwrap_or_default()
    }

    fn check_required(&self) -> Result<(), EnvironmentError> {
        let missing: Vec<String> = REQUIRED_VARIABLES
            .iter()
            .filter(|name| self.env.non_empty(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(self.fail(EnvironmentError::MissingVariables(missing)));
        }

        self.logger.debug("Required environment variables are set.");
        Ok(())
    }

    fn check_node_env(&self) -> Result<NodeEnv, EnvironmentError> {
        let raw = self.required(NODE_ENV);
        let node_env = raw
            .parse::<NodeEnv>()
            .map_err(|value| self.fail(EnvironmentError::InvalidNodeEnv(value)))?;

        self.logger
            .debug(&format!("NODE_ENV is set to {}.", node_env));
        Ok(node_env)
    }

    fn directive(&self, tier: ShardTier) -> Result<SizingDirective, EnvironmentError> {
        let variable = tier.variable();
        SizingDirective::parse(self.required(variable))
            .map_err(|source| self.fail(EnvironmentError::InvalidSizing { variable, source }))
    }

    fn resolve_topology(&self) -> Result<ResolvedTopology, EnvironmentError> {
        let global = self.directive(ShardTier::Global)?;
        let local = self.directive(ShardTier::Local)?;
        let worker = self.directive(ShardTier::Worker)?;

        let resolver = ShardTopologyResolver::for_host(self.host);
        let topology = resolver
            .resolve_topology(global, local, worker)
            .map_err(|violation| self.fail(violation.into()))?;

        self.logger.debug(&format!(
            "Resolved shard topology: global={}, local={}, worker={} (host parallelism {}).",
            topology.global,
            topology.local,
            topology.worker,
            resolver.host_parallelism()
        ));
        Ok(topology)
    }

    // Credential problems are advisory and never fail validation.
    fn check_credentials(&self) -> Vec<CredentialSlot> {
        let slots = CredentialSlotSet::from_env(self.env);
        if slots.is_empty() {
            self.logger.warn(&format!(
                "{} token is not set. This is required for the YouTube extractor to work properly.",
                CREDENTIAL_VARIABLE
            ));
            return Vec::new();
        }

        for (index, slot) in slots.iter().enumerate() {
            if !slot.is_valid() {
                self.logger.warn(&format!(
                    "{} token at index {} is not valid. This is required for the YouTube extractor to work properly.",
                    CREDENTIAL_VARIABLE, index
                ));
            }
        }

        let valid = slots.into_valid();
        self.logger.debug(&format!(
            "Found {} valid {} tokens.",
            valid.len(),
            CREDENTIAL_VARIABLE
        ));
        valid
    }
}
