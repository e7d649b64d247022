use serde::Serialize;

use crate::core::DependencyError;
use crate::logger::StartupLogger;

use super::probe::ProcessProbe;

/// The interpreter/runtime the service runs on, with its minimum major version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeRequirement {
    pub name: String,
    pub command: String,
    pub minimum_major: u32,
}

impl RuntimeRequirement {
    pub fn new(name: &str, command: &str, minimum_major: u32) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
            minimum_major,
        }
    }
}

impl Default for RuntimeRequirement {
    fn default() -> Self {
        Self::new("Node.js", "node -v", 20)
    }
}

/// An external binary that must be installed and runnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRequirement {
    pub name: String,
    pub command: String,
}

impl BinaryRequirement {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
        }
    }

    pub fn ffmpeg() -> Self {
        Self::new("FFmpeg", "ffmpeg -version")
    }

    fn diagnostics(&self) -> [String; 3] {
        [
            format!("{} is not installed on your system.", self.name),
            format!("Make sure you have {} installed and try again.", self.name),
            format!(
                "If you are using Windows, make sure to add {} to your PATH.",
                self.name
            ),
        ]
    }
}

/// Everything the dependency check probes for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequirements {
    pub runtime: RuntimeRequirement,
    pub binaries: Vec<BinaryRequirement>,
}

impl Default for DependencyRequirements {
    fn default() -> Self {
        Self {
            runtime: RuntimeRequirement::default(),
            binaries: vec![BinaryRequirement::ffmpeg()],
        }
    }
}

impl DependencyRequirements {
    /// Set the runtime probe
    pub fn runtime(mut self, runtime: RuntimeRequirement) -> Self {
        self.runtime = runtime;
        self
    }

    /// Set the minimum supported runtime major version
    pub fn minimum_runtime_major(mut self, major: u32) -> Self {
        self.runtime.minimum_major = major;
        self
    }

    /// Add a binary probe
    pub fn require_binary(mut self, binary: BinaryRequirement) -> Self {
        self.binaries.push(binary);
        self
    }
}

/// Runtime version as reported by the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeVersion {
    pub raw: String,
    pub major: Option<u32>,
}

/// Major component of a version string such as `v18.0.0-TEST` or `20.11.1`.
pub fn parse_major_version(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    let major = without_prefix.split('.').next()?;
    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    major.parse().ok()
}

/// Probes the runtime and required binaries.
///
/// Probes run one after another; the first fatal failure stops the check.
pub struct DependencyChecker<'a> {
    logger: &'a dyn StartupLogger,
    probe: &'a dyn ProcessProbe,
    requirements: &'a DependencyRequirements,
}

impl<'a> DependencyChecker<'a> {
    pub fn new(
        logger: &'a dyn StartupLogger,
        probe: &'a dyn ProcessProbe,
        requirements: &'a DependencyRequirements,
    ) -> Self {
        Self {
            logger,
            probe,
            requirements,
        }
    }

    pub async fn check(&self) -> Result<RuntimeVersion, DependencyError> {
        self.logger.debug("Checking for required dependencies...");

        let runtime = self.check_runtime().await?;
        for binary in &self.requirements.binaries {
            self.check_binary(binary).await?;
        }

        self.logger.debug("Successfully checked required dependencies.");
        Ok(runtime)
    }

    async fn check_runtime(&self) -> Result<RuntimeVersion, DependencyError> {
        let requirement = &self.requirements.runtime;

        let raw = match self.probe.run(&requirement.command).await {
            Ok(stdout) => stdout.trim().to_string(),
            Err(source) => {
                self.logger.error(&format!(
                    "An error occurred while checking {} version. Exiting...",
                    requirement.name
                ));
                return Err(DependencyError::RuntimeProbe {
                    runtime: requirement.name.clone(),
                    source,
                });
            }
        };

        self.logger
            .debug(&format!("Detected {} version: {}", requirement.name, raw));

        let major = parse_major_version(&raw);
        match major {
            Some(major) if major < requirement.minimum_major => {
                self.logger.warn(&format!(
                    "{} version is below supported version {}. Please consider upgrading to LTS version.",
                    requirement.name, requirement.minimum_major
                ));
            }
            Some(_) => {}
            None => {
                self.logger.debug(&format!(
                    "Could not determine the major version of {} from '{}'.",
                    requirement.name, raw
                ));
            }
        }

        Ok(RuntimeVersion { raw, major })
    }

    async fn check_binary(&self, binary: &BinaryRequirement) -> Result<(), DependencyError> {
        if let Err(source) = self.probe.run(&binary.command).await {
            for line in binary.diagnostics() {
                self.logger.error(&line);
            }
            return Err(DependencyError::MissingBinary {
                binary: binary.name.clone(),
                source,
            });
        }
        Ok(())
    }
}
