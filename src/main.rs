use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use shard_preflight::config::ConfigurationLoader;
use shard_preflight::environment::NODE_ENV;
use shard_preflight::{
    CoreValidator, DependencyRequirements, EnvironmentSnapshot, ExitProcess,
    FileConfigurationLoader, LogFacade, PackageInfo,
};

#[derive(Parser)]
#[command(name = "shard-preflight")]
#[command(about = "Validate configuration, dependencies and environment before shard workers start")]
struct Cli {
    /// Directory holding default.json / <NODE_ENV>.json / local.json
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
    /// Package manifest with `version` and `repository.url`
    #[arg(long, default_value = "package.json")]
    manifest: PathBuf,
    /// Lowest runtime major version that runs without a warning
    #[arg(long, default_value_t = 20)]
    runtime_min_major: u32,
    #[arg(long)]
    skip_version_check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = EnvironmentSnapshot::capture();

    let mut loader = FileConfigurationLoader::new(&cli.config_dir);
    if let Some(node_env) = env.non_empty(NODE_ENV) {
        loader = loader.environment(node_env);
    }
    init_logging(&loader);

    // Manifest problems only disable the release lookup.
    let package = if cli.skip_version_check {
        None
    } else {
        PackageInfo::load_for_version_check(&cli.manifest, &LogFacade)
    };
    let skip_version_check = package.is_none();

    let validator = CoreValidator::builder(package.unwrap_or_default())
        .environment(env)
        .loader(Arc::new(loader))
        .requirements(DependencyRequirements::default().minimum_runtime_major(cli.runtime_min_major))
        .skip_version_check(skip_version_check)
        .build()?;

    let report = validator.run_with(&ExitProcess).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report.environment.topology)?
    );
    Ok(())
}

// `loggerServiceConfig.logLevel` sets the default filter; RUST_LOG still wins.
fn init_logging(loader: &FileConfigurationLoader) {
    let level = loader
        .load_bundle()
        .ok()
        .and_then(|bundle| bundle.logger_service_config().ok())
        .and_then(|config| config.log_level)
        .unwrap_or_else(|| "info".to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
