use serde::{Deserialize, Serialize};

use crate::topology::SizingDirective;

/// Gateway client settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShardClientConfig {
    /// Gateway intents requested on connect
    pub intents: Vec<String>,
    /// How many shards may identify at once
    pub shard_concurrency: Option<ShardConcurrency>,
    #[serde(rename = "firstShardID", alias = "firstShardId")]
    pub first_shard_id: Option<u32>,
    #[serde(rename = "lastShardID", alias = "lastShardId")]
    pub last_shard_id: Option<u32>,
    /// Shards owned by one worker; `auto` means host parallelism
    pub max_shards: Option<SizingDirective>,
}

/// Identify concurrency requested from the gateway.
///
/// Unlike [`SizingDirective`], `auto` defers to the gateway's advertised
/// limit, not host parallelism, so it never goes through the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConcurrency", into = "RawConcurrency")]
pub enum ShardConcurrency {
    Gateway,
    Fixed(u32),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawConcurrency {
    Number(u32),
    Text(String),
}

impl TryFrom<RawConcurrency> for ShardConcurrency {
    type Error = String;

    fn try_from(raw: RawConcurrency) -> Result<Self, Self::Error> {
        match raw {
            RawConcurrency::Number(n) => Ok(ShardConcurrency::Fixed(n)),
            RawConcurrency::Text(text) if text.eq_ignore_ascii_case("auto") => {
                Ok(ShardConcurrency::Gateway)
            }
            RawConcurrency::Text(text) => Err(format!(
                "shardConcurrency must be \"auto\" or a number, got '{}'",
                text
            )),
        }
    }
}

impl From<ShardConcurrency> for RawConcurrency {
    fn from(concurrency: ShardConcurrency) -> Self {
        match concurrency {
            ShardConcurrency::Gateway => RawConcurrency::Text("auto".to_string()),
            ShardConcurrency::Fixed(n) => RawConcurrency::Number(n),
        }
    }
}

/// Logging sink settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerServiceConfig {
    pub log_level: Option<String>,
    pub pretty_print: bool,
}

/// Health check endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthCheckConfig {
    pub enabled: bool,
    /// Seconds between health reports
    pub interval: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 60,
        }
    }
}
