use std::sync::Arc;

use super::directive::SizingDirective;
use super::resolver::{HostCapability, ShardTier};
use crate::config::ShardClientConfig;
use crate::environment::EnvironmentSnapshot;

/// Live shard-count accessors for the gateway-client wrapper.
///
/// Shares the AUTO rule with startup validation so the two can never disagree.
#[derive(Clone)]
pub struct ShardCounts {
    host: Arc<dyn HostCapability>,
}

impl ShardCounts {
    const FALLBACK_COUNT: u32 = 1;

    pub fn new(host: Arc<dyn HostCapability>) -> Self {
        Self { host }
    }

    /// Shards owned by one worker, from the gateway client's `maxShards`.
    pub fn worker_shard_count(&self, config: &ShardClientConfig) -> u32 {
        config
            .max_shards
            .map(|directive| directive.resolve(self.host.available_parallelism()))
            .unwrap_or(Self::FALLBACK_COUNT)
    }

    /// Cluster-wide shard count from `GLOBAL_SHARD_COUNT`.
    ///
    /// Unset, empty or unparseable values count as a single shard.
    pub fn global_shard_count(&self, env: &EnvironmentSnapshot) -> u32 {
        env.non_empty(ShardTier::Global.variable())
            .and_then(|raw| SizingDirective::parse(raw).ok())
            .map(|directive| directive.resolve(self.host.available_parallelism()))
            .unwrap_or(Self::FALLBACK_COUNT)
    }
}
