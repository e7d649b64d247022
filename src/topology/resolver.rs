use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::directive::SizingDirective;

/// Source of the host's logical execution unit count.
pub trait HostCapability: Send + Sync {
    /// Always at least 1.
    fn available_parallelism(&self) -> u32;
}

/// Queries the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostCapability for SystemHost {
    fn available_parallelism(&self) -> u32 {
        std::thread::available_parallelism()
            .map(|n| u32::try_from(n.get()).unwrap_or(u32::MAX))
            .unwrap_or(1)
    }
}

/// A host with a pinned parallelism, for tests and reproducible deployments.
#[derive(Debug, Clone, Copy)]
pub struct FixedHost(pub u32);

impl HostCapability for FixedHost {
    fn available_parallelism(&self) -> u32 {
        self.0.max(1)
    }
}

/// The three nested sizing dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardTier {
    Global,
    Local,
    Worker,
}

impl ShardTier {
    pub const GLOBAL_VARIABLE: &'static str = "GLOBAL_SHARD_COUNT";
    pub const LOCAL_VARIABLE: &'static str = "SHARD_COUNT";
    pub const WORKER_VARIABLE: &'static str = "WORKER_COUNT";

    /// Environment variable carrying this tier's directive.
    pub fn variable(self) -> &'static str {
        match self {
            ShardTier::Global => Self::GLOBAL_VARIABLE,
            ShardTier::Local => Self::LOCAL_VARIABLE,
            ShardTier::Worker => Self::WORKER_VARIABLE,
        }
    }
}

impl fmt::Display for ShardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable())
    }
}

/// `outer` is required to be at least `inner` but is not.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "{outer} ({outer_value}) is lower than {inner} ({inner_value}). Please adjust the configuration accordingly."
)]
pub struct OrderingViolation {
    pub outer: ShardTier,
    pub outer_value: u32,
    pub inner: ShardTier,
    pub inner_value: u32,
}

/// Check `global >= local >= worker`.
///
/// Pairs are evaluated as (global, local), (global, worker), (local, worker)
/// and only the first violated pair is reported.
pub fn check_ordering(global: u32, local: u32, worker: u32) -> Result<(), OrderingViolation> {
    let pairs = [
        ((ShardTier::Global, global), (ShardTier::Local, local)),
        ((ShardTier::Global, global), (ShardTier::Worker, worker)),
        ((ShardTier::Local, local), (ShardTier::Worker, worker)),
    ];

    for ((outer, outer_value), (inner, inner_value)) in pairs {
        if outer_value < inner_value {
            return Err(OrderingViolation {
                outer,
                outer_value,
                inner,
                inner_value,
            });
        }
    }

    Ok(())
}

/// Concrete shard counts, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedTopology {
    pub global: u32,
    pub local: u32,
    pub worker: u32,
}

impl ResolvedTopology {
    /// Build a topology, rejecting triples that break the tier ordering.
    pub fn new(global: u32, local: u32, worker: u32) -> Result<Self, OrderingViolation> {
        check_ordering(global, local, worker)?;
        Ok(Self {
            global,
            local,
            worker,
        })
    }
}

/// Turns directives into counts against one host parallelism reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardTopologyResolver {
    host_parallelism: u32,
}

impl ShardTopologyResolver {
    pub fn new(host_parallelism: u32) -> Self {
        Self {
            host_parallelism: host_parallelism.max(1),
        }
    }

    /// Snapshot the host's parallelism once.
    pub fn for_host(host: &dyn HostCapability) -> Self {
        Self::new(host.available_parallelism())
    }

    pub fn host_parallelism(&self) -> u32 {
        self.host_parallelism
    }

    pub fn resolve(&self, directive: SizingDirective) -> u32 {
        directive.resolve(self.host_parallelism)
    }

    pub fn resolve_topology(
        &self,
        global: SizingDirective,
        local: SizingDirective,
        worker: SizingDirective,
    ) -> Result<ResolvedTopology, OrderingViolation> {
        ResolvedTopology::new(
            self.resolve(global),
            self.resolve(local),
            self.resolve(worker),
        )
    }
}
