//! Shard topology resolution.
//!
//! Turns `AUTO` / numeric sizing directives into concrete shard counts and
//! enforces `global >= local >= worker`.

mod accessors;
mod directive;
mod resolver;

pub use accessors::ShardCounts;
pub use directive::{InvalidDirective, SizingDirective};
pub use resolver::{
    FixedHost, HostCapability, OrderingViolation, ResolvedTopology, ShardTier,
    ShardTopologyResolver, SystemHost, check_ordering,
};
