//! External runtime and binary probes.

mod checker;
mod probe;

pub use checker::{
    BinaryRequirement, DependencyChecker, DependencyRequirements, RuntimeRequirement,
    RuntimeVersion, parse_major_version,
};
pub use probe::{ProcessProbe, SystemProcessProbe};
