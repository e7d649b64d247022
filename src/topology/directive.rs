use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A sizing input that is either `AUTO` or an explicit count.
///
/// `AUTO` defers to host parallelism at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDirective", into = "RawDirective")]
pub enum SizingDirective {
    Auto,
    Count(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is neither AUTO nor a non-negative integer")]
pub struct InvalidDirective(pub String);

impl SizingDirective {
    pub const AUTO_TOKEN: &'static str = "AUTO";

    /// Parse a raw directive.
    ///
    /// `AUTO` matches case-insensitively. Anything else must be a plain
    /// base-10 digit string that fits in `u32`; signs, whitespace and
    /// fractional parts are rejected.
    pub fn parse(raw: &str) -> Result<Self, InvalidDirective> {
        if raw.eq_ignore_ascii_case(Self::AUTO_TOKEN) {
            return Ok(SizingDirective::Auto);
        }

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDirective(raw.to_string()));
        }

        raw.parse::<u32>()
            .map(SizingDirective::Count)
            .map_err(|_| InvalidDirective(raw.to_string()))
    }

    /// Concrete count for this directive on a host with `host_parallelism` execution units.
    pub fn resolve(self, host_parallelism: u32) -> u32 {
        match self {
            SizingDirective::Auto => host_parallelism,
            SizingDirective::Count(n) => n,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, SizingDirective::Auto)
    }
}

impl FromStr for SizingDirective {
    type Err = InvalidDirective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SizingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingDirective::Auto => f.write_str(Self::AUTO_TOKEN),
            SizingDirective::Count(n) => write!(f, "{}", n),
        }
    }
}

// Config files carry either "auto" or a bare number.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDirective {
    Number(u64),
    Text(String),
}

impl TryFrom<RawDirective> for SizingDirective {
    type Error = InvalidDirective;

    fn try_from(raw: RawDirective) -> Result<Self, Self::Error> {
        match raw {
            RawDirective::Number(n) => u32::try_from(n)
                .map(SizingDirective::Count)
                .map_err(|_| InvalidDirective(n.to_string())),
            RawDirective::Text(text) => SizingDirective::parse(&text),
        }
    }
}

impl From<SizingDirective> for RawDirective {
    fn from(directive: SizingDirective) -> Self {
        match directive {
            SizingDirective::Auto => RawDirective::Text("auto".to_string()),
            SizingDirective::Count(n) => RawDirective::Number(u64::from(n)),
        }
    }
}
