//! Release version check against GitHub.

mod checker;
mod fetch;
mod package;

pub use checker::{RepositoryLocator, VersionChecker};
pub use fetch::{HttpFetch, ReqwestFetch};
pub use package::{PackageInfo, RepositoryField};
