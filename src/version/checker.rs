use lazy_static::lazy_static;
use regex::Regex;

use crate::logger::StartupLogger;

use super::fetch::HttpFetch;
use super::package::PackageInfo;

lazy_static! {
    static ref GITHUB_REPOSITORY: Regex = Regex::new(
        r"^(?:git\+)?https?://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$"
    )
    .expect("repository pattern is valid");
}

/// Owner/repository pair of a GitHub-hosted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    pub owner: String,
    pub repo: String,
}

impl RepositoryLocator {
    /// Extract the pair from a repository URL; `None` if it is not a GitHub URL.
    pub fn parse(url: &str) -> Option<Self> {
        let captures = GITHUB_REPOSITORY.captures(url.trim())?;
        Some(Self {
            owner: captures.get(1)?.as_str().to_string(),
            repo: captures.get(2)?.as_str().to_string(),
        })
    }

    pub fn latest_release_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases/latest",
            self.owner, self.repo
        )
    }
}

/// Compares the running version against the latest published release.
///
/// Advisory only: every failure degrades to a warning.
pub struct VersionChecker<'a> {
    logger: &'a dyn StartupLogger,
    fetch: &'a dyn HttpFetch,
    package: &'a PackageInfo,
}

impl<'a> VersionChecker<'a> {
    pub fn new(
        logger: &'a dyn StartupLogger,
        fetch: &'a dyn HttpFetch,
        package: &'a PackageInfo,
    ) -> Self {
        Self {
            logger,
            fetch,
            package,
        }
    }

    /// Returns the latest published version when it could be determined.
    pub async fn check(&self) -> Option<String> {
        self.logger.debug("Checking application version...");

        let current = self.package.version.as_str();
        self.logger.debug(&format!("Current version is {}", current));

        let latest = self.latest_version().await;
        match latest.as_deref() {
            None => self
                .logger
                .warn("Failed to fetch the latest version from GitHub."),
            Some(latest) if latest != current => {
                self.logger
                    .warn(&format!("New version available: {}", latest));
                self.logger
                    .warn(&format!("You are currently using version: {}", current));
                self.logger
                    .warn("Please consider updating the application with 'git pull'.");
            }
            Some(_) => {}
        }

        self.logger.debug("Successfully checked application version.");
        latest
    }

    async fn latest_version(&self) -> Option<String> {
        let Some(locator) = RepositoryLocator::parse(self.package.repository_url()) else {
            self.logger.debug(&format!(
                "Repository URL '{}' is not a GitHub repository.",
                self.package.repository_url()
            ));
            return None;
        };

        match self.fetch.get_json(&locator.latest_release_url()).await {
            Ok(body) => body
                .get("tag_name")
                .and_then(|tag| tag.as_str())
                .map(str::to_string),
            Err(e) => {
                self.logger.debug(&e.to_string());
                None
            }
        }
    }
}
