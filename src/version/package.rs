use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::ConfigurationError;
use crate::logger::StartupLogger;

/// The running application's version and where its releases are published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    pub version: String,
    #[serde(default, deserialize_with = "lenient_repository")]
    pub repository: RepositoryField,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryField {
    pub url: String,
}

// npm allows `{ "url": ... }`, a shorthand string such as `github:user/repo`, or null.
// Shapes that are not a GitHub URL end up failing the locator match later.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRepository {
    Object {
        #[serde(default)]
        url: Option<String>,
    },
    Text(String),
    Other(Value),
}

fn lenient_repository<'de, D>(deserializer: D) -> Result<RepositoryField, D::Error>
where
    D: Deserializer<'de>,
{
    let url = match RawRepository::deserialize(deserializer)? {
        RawRepository::Object { url } => url.unwrap_or_default(),
        RawRepository::Text(text) => text,
        RawRepository::Other(_) => String::new(),
    };
    Ok(RepositoryField { url })
}

impl PackageInfo {
    pub fn new(version: &str, repository_url: &str) -> Self {
        Self {
            version: version.to_string(),
            repository: RepositoryField {
                url: repository_url.to_string(),
            },
        }
    }

    /// Read `version` and `repository` from a JSON package manifest.
    pub fn from_manifest(path: &Path) -> Result<Self, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|e| {
            ConfigurationError::Load(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ConfigurationError::Load(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Like [`from_manifest`](Self::from_manifest), but an unusable manifest
    /// only disables the version check.
    pub fn load_for_version_check(path: &Path, logger: &dyn StartupLogger) -> Option<Self> {
        match Self::from_manifest(path) {
            Ok(package) => Some(package),
            Err(e) => {
                logger.warn(&format!(
                    "Skipping application version check: {}",
                    e
                ));
                None
            }
        }
    }

    pub fn repository_url(&self) -> &str {
        &self.repository.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::RecordingLogger;
    use log::Level;

    fn manifest(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_from_manifest_ignores_unrelated_fields() {
        let (_dir, path) = manifest(
            r#"{ "name": "bot", "version": "1.4.2", "repository": { "type": "git", "url": "https://github.com/user/repo.git" }, "scripts": {} }"#,
        );

        let package = PackageInfo::from_manifest(&path).unwrap();
        assert_eq!(package, PackageInfo::new("1.4.2", "https://github.com/user/repo.git"));
    }

    #[test]
    fn test_from_manifest_without_repository() {
        let (_dir, path) = manifest(r#"{ "version": "0.1.0" }"#);

        let package = PackageInfo::from_manifest(&path).unwrap();
        assert_eq!(package.repository_url(), "");
    }

    #[test]
    fn test_from_manifest_accepts_repository_shorthand() {
        let (_dir, path) = manifest(r#"{ "version": "1.0.0", "repository": "github:user/repo" }"#);

        let package = PackageInfo::from_manifest(&path).unwrap();
        assert_eq!(package.repository_url(), "github:user/repo");
    }

    #[test]
    fn test_from_manifest_tolerates_odd_repository_values() {
        for repository in ["null", "42", r#"{ "type": "git" }"#, r#"{ "url": null }"#] {
            let (_dir, path) = manifest(&format!(
                r#"{{ "version": "1.0.0", "repository": {} }}"#,
                repository
            ));

            let package = PackageInfo::from_manifest(&path).unwrap();
            assert_eq!(package.repository_url(), "", "repository {}", repository);
        }
    }

    #[test]
    fn test_from_manifest_missing_file() {
        let err = PackageInfo::from_manifest(Path::new("/nonexistent/package.json")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Load(_)));
    }

    #[test]
    fn test_load_for_version_check_warns_on_missing_file() {
        let logger = RecordingLogger::new();

        let package =
            PackageInfo::load_for_version_check(Path::new("/nonexistent/package.json"), &logger);

        assert_eq!(package, None);
        let warnings = logger.messages(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Skipping application version check:"));
    }

    #[test]
    fn test_load_for_version_check_warns_without_version() {
        let logger = RecordingLogger::new();
        let (_dir, path) = manifest(r#"{ "name": "bot" }"#);

        assert_eq!(PackageInfo::load_for_version_check(&path, &logger), None);
        assert_eq!(logger.count(Level::Warn), 1);
    }

    #[test]
    fn test_load_for_version_check_passes_good_manifest_through() {
        let logger = RecordingLogger::new();
        let (_dir, path) = manifest(r#"{ "version": "2.1.0", "repository": null }"#);

        let package = PackageInfo::load_for_version_check(&path, &logger).unwrap();
        assert_eq!(package.version, "2.1.0");
        assert_eq!(logger.count(Level::Warn), 0);
    }
}
