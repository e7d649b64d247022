use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::ConfigurationError;

/// Named configuration sections as produced by the loader.
///
/// A section whose value is `null` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationBundle {
    sections: Map<String, Value>,
}

impl ConfigurationBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bundle from a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ConfigurationError> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(ConfigurationError::Load(format!(
                "expected a JSON object at the configuration root, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Add or replace a section
    pub fn with_section(mut self, name: &str, value: Value) -> Self {
        self.sections.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.sections.get(name).filter(|value| !value.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names from `required` that are absent, in the order given.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Deserialize one section into its typed view.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigurationError> {
        let value = self
            .get(name)
            .ok_or_else(|| ConfigurationError::InvalidSection {
                section: name.to_string(),
                reason: "section is missing".to_string(),
            })?;

        serde_json::from_value(value.clone()).map_err(|e| ConfigurationError::InvalidSection {
            section: name.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.sections.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Produces the configuration bundle. Called once per validation pass.
pub trait ConfigurationLoader: Send + Sync {
    fn load_bundle(&self) -> Result<ConfigurationBundle, ConfigurationError>;
}

/// Returns a bundle fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigurationLoader {
    bundle: ConfigurationBundle,
}

impl StaticConfigurationLoader {
    pub fn new(bundle: ConfigurationBundle) -> Self {
        Self { bundle }
    }
}

impl ConfigurationLoader for StaticConfigurationLoader {
    fn load_bundle(&self) -> Result<ConfigurationBundle, ConfigurationError> {
        Ok(self.bundle.clone())
    }
}

/// Layered JSON file loader.
///
/// Reads `default.json`, then `<environment>.json`, then `local.json` from
/// one directory, deep-merging objects so later files win. Missing files
/// are skipped.
#[derive(Debug, Clone)]
pub struct FileConfigurationLoader {
    dir: PathBuf,
    environment: Option<String>,
}

impl FileConfigurationLoader {
    const DEFAULT_FILE: &'static str = "default";
    const LOCAL_FILE: &'static str = "local";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            environment: None,
        }
    }

    /// Set the deployment environment whose overlay file is applied
    pub fn environment(mut self, environment: &str) -> Self {
        if !environment.is_empty() {
            self.environment = Some(environment.to_string());
        }
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn layers(&self) -> Vec<PathBuf> {
        let mut names = vec![Self::DEFAULT_FILE];
        if let Some(env) = self.environment.as_deref() {
            names.push(env);
        }
        names.push(Self::LOCAL_FILE);

        names
            .into_iter()
            .map(|name| self.dir.join(format!("{}.json", name)))
            .collect()
    }

    fn read_layer(path: &Path) -> Result<Option<Value>, ConfigurationError> {
        if !path.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(path).map_err(|e| {
            ConfigurationError::Load(format!("cannot read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            ConfigurationError::Load(format!("cannot parse {}: {}", path.display(), e))
        })?;

        if !value.is_object() {
            return Err(ConfigurationError::Load(format!(
                "{} must contain a JSON object, found {}",
                path.display(),
                json_kind(&value)
            )));
        }
        Ok(Some(value))
    }
}

impl ConfigurationLoader for FileConfigurationLoader {
    fn load_bundle(&self) -> Result<ConfigurationBundle, ConfigurationError> {
        let mut merged = Value::Object(Map::new());
        for path in self.layers() {
            if let Some(layer) = Self::read_layer(&path)? {
                deep_merge(&mut merged, layer);
            }
        }
        ConfigurationBundle::from_value(merged)
    }
}

/// Merge `overlay` into `target`. Objects merge key by key; anything else replaces.
pub fn deep_merge(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (target, overlay) => *target = overlay,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
