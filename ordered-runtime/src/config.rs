use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::groups;

/// Runtime options read from the `ordered` section of the settings.
///
/// ```toml
/// [ordered]
/// excluded_keywords = ["ordered_runtime", "vendored"]
/// tick_interval = 0.05
/// start_phases = ["first_start", "second_start", "third_start"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registrations whose module path contains any of these are left out of the catalog.
    pub excluded_keywords: Vec<String>,
    /// Minimum seconds between two throttled ticks of the conductor.
    pub tick_interval: f64,
    /// Groups fired by `Conductor::start`, in this order.
    pub start_phases: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            excluded_keywords: vec!["ordered_runtime".to_string(), "ordered_macro".to_string()],
            tick_interval: 0.05,
            start_phases: groups::START_PHASES.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl RegistryConfig {
    pub const SECTION: &'static str = "ordered";

    /// Read the `ordered` section, falling back to defaults when it is absent.
    pub fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        let registry_config = match settings.get::<RegistryConfig>(Self::SECTION) {
            Ok(registry_config) => registry_config,
            Err(::config::ConfigError::NotFound(_)) => Self::default(),
            Err(e) => return Err(e.into()),
        };
        registry_config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !self.tick_interval.is_finite() || self.tick_interval < 0.0 {
            return Err(ConfigError::Invalid {
                key: "ordered.tick_interval",
                reason: format!("expected seconds >= 0, got {}", self.tick_interval),
            });
        }
        Ok(self)
    }

    /// True when `module_path` matches one of the exclusion keywords.
    pub fn is_excluded(&self, module_path: &str) -> bool {
        self.excluded_keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && module_path.contains(keyword.as_str()))
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("ordered.excluded_keywords")
        .with_list_parse_key("ordered.start_phases")
}

/// Load config from a specific TOML file
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(environment())
        .build()?;
    Ok(config)
}

/// Load config from a specific YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(environment())
        .build()?;
    Ok(config)
}

/// Resolve config placeholder like ${app.interval} or ${app.interval:default}
pub fn resolve_config_value(value: &str, config: &Config) -> Result<String, ::config::ConfigError> {
    let Some(inner) = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(value.to_string());
    };

    match inner.split_once(':') {
        Some((key, default_value)) => match config.get_string(key) {
            Ok(resolved) => Ok(resolved),
            Err(_) => Ok(default_value.to_string()),
        },
        None => config.get_string(inner),
    }
}
