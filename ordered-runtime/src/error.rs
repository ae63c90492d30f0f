use thiserror::Error;

/// Failure while loading or reading registry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid `{key}` setting: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failure while turning one type's declared metadata into catalog descriptors.
///
/// Never fatal for the catalog as a whole: the offending type is skipped.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{method}: placeholder `{value}` could not be resolved: {source}")]
    Unresolved {
        method: String,
        value: String,
        #[source]
        source: ::config::ConfigError,
    },

    #[error("{method}: `{value}` is not a duration")]
    BadDuration { method: String, value: String },

    #[error("{method}: invalid time unit `{unit}`")]
    BadTimeUnit { method: String, unit: String },

    #[error("{method}: {field} must be a finite number of seconds >= 0, got {secs}")]
    OutOfRange {
        method: String,
        field: &'static str,
        secs: f64,
    },
}
