#![forbid(unsafe_code)]

//! Mount options: host JSON merged over the document-seeded configuration.
//!
//! The JSON object may override any [`StageConfig`] field (camelCase) and
//! may set `logLevel` (`trace`, `debug`, `info`, `warn`, `error`, `off`).
//! Fields it does not mention keep the seeded values, so `--fw`/`--fs` from
//! the stylesheet apply unless the JSON sets `restWeight`/`restStretch`.

use serde_json::{Map, Value};
use stretchy_core::{ConfigError, StageConfig};
use tracing::level_filters::LevelFilter;

/// Log level when the host does not choose one.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;

const LOG_LEVEL_KEY: &str = "logLevel";

/// Fully resolved mount options.
#[derive(Debug, Clone, PartialEq)]
pub struct MountOptions {
    pub config: StageConfig,
    pub log_level: LevelFilter,
}

/// Options error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// The JSON failed to parse or did not match the configuration schema.
    Json(String),
    /// The JSON parsed but is not an object.
    NotAnObject,
    /// `logLevel` is not a recognised level.
    LogLevel(String),
    /// The merged configuration failed validation.
    Config(ConfigError),
}

impl core::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid options JSON: {msg}"),
            Self::NotAnObject => f.write_str("options must be a JSON object"),
            Self::LogLevel(raw) => write!(f, "unknown logLevel: {raw}"),
            Self::Config(err) => write!(f, "invalid option {err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for OptionsError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Merge `json` (if any) over `seed` and validate the result.
///
/// Blank strings and JSON `null` mean "no overrides".
pub fn resolve(seed: StageConfig, json: Option<&str>) -> Result<MountOptions, OptionsError> {
    let raw = json.map(str::trim).filter(|raw| !raw.is_empty());
    let mut overrides = match raw {
        None => Map::new(),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(_) => return Err(OptionsError::NotAnObject),
            Err(err) => return Err(OptionsError::Json(err.to_string())),
        },
    };

    let log_level = match overrides.remove(LOG_LEVEL_KEY) {
        None | Some(Value::Null) => DEFAULT_LOG_LEVEL,
        Some(Value::String(level)) => level
            .parse::<LevelFilter>()
            .map_err(|_| OptionsError::LogLevel(level))?,
        Some(other) => return Err(OptionsError::LogLevel(other.to_string())),
    };

    let config = if overrides.is_empty() {
        seed
    } else {
        let mut merged = match serde_json::to_value(&seed) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(err) => return Err(OptionsError::Json(err.to_string())),
        };
        merged.extend(overrides);
        serde_json::from_value(Value::Object(merged))
            .map_err(|err| OptionsError::Json(err.to_string()))?
    };
    config.validate()?;

    Ok(MountOptions { config, log_level })
}
