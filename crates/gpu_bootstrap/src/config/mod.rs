//! Configuration system
//!
//! Every value defaults to a build-time constant. A session file, in TOML or
//! RON, overrides whichever fields it names.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
pub use serde::{Deserialize, Serialize};

use crate::vulkan::ApiVersion;

/// Session file name the binary looks for in its working directory
pub const DEFAULT_CONFIG_FILE: &str = "vulkan2.toml";

/// On-disk encodings a config file may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration loadable from a TOML or RON file
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Decode `contents` in the given format
    fn parse(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Read and decode the file at `path`
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents, format)
    }

    /// Like [`Config::load_from_file`], but a missing file yields the defaults
    fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::load_from_file(path)
        } else {
            log::debug!("No configuration at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Contents did not decode into the configuration type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Application and engine identity passed to the driver at instance creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppIdentity {
    /// Application name
    pub application_name: String,
    /// Application version
    pub application_version: ApiVersion,
    /// Engine name
    pub engine_name: String,
    /// Engine version
    pub engine_version: ApiVersion,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            application_name: "Vulkan2".to_string(),
            application_version: ApiVersion::new(0, 0, 1),
            engine_name: "danielsEngine".to_string(),
            engine_version: ApiVersion::new(0, 0, 1),
        }
    }
}

/// Window creation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Client width in screen coordinates
    pub width: u32,
    /// Client height in screen coordinates
    pub height: u32,
    /// Window title
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Vulkan2".to_string(),
        }
    }
}

/// Routing options for validation-layer messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsSettings {
    /// Append-only file that receives info-severity messages
    pub info_log_path: PathBuf,
    /// Subscribe to info-severity messages
    pub capture_info: bool,
    /// Subscribe to verbose-severity messages
    pub capture_verbose: bool,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            info_log_path: PathBuf::from("validation.log"),
            capture_info: true,
            capture_verbose: true,
        }
    }
}

/// Everything the bootstrap sequence needs to know up front
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Identity reported to the driver
    pub identity: AppIdentity,
    /// Window parameters
    pub window: WindowSettings,
    /// Idle time between lifecycle loop iterations, in milliseconds
    pub frame_interval_ms: u64,
    /// Validation message routing
    pub diagnostics: DiagnosticsSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity: AppIdentity::default(),
            window: WindowSettings::default(),
            frame_interval_ms: 300,
            diagnostics: DiagnosticsSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Idle interval between loop iterations
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Config for SessionConfig {}
