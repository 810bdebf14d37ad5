//! `wildfire.toml` settings.
//!
//! ```toml
//! [data]
//! path = "data/fires.csv"
//!
//! [output]
//! dir = "data/tables"
//!
//! [analysis]
//! rolling_window = 10
//! ```
//!
//! Every section is optional. Command-line flags (and `WILDFIRE_DATA`) take
//! precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wildfire_analytics_models::AnalysisConfig;

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "wildfire.toml";

/// Default directory catalogue tables are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "data/tables";

/// Errors reading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("Invalid config {}: {source}", path.display())]
    Toml {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// No data file was configured anywhere.
    #[error("No incident CSV configured: pass --data, set WILDFIRE_DATA, or set [data] path")]
    MissingDataPath,
}

/// `[data]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Incident CSV path.
    pub path: Option<PathBuf>,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory catalogue JSON files are written to.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// The whole config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input settings.
    pub data: DataConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Catalogue tunables.
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Parses config text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not a valid config.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the config at `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::debug!("Using config {}", path.display());
                Self::from_toml_str(&text, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(
        mut self,
        data: Option<PathBuf>,
        output: Option<PathBuf>,
        rolling_window: Option<usize>,
    ) -> Self {
        if let Some(data) = data {
            self.data.path = Some(data);
        }
        if let Some(output) = output {
            self.output.dir = output;
        }
        if let Some(window) = rolling_window {
            self.analysis = self.analysis.with_rolling_window(window);
        }
        self
    }

    /// The configured incident CSV.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDataPath`] if none was configured.
    pub fn data_path(&self) -> Result<&Path, ConfigError> {
        self.data
            .path
            .as_deref()
            .ok_or(ConfigError::MissingDataPath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml_str("", Path::new("wildfire.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.analysis.rolling_window, 10);
        assert_eq!(config.output.dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(config.data_path().is_err());
    }

    #[test]
    fn reads_every_section() {
        let text = r#"
[data]
path = "fires.csv"

[output]
dir = "out"

[analysis]
rolling_window = 5
"#;
        let config = Config::from_toml_str(text, Path::new("wildfire.toml")).unwrap();
        assert_eq!(config.data_path().unwrap(), Path::new("fires.csv"));
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.analysis.rolling_window, 5);
    }

    #[test]
    fn flags_override_file() {
        let config = Config::from_toml_str("[analysis]\nrolling_window = 5", Path::new("x"))
            .unwrap()
            .with_overrides(Some(PathBuf::from("other.csv")), None, Some(3));
        assert_eq!(config.data_path().unwrap(), Path::new("other.csv"));
        assert_eq!(config.analysis.rolling_window, 3);
        assert_eq!(config.output.dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = Config::from_toml_str(
            "[analysis]\nrolling_window = \"ten\"",
            Path::new("conf/wildfire.toml"),
        );
        let Err(err @ ConfigError::Toml { .. }) = err else {
            panic!("expected a TOML error, got {err:?}");
        };
        assert!(err.to_string().starts_with("Invalid config conf/wildfire.toml: "));
    }

    #[test]
    fn unreadable_config_names_its_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("conf/wildfire.toml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("Failed to read conf/wildfire.toml: "));
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::load(Path::new("definitely/not/here/wildfire.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
