use crate::core::directory::DEFAULT_BASE_URL;
use crate::core::favorites::FAVORITES_KEY;
use crate::utils::error::{Result, UnifinderError};
use crate::utils::validation::{validate_path, validate_storage_key, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub directory: DirectoryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub favorites_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl AppConfig {
    /// Loads the configuration file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| UnifinderError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UnifinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable `VAR`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UnifinderError::ConfigError {
            message: e.to_string(),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if !missing.is_empty() {
            return Err(UnifinderError::ConfigValidationError {
                field: "environment".to_string(),
                message: format!("undefined environment variables: {}", missing.join(", ")),
            });
        }
        Ok(result.into_owned())
    }

    pub fn base_url(&self) -> &str {
        self.directory.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("unifinder"))
                .unwrap_or_else(|| PathBuf::from(".unifinder"))
        })
    }

    pub fn favorites_key(&self) -> &str {
        self.storage.favorites_key.as_deref().unwrap_or(FAVORITES_KEY)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("directory.base_url", self.base_url())?;
        validate_path("storage.data_dir", &self.data_dir().to_string_lossy())?;
        validate_storage_key("storage.favorites_key", self.favorites_key())?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
