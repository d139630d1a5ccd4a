use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding the classifier and class mapping. `None` means next to the executable.
    pub artifact_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Config {
            host: lookup("FAUNA_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("FAUNA_PORT")
                .or_else(|| lookup("PORT"))
                .unwrap_or_else(|| "8501".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FAUNA_PORT".to_string()))?,
            artifact_dir: lookup("FAUNA_ARTIFACT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
