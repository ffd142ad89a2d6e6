use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration. Every field has a default, so running without a
/// config file is the common case.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Phrases that end the item region of a receipt.
    pub terminators: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self { terminators: recibo_lang::default_terminators() }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&raw)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_uses_builtin_terminators() {
        let config = Config::load(None).unwrap();
        assert!(config.terminators.iter().any(|t| t == "subtotal"));
    }

    #[test]
    fn config_file_overrides_terminators() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "terminators = [\"gesamtsumme\", \"mwst\"]").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.terminators, vec!["gesamtsumme", "mwst"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "terminatrs = [\"oops\"]").unwrap();

        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Some(Path::new("/nonexistent/recibo.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
