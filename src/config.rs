use crate::filter::FilterSyntax;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    InvalidDelimiter(char),
}

/// Run defaults, loadable from a TOML file and overridden by CLI flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub delimiter: char,
    pub syntax: FilterSyntax,
    pub validate_fields: bool,
    pub unique: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            syntax: FilterSyntax::default(),
            validate_fields: true,
            unique: false,
        }
    }
}

impl FilterConfig {
    /// Delimiter as the single byte the csv reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        delimiter_byte(self.delimiter)
    }
}

pub fn delimiter_byte(delimiter: char) -> Result<u8, ConfigError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(ConfigError::InvalidDelimiter(delimiter))
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FilterConfig, ConfigError> {
    match path {
        Some(path) => load_config_from_path(path),
        None => Ok(FilterConfig::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<FilterConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = toml::from_str::<FilterConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;
    config.delimiter_byte()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.syntax, FilterSyntax::OrWrapped);
        assert!(config.validate_fields);
        assert!(!config.unique);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: FilterConfig = toml::from_str("syntax = \"quoted\"\nunique = true\n").unwrap();
        assert_eq!(config.syntax, FilterSyntax::Quoted);
        assert!(config.unique);
        assert_eq!(config.delimiter, ',');
        assert!(config.validate_fields);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = FilterConfig {
            delimiter: '§',
            ..FilterConfig::default()
        };
        assert!(matches!(
            config.delimiter_byte(),
            Err(ConfigError::InvalidDelimiter('§'))
        ));
    }
}
