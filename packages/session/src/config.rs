//! Session configuration.
//!
//! Loaded from the TOML file named by `CRIME_STATS_CONFIG` when set, with
//! `CRIME_STATS_MAX_FILE_SIZE_MB` and `CRIME_STATS_DATA_FILE` applied on top.
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::SessionError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CRIME_STATS_CONFIG";
/// Environment variable overriding [`SessionConfig::max_upload_mb`].
pub const MAX_FILE_SIZE_ENV: &str = "CRIME_STATS_MAX_FILE_SIZE_MB";
/// Environment variable that puts a data file ahead of the default paths.
pub const DATA_FILE_ENV: &str = "CRIME_STATS_DATA_FILE";

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Default file locations, first existing wins.
    pub default_data_paths: Vec<PathBuf>,
    /// Upload size limit in megabytes.
    pub max_upload_mb: u64,
    /// Accepted upload extensions, without the dot.
    pub allowed_extensions: Vec<String>,
    /// Ranking size when the user does not pick one.
    pub default_top_n: usize,
    /// Area menu entries taken from each hierarchy kind.
    pub menu_areas_per_kind: usize,
    /// Area menu length limit.
    pub menu_max_options: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_data_paths: vec![
                PathBuf::from("crime_data.txt"),
                PathBuf::from("data/crime_data.txt"),
                PathBuf::from("./crime_data.txt"),
            ],
            max_upload_mb: 50,
            allowed_extensions: vec!["csv".to_string()],
            default_top_n: 10,
            menu_areas_per_kind: 10,
            menu_max_options: 25,
        }
    }
}

impl SessionConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the document is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SessionError> {
        toml::de::from_str(toml_str).map_err(|e| SessionError::Config {
            message: e.to_string(),
        })
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the file cannot be read, or
    /// [`SessionError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, SessionError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or an override
    /// is not a valid value.
    pub fn load() -> Result<Self, SessionError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Like [`SessionConfig::load`], with variables looked up through `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or an override
    /// is not a valid value.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, SessionError> {
        let mut config = match env(CONFIG_ENV) {
            Some(path) => {
                log::info!("Loading session config from {path}");
                Self::from_file(Path::new(&path))?
            }
            None => Self::default(),
        };

        if let Some(value) = env(MAX_FILE_SIZE_ENV) {
            config.max_upload_mb = value.trim().parse().map_err(|_| SessionError::Config {
                message: format!("{MAX_FILE_SIZE_ENV} must be a whole number, got '{value}'"),
            })?;
        }

        if let Some(path) = env(DATA_FILE_ENV) {
            config.default_data_paths.insert(0, PathBuf::from(path));
        }

        Ok(config)
    }

    /// Upload size limit in bytes.
    #[must_use]
    pub const fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Returns `true` if `file_name` ends in an allowed extension,
    /// ignoring case.
    #[must_use]
    pub fn is_allowed_file(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str("max_upload_mb = 10\n").unwrap();
        assert_eq!(config.max_upload_mb, 10);
        assert_eq!(config.default_top_n, 10);
        assert_eq!(config.allowed_extensions, vec!["csv"]);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        assert!(matches!(
            SessionConfig::from_toml_str("max_upload_mb = \"lots\""),
            Err(SessionError::Config { .. })
        ));
    }

    #[test]
    fn loads_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "default_top_n = 5\nmenu_max_options = 20\n").unwrap();

        let config = SessionConfig::load_with(env_from(&[
            (CONFIG_ENV, path.to_str().unwrap()),
            (MAX_FILE_SIZE_ENV, "8"),
            (DATA_FILE_ENV, "/srv/crime.txt"),
        ]))
        .unwrap();

        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.menu_max_options, 20);
        assert_eq!(config.max_upload_mb, 8);
        assert_eq!(config.default_data_paths[0], PathBuf::from("/srv/crime.txt"));
        assert_eq!(config.default_data_paths.len(), 4);
    }

    #[test]
    fn bad_size_override_is_rejected() {
        assert!(matches!(
            SessionConfig::load_with(env_from(&[(MAX_FILE_SIZE_ENV, "fifty")])),
            Err(SessionError::Config { .. })
        ));
    }

    #[test]
    fn no_env_gives_defaults() {
        let config = SessionConfig::load_with(env_from(&[])).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.max_upload_bytes(), 50 * 1024 * 1024);
    }

    #[test]
    fn huge_size_override_saturates() {
        let config = SessionConfig::load_with(env_from(&[(
            MAX_FILE_SIZE_ENV,
            "18446744073709551615",
        )]))
        .unwrap();
        assert_eq!(config.max_upload_mb, u64::MAX);
        assert_eq!(config.max_upload_bytes(), u64::MAX);
    }

    #[test]
    fn extension_check_ignores_case() {
        let config = SessionConfig::default();
        assert!(config.is_allowed_file("data.csv"));
        assert!(config.is_allowed_file("DATA.CSV"));
        assert!(!config.is_allowed_file("data.xlsx"));
        assert!(!config.is_allowed_file("csv"));
    }
}
