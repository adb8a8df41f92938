use crate::{DEFAULT_EMAIL_DOMAIN, DEFAULT_MAX_IMAGE_BYTES, DEFAULT_SESSION_KEY, db::IdStrategy};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// AdminConfig
///
/// Console configuration. Every section is optional in TOML; missing keys
/// take their defaults.
///
/// ```toml
/// id_strategy = "max_plus_one"
///
/// [session]
/// storage_key = "admin_user"
/// email_domain = "easyqist.com"
/// path = "session.json"
///
/// [images]
/// max_bytes = 307200
/// allowed_prefix = "image/"
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    pub id_strategy: IdStrategy,
    pub session: SessionConfig,
    pub images: ImageRules,
}

impl AdminConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

///
/// SessionConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub storage_key: String,
    pub email_domain: String,

    /// JSON file backing the session; in-memory when unset.
    pub path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_SESSION_KEY.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            path: None,
        }
    }
}

///
/// ImageRules
/// Limits applied to uploaded product images.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageRules {
    pub max_bytes: u64,
    pub allowed_prefix: String,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_prefix: "image/".to_string(),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_the_default() {
        let config = AdminConfig::from_toml_str("").unwrap();

        assert_eq!(config, AdminConfig::default());
        assert_eq!(config.id_strategy, IdStrategy::Monotonic);
        assert_eq!(config.session.storage_key, "admin_user");
        assert_eq!(config.images.max_bytes, 307_200);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AdminConfig::from_toml_str(
            r#"
            id_strategy = "max_plus_one"

            [session]
            email_domain = "example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.id_strategy, IdStrategy::MaxPlusOne);
        assert_eq!(config.session.email_domain, "example.org");
        assert_eq!(config.session.storage_key, "admin_user");
        assert!(config.session.path.is_none());
        assert_eq!(config.images.allowed_prefix, "image/");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AdminConfig::from_toml_str("colour = \"blue\"").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[images]\nmax_bytes = 1024").unwrap();

        let config = AdminConfig::load(file.path()).unwrap();
        assert_eq!(config.images.max_bytes, 1024);

        let missing = AdminConfig::load(file.path().with_extension("absent")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
