use crate::{config::SessionConfig, session::SessionError};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

///
/// SessionStorage
///
/// Key/value persistence for the session user. Values are opaque strings.
///

pub trait SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        (**self).remove(key)
    }
}

/// File-backed storage when `config.path` is set, in-memory otherwise.
#[must_use]
pub fn storage_for(config: &SessionConfig) -> Box<dyn SessionStorage> {
    match &config.path {
        Some(path) => Box::new(FileStorage::new(path)),
        None => Box::new(MemoryStorage::default()),
    }
}

///
/// MemoryStorage
///

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}

///
/// FileStorage
///
/// One JSON object of key -> string value. A missing file reads as empty;
/// every write rewrites the whole document.
///

#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text)?;

        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);

        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut first = FileStorage::new(&path);
        assert_eq!(first.get("admin_user").unwrap(), None);
        first.set("admin_user", "{}".into()).unwrap();
        first.set("theme", "dark".into()).unwrap();

        let mut second = FileStorage::new(&path);
        assert_eq!(second.get("admin_user").unwrap().as_deref(), Some("{}"));

        second.remove("admin_user").unwrap();
        second.remove("admin_user").unwrap();
        assert_eq!(first.get("admin_user").unwrap(), None);
        assert_eq!(first.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn storage_for_picks_the_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let config = SessionConfig {
            path: Some(path.clone()),
            ..SessionConfig::default()
        };

        let mut storage = storage_for(&config);
        storage.set("k", "v".into()).unwrap();
        assert!(path.exists());

        let mut memory = storage_for(&SessionConfig::default());
        memory.set("k", "v".into()).unwrap();
        assert_eq!(memory.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get("admin_user").unwrap_err();

        assert!(matches!(err, SessionError::Decode(_)));
    }
}
