//! File-backed state for the CLI.
//!
//! Secrets are kept in a JSON map next to the CLI's other data. The file is rewritten through a
//! temporary file and a rename so a crash never leaves it half written. This is a development
//! tool: the file is only protected by filesystem permissions.
//!
//! The in-process SDK's accounts live in a second file in the same directory, so a user who
//! signed up in one invocation can sign in from the next.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use aegiskit_core::{CredentialStore, MemorySdkSnapshot, StorageError, StorageResult};
use serde::{de::DeserializeOwned, Serialize};

const FILE_NAME: &str = "credentials.json";
const SDK_STATE_FILE_NAME: &str = "sdk_state.json";

/// A JSON document replaced atomically on every write.
struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    fn load<T: DeserializeOwned + Default>(&self) -> StorageResult<T> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
        }
    }

    fn save<T: Serialize>(&self, value: &T) -> StorageResult<()> {
        let write_err = |e: std::io::Error| StorageError::Write(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(write_err)?;
        restrict_permissions(&tmp).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

pub struct FileCredentialStore {
    file: JsonFile,
}

impl FileCredentialStore {
    /// Opens (without creating) the store inside `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile {
                path: data_dir.join(FILE_NAME),
            },
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        self.file.load()
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(&key))
    }

    fn set(&self, key: String, secret: String) -> StorageResult<()> {
        let mut entries = self.load()?;
        entries.insert(key, secret);
        self.file.save(&entries)
    }

    fn delete(&self, key: String) -> StorageResult<()> {
        let mut entries = self.load()?;
        if entries.remove(&key).is_none() {
            return Ok(());
        }
        self.file.save(&entries)
    }
}

/// Accounts of the in-process SDK, persisted between invocations.
pub struct SdkStateFile {
    file: JsonFile,
}

impl SdkStateFile {
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile {
                path: data_dir.join(SDK_STATE_FILE_NAME),
            },
        }
    }

    /// The saved snapshot, or an empty one before the first save.
    pub fn load(&self) -> StorageResult<MemorySdkSnapshot> {
        self.file.load()
    }

    pub fn save(&self, snapshot: &MemorySdkSnapshot) -> StorageResult<()> {
        self.file.save(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use aegiskit_core::RegisteredUser;

    use super::*;

    #[test]
    fn test_values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());
        assert!(store.get("k".to_string()).unwrap().is_none());

        store.set("k".to_string(), "0xsecret".to_string()).unwrap();
        let reopened = FileCredentialStore::new(dir.path());
        assert_eq!(reopened.get("k".to_string()).unwrap().as_deref(), Some("0xsecret"));

        reopened.delete("k".to_string()).unwrap();
        reopened.delete("k".to_string()).unwrap();
        assert!(store.get("k".to_string()).unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_created_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(&dir.path().join("nested").join("aegiskit"));
        store.set("k".to_string(), "v".to_string()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), b"{not json").unwrap();
        let store = FileCredentialStore::new(dir.path());
        assert!(matches!(
            store.get("k".to_string()),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_sdk_state_sits_beside_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let state = SdkStateFile::new(dir.path());
        assert_eq!(state.load().unwrap(), MemorySdkSnapshot::default());

        let snapshot = MemorySdkSnapshot {
            users: vec![RegisteredUser {
                email: "a@b.com".to_string(),
                user_id: "user-1".to_string(),
                password_sha256: "00".to_string(),
                wallet_address: None,
            }],
            signed_in: Some("a@b.com".to_string()),
        };
        state.save(&snapshot).unwrap();

        assert_eq!(SdkStateFile::new(dir.path()).load().unwrap(), snapshot);
        assert!(dir.path().join(SDK_STATE_FILE_NAME).exists());
        assert!(!dir.path().join(FILE_NAME).exists());
    }
}
