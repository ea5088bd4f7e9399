//! Usage: User-profile persistence as a JSON file under the platform data
//! dir.

use crate::session::user::User;
use crate::storage::{ProfileStore, StorageError};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "fellowship";
const PROFILE_FILE_NAME: &str = "profile.json";

pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `<platform data dir>/fellowship/profile.json`.
    pub fn in_data_dir() -> Result<Self, StorageError> {
        let base = dirs::data_dir()
            .ok_or_else(|| StorageError::AccessFailed("no platform data dir".to_string()))?;
        Ok(Self::new(base.join(APP_DIR_NAME).join(PROFILE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> Result<Option<User>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::AccessFailed(format!(
                    "profile read failed: {err}"
                )))
            }
        };
        let user = serde_json::from_str(&raw).map_err(|err| {
            StorageError::AccessFailed(format!("stored profile is corrupt: {err}"))
        })?;
        Ok(Some(user))
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                StorageError::AccessFailed(format!("profile dir create failed: {err}"))
            })?;
        }

        let content = serde_json::to_string_pretty(user).map_err(|err| {
            StorageError::AccessFailed(format!("profile encode failed: {err}"))
        })?;

        // Write-then-rename so a crash mid-write cannot leave a torn file.
        let tmp_path = self.path.with_file_name(format!("{PROFILE_FILE_NAME}.tmp"));
        std::fs::write(&tmp_path, content).map_err(|err| {
            StorageError::AccessFailed(format!("profile tmp write failed: {err}"))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|err| {
            let _ = std::fs::remove_file(&tmp_path);
            StorageError::AccessFailed(format!("profile rename failed: {err}"))
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::AccessFailed(format!(
                "profile delete failed: {err}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "12345".to_string(),
            name: "Jess Example".to_string(),
            username: "jess".to_string(),
            profile_image_url: Some("https://pbs.twimg.com/profile_images/1/photo.jpg".to_string()),
            follow_metrics: None,
        }
    }

    #[test]
    fn load_on_fresh_path_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileProfileStore::new(dir.path().join("profile.json"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileProfileStore::new(dir.path().join("nested").join("profile.json"));

        store.save(&sample_user()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample_user()));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clear absent");
    }

    #[test]
    fn corrupt_profile_surfaces_access_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = FileProfileStore::new(path);
        assert!(matches!(
            store.load(),
            Err(StorageError::AccessFailed(_))
        ));
    }
}
