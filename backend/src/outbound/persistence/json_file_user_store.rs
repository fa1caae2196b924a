//! JSON file adapter for the [`UserStore`] port.
//!
//! The store file holds a single pretty-printed JSON array of records. A
//! missing file is an empty store; every other read failure is reported.
//! Writes replace the file atomically via [`super::atomic_io`].

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_io::replace_file;
use crate::domain::User;
use crate::domain::ports::{UserStore, UserStoreError};

/// User store persisted as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileUserStore {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl JsonFileUserStore {
    /// Open the store at `path`, creating its parent directory if needed.
    ///
    /// The file itself is created on the first save.
    ///
    /// # Errors
    /// Returns [`UserStoreError::Read`] when the path is not UTF-8, does not
    /// name a file, or its directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, UserStoreError> {
        let raw = path.as_ref();
        let path = Utf8Path::from_path(raw).ok_or_else(|| {
            UserStoreError::read(format!("store path {} is not valid UTF-8", raw.display()))
        })?;
        let file_name = path
            .file_name()
            .ok_or_else(|| UserStoreError::read(format!("store path {path} does not name a file")))?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| UserStoreError::read(format!("create {parent}: {err}")))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| UserStoreError::read(format!("open {parent}: {err}")))?;

        Ok(Self {
            dir: Arc::new(dir),
            file_name: Utf8PathBuf::from(file_name),
            path: path.to_path_buf(),
        })
    }

    /// Location of the store file as configured.
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}

#[async_trait]
impl UserStore for JsonFileUserStore {
    async fn load(&self) -> Result<Vec<User>, UserStoreError> {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let read = tokio::task::spawn_blocking(move || dir.read_to_string(file_name.as_std_path()))
            .await
            .map_err(|err| UserStoreError::read(format!("{}: {err}", self.path)))?;

        let contents = match read {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path, "user store file absent; treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(UserStoreError::read(format!("{}: {err}", self.path))),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents)
            .map_err(|err| UserStoreError::corrupt(format!("{}: {err}", self.path)))
    }

    async fn save(&self, users: &[User]) -> Result<(), UserStoreError> {
        let contents = serde_json::to_vec_pretty(users)
            .map_err(|err| UserStoreError::write(format!("{}: {err}", self.path)))?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        tokio::task::spawn_blocking(move || replace_file(&dir, &file_name, &contents))
            .await
            .map_err(|err| UserStoreError::write(format!("{}: {err}", self.path)))?
            .map_err(|err| UserStoreError::write(format!("{}: {err}", self.path)))?;
        debug!(path = %self.path, count = users.len(), "user store saved");
        Ok(())
    }
}
