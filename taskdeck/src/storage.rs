//! Durable client storage for the credential and display preferences.
//!
//! A small TOML key-value file under the platform data directory
//! (`~/.local/share/taskdeck/storage.toml` on Linux). Holds the
//! `access_token` credential across restarts and the `dark_mode` theme
//! preference. Reads of a missing file yield defaults; writes create the
//! parent directory as needed.

use std::path::{Path, PathBuf};

/// Errors from reading or writing the durable storage file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to read or write the storage file.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The storage file exists but is not valid TOML.
    #[error("failed to parse storage file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the storage contents.
    #[error("failed to serialize storage: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Could not determine the platform data directory.
    #[error("could not determine data directory (no HOME or XDG_DATA_HOME)")]
    NoDataDir,
}

/// On-disk shape of the storage file.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct StorageFile {
    access_token: Option<String>,
    dark_mode: Option<bool>,
}

/// Durable key-value storage backed by a TOML file.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Opens storage at the default platform location.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoDataDir`] when the platform data directory
    /// cannot be determined.
    pub fn open_default() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self {
            path: data_dir.join("taskdeck").join("storage.toml"),
        })
    }

    /// Opens storage at an explicit path (used by tests).
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The storage file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted credential, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on unreadable or malformed storage.
    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read()?.access_token)
    }

    /// Persists the credential. `None` erases it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the file cannot be written.
    pub fn set_access_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        let mut file = self.read()?;
        file.access_token = token.map(str::to_string);
        self.write(&file)
    }

    /// Returns the persisted dark-mode preference (default: dark).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on unreadable or malformed storage.
    pub fn dark_mode(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.dark_mode.unwrap_or(true))
    }

    /// Persists the dark-mode preference.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the file cannot be written.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError> {
        let mut file = self.read()?;
        file.dark_mode = Some(enabled);
        self.write(&file)
    }

    fn read(&self) -> Result<StorageFile, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StorageFile::default()),
            Err(e) => Err(StorageError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write(&self, file: &StorageFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let contents = toml::to_string(file)?;
        std::fs::write(&self.path, contents).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}
