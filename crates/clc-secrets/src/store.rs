//! File-backed secret store.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Owner-only directory permissions.
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Owner-only file permissions.
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Stores credentials under a root directory, one file per `(namespace, name)`.
///
/// Records are independent: there is no cross-record locking, and two
/// concurrent writes to the same record leave whichever rename lands last.
#[derive(Debug, Clone)]
pub struct SecretStore {
    root: PathBuf,
}

impl SecretStore {
    /// Create a store rooted at `root`. Nothing is touched on disk until the
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The deterministic path for a record.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is empty, reserved, or contains a
    /// path separator.
    pub fn path(&self, namespace: &str, name: &str) -> Result<PathBuf> {
        validate_component("namespace", namespace)?;
        validate_component("name", name)?;
        Ok(self.root.join(namespace).join(name))
    }

    /// Save a secret, failing fast if `cancel` has already fired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Canceled`] before touching storage when canceled,
    /// otherwise any error from [`SecretStore::write`].
    pub async fn save(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        name: &str,
        secret: &[u8],
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }
        create_dir(&self.root).await?;
        self.write(namespace, name, secret).await
    }

    /// Write a secret, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the directory or file cannot
    /// be written.
    pub async fn write(&self, namespace: &str, name: &str, secret: &[u8]) -> Result<()> {
        let path = self.path(namespace, name)?;
        create_dir(&self.root.join(namespace)).await?;
        let encoded = STANDARD.encode(secret);
        write_atomic(&path, encoded.as_bytes()).await?;
        debug!(namespace, name, "secret written");
        Ok(())
    }

    /// Read a secret back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a never-written key, [`Error::Read`] for
    /// other I/O failures, and [`Error::Decode`] if the record is corrupt.
    pub async fn read(&self, namespace: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.path(namespace, name)?;
        let encoded = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                });
            }
            Err(source) => return Err(Error::Read { path, source }),
        };
        STANDARD
            .decode(&encoded)
            .map_err(|source| Error::Decode { path, source })
    }
}

fn validate_component(kind: &str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        format!("{kind} is empty")
    } else if value == "." || value == ".." {
        format!("{kind} '{value}' is reserved")
    } else if value.contains(['/', '\\', '\0']) {
        format!("{kind} '{value}' contains a path separator")
    } else {
        return Ok(());
    };
    Err(Error::InvalidKey { reason })
}

async fn create_dir(path: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await.map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(source) = write_temp(&temp_path, bytes).await {
        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            warn!(path = %temp_path.display(), error = %e, "failed to remove temp secret file");
        }
        return Err(Error::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_temp(temp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options.open(temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    // A stale temp file keeps its old mode through open(); pin it explicitly.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(temp_path, std::fs::Permissions::from_mode(FILE_MODE)).await?;
    }
    Ok(())
}
