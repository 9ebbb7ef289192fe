//! Local-directory implementation of the storage port.
//!
//! # Design
//! - The root directory is the container; object keys are `/`-separated paths below it.
//! - Renames copy then delete, matching object-store semantics. A failed delete after a
//!   successful copy is reported as an error and leaves both objects in place.
//! - Quarantine is all or nothing: if the sidecar or the source delete fails, the copy and
//!   any sidecar are removed again and the object stays at its original key.
//! - Quarantine metadata lives in a sidecar JSON file under [`META_DIR_NAME`], outside the
//!   key space visible to intake rules.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use intake_config::IntakeConfiguration;
use intake_core::{
    Clock, StorageError, StorageGateway, StorageResult, SystemClock, quarantine_key,
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{FsOpsError, FsOpsResult};

/// Directory under the root that holds gateway metadata.
pub const META_DIR_NAME: &str = ".intake";
const META_SUFFIX: &str = ".meta.json";

/// Sidecar record written next to every quarantined object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineMetadata {
    /// Key the object had before it was quarantined.
    pub source_key: String,
    /// Failure reason supplied by the engine.
    pub reason: String,
    /// Timestamp used in the quarantine key.
    pub quarantined_at: String,
}

/// Storage gateway rooted at a local directory.
pub struct LocalStorageGateway {
    root: PathBuf,
    container: String,
    config: IntakeConfiguration,
    clock: Arc<dyn Clock>,
}

impl LocalStorageGateway {
    /// Open `root` as a container. The container name defaults to the directory name.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError`] when the root cannot be resolved or is not a directory.
    pub fn open(root: impl AsRef<Path>, config: IntakeConfiguration) -> FsOpsResult<Self> {
        let requested = root.as_ref();
        let root = std::fs::canonicalize(requested)
            .map_err(|source| FsOpsError::io("canonicalize", requested, source))?;
        if !root.is_dir() {
            return Err(FsOpsError::InvalidRoot {
                path: root,
                reason: "not_a_directory",
            });
        }
        let container = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(root = %root.display(), container = %container, "opened local container");
        Ok(Self {
            root,
            container,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Override the container name reported to the engine.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Use `clock` when stamping quarantine keys.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Root directory backing the container.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the sidecar written when `quarantined_key` was quarantined.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no sidecar exists, or an IO/backend error
    /// when it cannot be read or parsed.
    pub async fn quarantine_metadata(
        &self,
        quarantined_key: &str,
    ) -> StorageResult<QuarantineMetadata> {
        let path = self.meta_path(quarantined_key)?;
        let raw = fs::read_to_string(&path)
            .await
            .map_err(|source| not_found_or_io("read_metadata", quarantined_key, source))?;
        serde_json::from_str(&raw)
            .map_err(|source| StorageError::backend("parse_metadata", quarantined_key, source))
    }

    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        Ok(self.root.join(sanitize_key(key)?))
    }

    fn meta_path(&self, key: &str) -> StorageResult<PathBuf> {
        let relative = sanitize_key(key)?;
        let mut path = self.root.join(META_DIR_NAME).join(relative);
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(META_SUFFIX);
        path.set_file_name(name);
        Ok(path)
    }

    async fn ensure_object(key: &str, path: &Path) -> StorageResult<()> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|source| not_found_or_io("stat", key, source))?;
        if metadata.is_file() {
            Ok(())
        } else {
            Err(StorageError::NotFound {
                key: key.to_string(),
            })
        }
    }

    async fn copy_object(key: &str, source: &Path, destination: &Path) -> StorageResult<()> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::io("create_parent", key, err))?;
        }
        fs::copy(source, destination)
            .await
            .map_err(|err| StorageError::io("copy", key, err))?;
        Ok(())
    }

    async fn delete_source(key: &str, source: &Path) -> StorageResult<()> {
        fs::remove_file(source).await.map_err(|err| {
            warn!(key = %key, error = %err, "source delete failed after copy");
            StorageError::io("delete", key, err)
        })
    }

    /// Remove a partially written quarantine entry so the object only exists at its source.
    async fn discard_quarantine_copy(&self, quarantined_key: &str, copy: &Path) {
        if let Err(err) = fs::remove_file(copy).await {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(
                    quarantine_key = %quarantined_key,
                    error = %err,
                    "failed to remove quarantine copy after error"
                );
            }
        }
        if let Ok(sidecar) = self.meta_path(quarantined_key) {
            let _ = fs::remove_file(sidecar).await;
        }
        debug!(quarantine_key = %quarantined_key, "quarantine rolled back");
    }

    async fn write_metadata(&self, key: &str, record: &QuarantineMetadata) -> StorageResult<()> {
        let path = self.meta_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::io("create_metadata_dir", key, err))?;
        }
        let serialised = serde_json::to_string_pretty(record)
            .map_err(|err| StorageError::backend("serialise_metadata", key, err))?;
        fs::write(&path, serialised)
            .await
            .map_err(|err| StorageError::io("write_metadata", key, err))
    }
}

#[async_trait]
impl StorageGateway for LocalStorageGateway {
    async fn rename_object(&self, key: &str, new_key: &str) -> StorageResult<()> {
        let source = self.resolve(key)?;
        let destination = self.resolve(new_key)?;
        Self::ensure_object(key, &source).await?;
        Self::copy_object(key, &source, &destination).await?;
        Self::delete_source(key, &source).await?;
        debug!(key = %key, new_key = %new_key, "object renamed on disk");
        Ok(())
    }

    async fn move_to_quarantine(
        &self,
        key: &str,
        scope_path: &str,
        reason: &str,
    ) -> StorageResult<String> {
        let source = self.resolve(key)?;
        Self::ensure_object(key, &source).await?;

        let quarantined_at = self.clock.timestamp();
        let destination_key = quarantine_key(scope_path, &quarantined_at, key);
        let destination = self.resolve(&destination_key)?;

        Self::copy_object(key, &source, &destination).await?;
        let record = QuarantineMetadata {
            source_key: key.to_string(),
            reason: reason.to_string(),
            quarantined_at,
        };
        let finished = match self.write_metadata(&destination_key, &record).await {
            Ok(()) => Self::delete_source(key, &source).await,
            Err(err) => Err(err),
        };
        if let Err(err) = finished {
            self.discard_quarantine_copy(&destination_key, &destination).await;
            return Err(err);
        }

        info!(key = %key, quarantine_key = %destination_key, "object quarantined on disk");
        Ok(destination_key)
    }

    fn configuration(&self) -> &IntakeConfiguration {
        &self.config
    }

    fn container_name(&self) -> &str {
        &self.container
    }
}

fn sanitize_key(key: &str) -> StorageResult<PathBuf> {
    let invalid = |reason: &'static str| StorageError::InvalidKey {
        key: key.to_string(),
        reason,
    };
    if key.is_empty() {
        return Err(invalid("empty"));
    }
    if key.starts_with('/') || Path::new(key).is_absolute() {
        return Err(invalid("absolute"));
    }

    let mut relative = PathBuf::new();
    for segment in key.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty_segment"));
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => relative.push(part),
            _ => return Err(invalid("invalid_segment")),
        }
    }
    if relative.starts_with(META_DIR_NAME) {
        return Err(invalid("reserved_prefix"));
    }
    Ok(relative)
}

fn not_found_or_io(operation: &'static str, key: &str, source: io::Error) -> StorageError {
    if source.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound {
            key: key.to_string(),
        }
    } else {
        StorageError::io(operation, key, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_key_accepts_nested_keys() -> StorageResult<()> {
        assert_eq!(
            sanitize_key("in/2024/my report.csv")?,
            PathBuf::from("in").join("2024").join("my report.csv")
        );
        Ok(())
    }

    #[test]
    fn sanitize_key_rejects_escapes() {
        for (key, expected) in [
            ("", "empty"),
            ("/etc/passwd", "absolute"),
            ("in//a", "empty_segment"),
            ("in/", "empty_segment"),
            ("in/../secret", "invalid_segment"),
            ("./in/a", "invalid_segment"),
            (".intake/in/a.meta.json", "reserved_prefix"),
        ] {
            match sanitize_key(key) {
                Err(StorageError::InvalidKey { reason, .. }) => {
                    assert_eq!(reason, expected, "{key}");
                }
                other => panic!("{key}: expected invalid key, got {other:?}"),
            }
        }
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let err = not_found_or_io("stat", "k", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, StorageError::NotFound { .. }));
        let err = not_found_or_io("stat", "k", io::Error::other("disk"));
        assert!(matches!(err, StorageError::Io { operation: "stat", .. }));
    }
}
