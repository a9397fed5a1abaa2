use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::photo_types::{PhotoRecord, PhotoResult};

/// Flat-file store holding every `PhotoRecord` in one JSON document.
///
/// There is no locking: the store assumes a single writer. Readers see
/// either the previous or the new document because saves go through a
/// temp file that is renamed over the target.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted records in insertion order.
    ///
    /// A missing document means no photos yet. An unreadable or corrupt one is
    /// logged and treated the same way so listings stay available.
    pub fn load(&self) -> Vec<PhotoRecord> {
        if !self.path.exists() {
            debug!("No metadata document at {}", self.path.display());
            return Vec::new();
        }

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read metadata {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to parse metadata {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Replaces the whole persisted collection.
    pub fn save(&self, records: &[PhotoRecord]) -> PhotoResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(records)?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "metadata.json".to_string());
        let temp_path = parent.join(format!("{}.tmp.{}", file_name, std::process::id()));

        let write_result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(
            "Saved {} photo records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
