use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::civil_clock::{format_civil_date, parse_civil_date, CivilClock};
use crate::metadata_store::MetadataStore;
use crate::photo_types::{
    non_blank, url_for_file, CameraMetadata, PhotoError, PhotoRecord, PhotoResult,
};

/// Extension used when the uploaded file name has none we can keep.
const FALLBACK_EXTENSION: &str = "bin";
const MAX_EXTENSION_LEN: usize = 10;

/// An upload as received from the client, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct NewPhoto {
    pub data: Vec<u8>,
    pub original_name: Option<String>,
    pub date: Option<String>,
    pub caption: String,
    pub location: Option<String>,
    pub taken_at: Option<String>,
    pub camera_metadata: Option<CameraMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub photo: PhotoRecord,
    pub replaced: bool,
    pub previous_file_name: Option<String>,
}

/// Owns the upload directory and the metadata document next to it.
#[derive(Debug, Clone)]
pub struct PhotoLibrary {
    upload_dir: PathBuf,
    store: MetadataStore,
    clock: CivilClock,
}

impl PhotoLibrary {
    pub fn new(upload_dir: impl Into<PathBuf>, store: MetadataStore, clock: CivilClock) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            store,
            clock,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn clock(&self) -> &CivilClock {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn ensure_upload_dir(&self) -> PhotoResult<()> {
        fs::create_dir_all(&self.upload_dir)?;
        Ok(())
    }

    pub fn load(&self) -> Vec<PhotoRecord> {
        self.store.load()
    }

    pub fn ingest(&self, upload: NewPhoto) -> PhotoResult<IngestOutcome> {
        self.ingest_at(upload, Utc::now())
    }

    /// Stores the binary and upserts its record by date.
    ///
    /// The binary is written before any metadata changes, so a failed write
    /// leaves the store untouched. A failed save after a successful write
    /// leaves an orphaned binary behind. The replaced binary is removed last
    /// and only best-effort.
    pub fn ingest_at(&self, upload: NewPhoto, now: DateTime<Utc>) -> PhotoResult<IngestOutcome> {
        if upload.data.is_empty() {
            return Err(PhotoError::Validation("Image and date are required".to_string()));
        }
        let date = validate_date(upload.date.as_deref())?;

        let file_name = derive_file_name(date, now, upload.original_name.as_deref());

        let mut records = self.store.load();
        let previous = records
            .iter()
            .position(|r| r.date == date)
            .map(|pos| records.remove(pos));

        self.ensure_upload_dir()?;
        let file_path = self.upload_dir.join(&file_name);
        fs::write(&file_path, &upload.data)?;

        let photo = PhotoRecord {
            url: url_for_file(&file_name),
            file_name: file_name.clone(),
            date,
            caption: upload.caption,
            size: upload.data.len() as u64,
            uploaded_at: self.clock.timestamp(now),
            location: non_blank(upload.location),
            taken_at: non_blank(upload.taken_at),
            camera_metadata: upload.camera_metadata.and_then(CameraMetadata::normalized),
        };

        records.push(photo.clone());
        if let Err(e) = self.store.save(&records) {
            warn!(
                "Metadata save failed after writing {}; binary is orphaned",
                file_path.display()
            );
            return Err(e);
        }

        let previous_file_name = previous.map(|old| old.file_name);
        if let Some(old_name) = previous_file_name.as_deref() {
            if old_name != file_name {
                self.remove_binary(old_name);
            }
            info!("Replaced photo for {} ({} -> {})", date, old_name, file_name);
        } else {
            info!("Stored photo for {} as {}", date, file_name);
        }

        Ok(IngestOutcome {
            photo,
            replaced: previous_file_name.is_some(),
            previous_file_name,
        })
    }

    /// Deletes a stored binary; failures are logged and swallowed.
    fn remove_binary(&self, file_name: &str) {
        let Some(path) = self.binary_path(file_name) else {
            warn!("Refusing to delete suspicious file name: {}", file_name);
            return;
        };

        if let Err(e) = fs::remove_file(&path) {
            warn!("Failed to delete replaced photo {}: {}", path.display(), e);
        }
    }

    /// Path of a stored binary, or `None` if the name could escape the
    /// upload directory.
    pub fn binary_path(&self, file_name: &str) -> Option<PathBuf> {
        let is_plain = !file_name.is_empty()
            && !file_name.contains('/')
            && !file_name.contains('\\')
            && file_name != "."
            && file_name != "..";
        is_plain.then(|| self.upload_dir.join(file_name))
    }
}

pub fn validate_date(date: Option<&str>) -> PhotoResult<NaiveDate> {
    let raw = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| PhotoError::Validation("Image and date are required".to_string()))?;

    parse_civil_date(raw)
        .ok_or_else(|| PhotoError::Validation(format!("Date must be YYYY-MM-DD: {}", raw)))
}

/// `{date}-{epoch-millis}.{ext}`, unique even across same-date replacements.
pub fn derive_file_name(date: NaiveDate, now: DateTime<Utc>, original_name: Option<&str>) -> String {
    format!(
        "{}-{}.{}",
        format_civil_date(date),
        now.timestamp_millis(),
        extension_of(original_name)
    )
}

fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
