use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// URL prefix under which stored binaries are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Optional camera settings entered alongside an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
}

impl CameraMetadata {
    /// Drops blank fields; returns `None` when nothing is left.
    pub fn normalized(self) -> Option<Self> {
        let metadata = CameraMetadata {
            aperture: non_blank(self.aperture),
            shutter_speed: non_blank(self.shutter_speed),
            iso: non_blank(self.iso),
            focal_length: non_blank(self.focal_length),
        };

        if metadata == CameraMetadata::default() {
            None
        } else {
            Some(metadata)
        }
    }
}

/// One photo per civil date, as persisted in the metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub file_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub caption: String,
    pub size: u64,
    pub uploaded_at: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,
    #[serde(
        rename = "metadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub camera_metadata: Option<CameraMetadata>,
}

pub fn url_for_file(file_name: &str) -> String {
    format!("{}/{}", UPLOADS_URL_PREFIX, file_name)
}

/// Sorts newest date first, the order every listing is presented in.
pub fn sort_newest_first(records: &mut [PhotoRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PhotoResult<T> = Result<T, PhotoError>;
