use bytes::BufMut;
use chrono::{Datelike, NaiveDate};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use warp::multipart::{FormData, Part};
use warp::{reject, Rejection, Reply};

use crate::availability::AvailabilityIndex;
use crate::calendar::{year_view, MonthView};
use crate::civil_clock::{format_timestamp, parse_civil_date};
use crate::mimetype_detector;
use crate::navigation::{nearest, Direction, DisplayState, Navigator};
use crate::photo_ingest::{validate_date, NewPhoto, PhotoLibrary};
use crate::photo_types::{sort_newest_first, CameraMetadata, PhotoRecord};
use crate::warp_helpers::{no_store, validation_error, NotFoundError, StorageError};

#[derive(Debug, Serialize)]
pub struct PhotosResponse {
    pub success: bool,
    pub photos: Vec<PhotoRecord>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_path: String,
    pub date: NaiveDate,
    pub caption: String,
    pub metadata: PhotoRecord,
    pub replaced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub date: Option<String>,
    /// Steps from `date` (or today) to the nearest dated photo.
    pub direction: Option<Direction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub today: NaiveDate,
    pub date: NaiveDate,
    pub is_placeholder: bool,
    pub caption: String,
    pub url: Option<String>,
    pub display: DisplayState,
    pub prev_date: Option<NaiveDate>,
    pub next_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub today: NaiveDate,
    pub months: Vec<MonthView>,
}

pub async fn list_photos(library: PhotoLibrary) -> Result<impl Reply, Rejection> {
    let mut photos = library.load();
    sort_newest_first(&mut photos);

    Ok(no_store(warp::reply::json(&PhotosResponse {
        success: true,
        photos,
        timestamp: format_timestamp(library.clock().now()),
    })))
}

pub async fn upload_photo(form: FormData, library: PhotoLibrary) -> Result<impl Reply, Rejection> {
    let upload = read_upload_form(form).await?;
    store_upload(upload, &library).map(|response| warp::reply::json(&response))
}

/// Validates an upload against today and hands it to ingestion.
pub fn store_upload(upload: NewPhoto, library: &PhotoLibrary) -> Result<UploadResponse, Rejection> {
    if upload.data.is_empty() {
        return Err(validation_error("Image and date are required"));
    }
    let date = validate_date(upload.date.as_deref())?;
    let today = library.today();
    if date > today {
        return Err(validation_error(format!(
            "Cannot upload a photo for a future date ({} is after {})",
            date, today
        )));
    }

    let outcome = library.ingest(upload)?;

    Ok(UploadResponse {
        success: true,
        file_path: outcome.photo.url.clone(),
        date: outcome.photo.date,
        caption: outcome.photo.caption.clone(),
        metadata: outcome.photo,
        replaced: outcome.replaced,
        previous_file_name: outcome.previous_file_name,
    })
}

/// Reads the form one part at a time; each part is drained and dropped
/// before the next is requested.
async fn read_upload_form(form: FormData) -> Result<NewPhoto, Rejection> {
    futures::pin_mut!(form);

    let mut upload = NewPhoto::default();
    while let Some(part) = form.try_next().await.map_err(|e| {
        log::warn!("Malformed multipart body: {}", e);
        validation_error("Malformed multipart body")
    })? {
        let name = part.name().to_string();
        let filename = part.filename().map(str::to_string);
        let data = read_part(part).await.map_err(|e| {
            log::warn!("Failed to read form field {}: {}", name, e);
            validation_error(format!("Failed to read form field {}", name))
        })?;
        apply_form_field(&mut upload, &name, filename, data);
    }

    Ok(upload)
}

async fn read_part(part: Part) -> Result<Vec<u8>, warp::Error> {
    part.stream()
        .try_fold(Vec::new(), |mut data, buf| async move {
            data.put(buf);
            Ok(data)
        })
        .await
}

/// Maps one multipart field onto the upload being assembled.
pub fn apply_form_field(
    upload: &mut NewPhoto,
    name: &str,
    filename: Option<String>,
    data: Vec<u8>,
) {
    match name {
        "image" => {
            upload.original_name = filename;
            upload.data = data;
        }
        "date" => upload.date = Some(field_text(data)),
        "caption" => upload.caption = field_text(data),
        "location" => upload.location = Some(field_text(data)),
        "takenAt" => upload.taken_at = Some(field_text(data)),
        "metadata" => {
            let text = field_text(data);
            if text.trim().is_empty() {
                return;
            }
            match serde_json::from_str::<CameraMetadata>(&text) {
                Ok(metadata) => upload.camera_metadata = Some(metadata),
                Err(e) => log::warn!("Ignoring malformed camera metadata: {}", e),
            }
        }
        other => log::debug!("Ignoring unknown form field: {}", other),
    }
}

fn field_text(data: Vec<u8>) -> String {
    String::from_utf8_lossy(&data).into_owned()
}

pub async fn get_view(query: ViewQuery, library: PhotoLibrary) -> Result<impl Reply, Rejection> {
    let today = library.today();
    let selected = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            parse_civil_date(raw)
                .ok_or_else(|| validation_error(format!("Date must be YYYY-MM-DD: {}", raw)))?,
        ),
        None => None,
    };

    let records = library.load();
    Ok(no_store(warp::reply::json(&build_view(
        &records,
        selected,
        query.direction,
        today,
    ))))
}

pub fn build_view(
    records: &[PhotoRecord],
    selected: Option<NaiveDate>,
    direction: Option<Direction>,
    today: NaiveDate,
) -> ViewResponse {
    let index = AvailabilityIndex::from_records(records);
    let mut navigator = Navigator::new(selected);
    if let Some(direction) = direction {
        // at either end the selection stays put
        navigator.step(&index, direction, today);
    }
    let display = navigator.display(records, today);
    let date = display.date();

    ViewResponse {
        today,
        date,
        is_placeholder: display.is_placeholder(),
        caption: display.caption(),
        url: display.url().map(str::to_string),
        prev_date: nearest(&index, date, Direction::Prev),
        next_date: nearest(&index, date, Direction::Next),
        display,
    }
}

pub async fn get_calendar(
    query: CalendarQuery,
    library: PhotoLibrary,
) -> Result<impl Reply, Rejection> {
    let today = library.today();
    let year = query.year.unwrap_or_else(|| today.year());
    let selected = query
        .selected
        .as_deref()
        .and_then(parse_civil_date);

    let index = AvailabilityIndex::from_records(&library.load());

    Ok(no_store(warp::reply::json(&CalendarResponse {
        year,
        today,
        months: year_view(year, &index, today, selected),
    })))
}

pub async fn get_upload_file(
    file_name: String,
    library: PhotoLibrary,
) -> Result<impl Reply, Rejection> {
    let is_metadata = library
        .store()
        .path()
        .file_name()
        .is_some_and(|n| n.to_string_lossy() == file_name);
    if is_metadata {
        return Err(reject::custom(NotFoundError));
    }

    let path = library
        .binary_path(&file_name)
        .ok_or_else(|| reject::custom(NotFoundError))?;

    match tokio::fs::read(&path).await {
        Ok(file_data) => {
            let content_type = mimetype_detector::content_type_for(&file_name);
            let reply = warp::reply::with_header(file_data, "content-type", content_type);
            // File names embed the upload time, so the bytes never change.
            let reply =
                warp::reply::with_header(reply, "cache-control", "public, max-age=31536000");
            Ok(reply)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(reject::custom(NotFoundError)),
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            Err(reject::custom(StorageError {
                message: "Failed to read photo".to_string(),
            }))
        }
    }
}
