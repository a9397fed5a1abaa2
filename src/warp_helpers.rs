use crate::photo_ingest::PhotoLibrary;
use crate::photo_types::PhotoError;
use serde::Serialize;
use std::convert::Infallible;

use warp::{reject, Filter, Rejection, Reply};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub timestamp: String,
}

#[derive(Debug)]
pub struct StorageError {
    pub message: String,
}

impl reject::Reject for StorageError {}

#[derive(Debug)]
pub struct NotFoundError;
impl reject::Reject for NotFoundError {}

#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl reject::Reject for ValidationError {}

impl From<PhotoError> for Rejection {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::Validation(message) => reject::custom(ValidationError { message }),
            other => {
                log::error!("Storage error: {}", other);
                reject::custom(StorageError {
                    message: "Failed to store photo".to_string(),
                })
            }
        }
    }
}

pub fn validation_error(message: impl Into<String>) -> Rejection {
    reject::custom(ValidationError {
        message: message.into(),
    })
}

pub fn with_library(
    library: PhotoLibrary,
) -> impl Filter<Extract = (PhotoLibrary,), Error = Infallible> + Clone {
    warp::any().map(move || library.clone())
}

/// Marks a reply as never cacheable by browsers or proxies.
pub fn no_store(reply: impl Reply) -> impl Reply {
    let reply = warp::reply::with_header(
        reply,
        "cache-control",
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    );
    let reply = warp::reply::with_header(reply, "pragma", "no-cache");
    warp::reply::with_header(reply, "expires", "0")
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;
    let timestamp = chrono::Utc::now().to_rfc3339();

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(storage_error) = err.find::<StorageError>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = storage_error.message.clone();
    } else if err.find::<NotFoundError>().is_some() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Photo not found".to_string();
    } else if let Some(validation_error) = err.find::<ValidationError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = validation_error.message.clone();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = warp::http::StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload too large".to_string();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = warp::http::StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Unsupported media type".to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method not allowed".to_string();
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal server error".to_string();
    }

    let error_response = ErrorResponse {
        error: message,
        code: code.as_u16(),
        timestamp,
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&error_response),
        code,
    ))
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
}
