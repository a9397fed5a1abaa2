use serde_json::json;
use std::convert::Infallible;
use warp::{reject, Filter, Rejection, Reply};

use crate::photo_ingest::PhotoLibrary;
use crate::warp_helpers::{with_library, StorageError};

pub async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

pub async fn ready_check(library: PhotoLibrary) -> Result<impl Reply, Rejection> {
    if library.upload_dir().is_dir() {
        Ok(warp::reply::json(&json!({
            "status": "ready",
            "storage": "available",
            "photos": library.load().len(),
            "today": library.today(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })))
    } else {
        log::error!(
            "Upload directory is missing: {}",
            library.upload_dir().display()
        );
        Err(reject::custom(StorageError {
            message: "Upload directory unavailable".to_string(),
        }))
    }
}

pub fn build_health_routes(
    library: PhotoLibrary,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let health = warp::path("health").and(warp::get()).and_then(health_check);

    let ready = warp::path("ready")
        .and(warp::get())
        .and(with_library(library))
        .and_then(ready_check);

    health.or(ready)
}
