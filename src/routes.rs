use warp::Filter;

use crate::handlers_health;
use crate::handlers_photo;
use crate::photo_ingest::PhotoLibrary;
use crate::warp_helpers::{cors, handle_rejection, with_library};

/// The full filter chain served by the binary.
pub fn build_routes(
    library: PhotoLibrary,
    max_upload_bytes: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    let health_routes = handlers_health::build_health_routes(library.clone());
    let photo_routes = build_photo_routes(library.clone(), max_upload_bytes);
    let upload_routes = build_upload_file_routes(library);

    health_routes
        .or(photo_routes)
        .or(upload_routes)
        .with(cors())
        .with(warp::log("daily_photo"))
        .recover(handle_rejection)
}

pub fn build_photo_routes(
    library: PhotoLibrary,
    max_upload_bytes: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api_photos_list = warp::path("api")
        .and(warp::path("photos"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_library(library.clone()))
        .and_then(handlers_photo::list_photos);

    let api_upload = warp::path("api")
        .and(warp::path("upload"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload_bytes))
        .and(with_library(library.clone()))
        .and_then(handlers_photo::upload_photo);

    let api_view = warp::path("api")
        .and(warp::path("view"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers_photo::ViewQuery>())
        .and(with_library(library.clone()))
        .and_then(handlers_photo::get_view);

    let api_calendar = warp::path("api")
        .and(warp::path("calendar"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers_photo::CalendarQuery>())
        .and(with_library(library))
        .and_then(handlers_photo::get_calendar);

    api_photos_list
        .or(api_upload)
        .or(api_view)
        .or(api_calendar)
}

pub fn build_upload_file_routes(
    library: PhotoLibrary,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("uploads")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_library(library))
        .and_then(handlers_photo::get_upload_file)
}
