pub mod availability;
pub mod calendar;
pub mod civil_clock;
pub mod config;
pub mod handlers_health;
pub mod handlers_photo;
pub mod metadata_store;
pub mod mimetype_detector;
pub mod navigation;
pub mod photo_ingest;
pub mod photo_types;
pub mod routes;
pub mod warp_helpers;
