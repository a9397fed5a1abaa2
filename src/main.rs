use daily_photo::config;
use daily_photo::metadata_store::MetadataStore;
use daily_photo::photo_ingest::PhotoLibrary;
use daily_photo::routes::build_routes;

use log::{error, info};
use std::net::{IpAddr, TcpListener};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = config::Config::from_env()?;
    let port = config.port;
    let host: IpAddr = config.host.parse()?;

    info!("Starting daily photo server on {}:{}", host, port);
    info!("Data path: {}", config.data_path);
    info!("Upload directory: {}", config.storage.upload_dir.display());
    info!("Metadata: {}", config.storage.metadata_path.display());
    info!("Civil timezone: UTC{}", config.utc_offset);
    if let Some(today) = config.pinned_today {
        info!("Today is pinned to {}", today);
    }

    if !is_port_available(host, port) {
        error!(
            "Port {} is already in use. Please stop any running instance or set DAILY_PHOTO_PORT.",
            port
        );
        return Err(format!("Port {} is already in use", port).into());
    }

    let library = initialize_library(&config)?;

    let routes = build_routes(library, config.max_upload_bytes());

    info!(
        "Server started successfully, listening on http://{}:{}",
        host, port
    );

    warp::serve(routes).run((host, port)).await;

    Ok(())
}

fn is_port_available(host: IpAddr, port: u16) -> bool {
    TcpListener::bind((host, port)).is_ok()
}

fn initialize_library(
    config: &config::Config,
) -> Result<PhotoLibrary, Box<dyn std::error::Error>> {
    let store = MetadataStore::new(config.storage.metadata_path.clone());
    let library = PhotoLibrary::new(config.storage.upload_dir.clone(), store, config.clock());
    library.ensure_upload_dir()?;

    let photos = library.load();
    info!(
        "Photo library ready: {} photos, today is {}",
        photos.len(),
        library.today()
    );

    Ok(library)
}
