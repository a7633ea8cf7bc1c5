//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use std::io;
use std::path::Path;
use std::sync::Arc;

use deadline_service::routes::{deadline_routes, directory_routes, AppState};
use deadline_service::services::directory::DirectoryStore;
use deadline_service::utils::auth_middleware::Authentication;
use deadline_service::utils::config::AppConfig;
use deadline_service::utils::deadline_storage::FsDeadlineStore;
use deadline_service::utils::directory_storage::{self, DirectoryLoader};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let storage_root = Path::new(&config.storage_path);
    std::fs::create_dir_all(storage_root)?;

    let snapshot = directory_storage::load_snapshot(storage_root).map_err(|e| {
        error!("❌ Failed to load directory: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    let directory = Arc::new(DirectoryStore::new(snapshot));
    let state = AppState::new(directory.clone(), Arc::new(FsDeadlineStore::new(storage_root)))
        .with_loader(Arc::new(DirectoryLoader::new(storage_root, directory)));

    info!("Server started at {}", config.bind_address);

    let secret = config.jwt_secret.clone();
    let cors_permissive = config.cors_permissive;
    HttpServer::new(move || {
        let cors = if cors_permissive { Cors::permissive() } else { Cors::default() };
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Authentication::new(secret.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(deadline_routes::init_routes)
            .configure(directory_routes::init_routes)
    })
        .bind(&config.bind_address)?
        .run()
        .await
}
