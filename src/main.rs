#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

mod app_data;
mod aulas;
mod cache_control;
mod config;
mod docs;
mod error_handler;
mod health;
mod index;
mod logging;
mod page_helper;
mod schema;
#[cfg(test)]
mod test_utils;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use listenfd::ListenFd;
use tracing_actix_web::TracingLogger;

use crate::aulas::{AulaRepository, AulaService, InMemoryAulaRepository, PgAulaRepository};
use crate::cache_control::CacheController;
use crate::config::{CorsOrigins, Settings, StorageBackend};

fn init_repository(settings: &Settings) -> io::Result<Arc<dyn AulaRepository>> {
    match settings.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Ok(Arc::new(InMemoryAulaRepository::new()))
        }
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .ok_or_else(|| io::Error::other("DATABASE_URL must be set"))?;
            let db_app_state = app_data::db::init_app_state(database_url, settings.db_pool_size)
                .map_err(io::Error::other)?;
            db_app_state
                .run_pending_migrations()
                .map_err(io::Error::other)?;
            Ok(Arc::new(PgAulaRepository::new(db_app_state)))
        }
    }
}

fn cors(origins: &CorsOrigins) -> Cors {
    match origins {
        CorsOrigins::Any => Cors::permissive(),
        CorsOrigins::List(origins) => origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
    }
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let settings = Settings::from_env().map_err(io::Error::other)?;

    logging::init_tracing(settings.log_format);

    let repository = init_repository(&settings)?;
    let aula_service = web::Data::new(AulaService::new(repository.clone()));
    let repository = web::Data::new(repository);
    let app_settings = web::Data::new(settings.clone());

    tracing::info!(
        "Starting {} v{} with {:?} storage",
        settings.project_name,
        settings.version,
        settings.storage_backend
    );

    let server_settings = settings.clone();
    let mut listenfd = ListenFd::from_env();
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_settings.clone())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(cors(&server_settings.cors_origins))
            .configure(index::init_routes)
            .service(
                web::scope(&server_settings.api_v1_str)
                    .app_data(aula_service.clone())
                    .app_data(repository.clone())
                    .wrap(CacheController::default_no_store())
                    .configure(error_handler::init_extractors)
                    .configure(aulas::init_routes)
                    .configure(health::init_routes),
            )
            .service(docs::rapidoc(&server_settings))
    });

    server = match listenfd.take_tcp_listener(0)? {
        Some(listener) => server.listen(listener)?,
        None => server.bind(settings.bind_address())?,
    };

    server.run().await
}
