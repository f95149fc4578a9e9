use actix_web::web;
use actix_web::{get, HttpResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::aulas::AulaRepository;
use crate::error_handler::ApiError;

#[utoipa::path(
    get,
    responses(
        (status = 200, description = "API and storage healthy"),
        (status = 503, description = "Service unavailable"),
    ),
    tag = "Health"
)]
#[get("")]
async fn healthz(repository: web::Data<Arc<dyn AulaRepository>>) -> Result<HttpResponse, ApiError> {
    let result = web::block(move || repository.ping()).await;

    match result {
        Ok(Ok(())) => Ok(HttpResponse::Ok().finish()),
        Ok(Err(e)) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::new(503, "Service unavailable"))
        }
        Err(_) => Err(ApiError::new(503, "Service unavailable")),
    }
}

#[derive(OpenApi)]
#[openapi(paths(healthz))]
pub struct ApiDoc;

pub fn init_routes(config: &mut web::ServiceConfig) {
    config.service(web::scope("/health").service(healthz));
}
