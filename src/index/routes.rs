use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::config::Settings;

#[get("/")]
async fn index(settings: web::Data<Settings>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": format!("Bienvenido a la API de {}", settings.project_name),
        "version": settings.version,
        "docs": "/docs",
    }))
}

pub fn init_routes(config: &mut web::ServiceConfig) {
    config.service(index);
}
