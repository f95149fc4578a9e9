use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::config::Settings;
use crate::{aulas, health};

pub const DOCS_HTML: &str = "\
    <!doctype html><html><head><meta charset=\"utf-8\"><title>Sistema Asignación Aulas UNSA | API</title>\
    <script type=\"module\" src=\"https://unpkg.com/rapidoc/dist/rapidoc-min.js\"></script></head><body><rapi-doc \
        spec-url = \"$specUrl\" \
        show-method-in-nav-bar = as-colored-block \
        render-style = focused \
        allow-spec-url-load = false \
        allow-spec-file-load = false \
        allow-server-selection = false \
        show-components = true \
        schema-description-expanded = true \
        default-schema-tab = schema \
        schema-expand-level = 1 \
     ></rapi-doc></body></html>";

#[derive(OpenApi)]
#[openapi(
    info(
        description = "API para la gestión de aulas del sistema de planificación de horarios.",
    ),
    tags(
        (name = "Health", description = "Estado del servicio y del almacenamiento")
    ),
)]
pub struct ApiDoc;

/// OpenAPI document with every route mounted under the configured API prefix.
pub fn openapi(settings: &Settings) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi()
        .nest(format!("{}/aulas", settings.api_v1_str), aulas::ApiDoc::openapi())
        .nest(format!("{}/health", settings.api_v1_str), health::ApiDoc::openapi());
    doc.info.title = settings.project_name.clone();
    doc.info.version = settings.version.clone();
    doc
}

pub fn rapidoc(settings: &Settings) -> RapiDoc {
    RapiDoc::with_openapi("/openapi.json", openapi(settings))
        .path("/docs")
        .custom_html(DOCS_HTML)
}
