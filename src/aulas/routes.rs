use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::OpenApi;
use validator::Validate;

use crate::aulas::{
    Aula, AulaCreate, AulaSearch, AulaService, AulaStatistics, AulaUpdate, AulasPorTipo, TipoAula,
};
use crate::error_handler::ApiError;
use crate::page_helper::PageQuery;

#[derive(Serialize, Deserialize, Debug)]
pub struct CapacityQuery {
    pub capacidad: i32,
    pub tipo: Option<TipoAula>,
}

fn validate_aula_id(aula_id: i32) -> Result<i32, ApiError> {
    match aula_id > 0 {
        true => Ok(aula_id),
        false => Err(ApiError::request_validation("aula_id debe ser mayor a 0")),
    }
}

#[utoipa::path(
    get,
    summary = "Obtener lista de aulas",
    description = "Retorna una lista paginada de todas las aulas registradas",
    tag = "Aulas",
    params(
        ("skip" = Option<i64>, Query, description = "Número de registros a saltar para paginación"),
        ("limit" = Option<i64>, Query, description = "Número máximo de registros a retornar (1-100)"),
    ),
    responses(
        (status = 200, description = "Lista de aulas", body = [Aula]),
        (status = 422, description = "Parámetros de paginación inválidos"),
    ),
)]
#[get("")]
async fn find_all(
    service: web::Data<AulaService>,
    page_query: web::Query<PageQuery<100>>,
) -> Result<HttpResponse, ApiError> {
    let page_query = page_query.into_inner();
    page_query.validate()?;
    let aulas = web::block(move || {
        service.get_all_aulas(page_query.skip(), page_query.limit())
    })
    .await??;
    Ok(HttpResponse::Ok().json(aulas))
}

#[utoipa::path(
    get,
    summary = "Obtener aula por ID",
    tag = "Aulas",
    params(
        ("aula_id" = i32, Path, description = "ID del aula")
    ),
    responses(
        (status = 200, description = "Detalles del aula", body = Aula),
        (status = 404, description = "Aula no encontrada"),
    ),
)]
#[get("/{aula_id}")]
async fn find(
    service: web::Data<AulaService>,
    aula_id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let aula_id = validate_aula_id(aula_id.into_inner())?;
    let aula = web::block(move || service.get_aula(aula_id)).await??;
    Ok(HttpResponse::Ok().json(aula))
}

#[utoipa::path(
    post,
    summary = "Crear nueva aula",
    description = "Crea un aula. El código debe ser único y seguir el formato LETRA-NUMERO (ej: A-101); la capacidad debe estar entre 1 y 500.",
    tag = "Aulas",
    request_body = AulaCreate,
    responses(
        (status = 201, description = "Aula creada", body = Aula),
        (status = 400, description = "Regla de negocio incumplida"),
        (status = 409, description = "Código de aula duplicado"),
    ),
)]
#[post("")]
async fn create(
    service: web::Data<AulaService>,
    aula: web::Json<AulaCreate>,
) -> Result<HttpResponse, ApiError> {
    let aula = aula.into_inner();
    aula.validate()?;
    let created = web::block(move || service.create_aula(aula)).await??;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    summary = "Actualizar aula",
    description = "Actualiza un aula existente. Todos los campos son opcionales; solo se modifican los campos enviados.",
    tag = "Aulas",
    params(
        ("aula_id" = i32, Path, description = "ID del aula")
    ),
    request_body = AulaUpdate,
    responses(
        (status = 200, body = Aula),
        (status = 404, description = "Aula no encontrada"),
        (status = 409, description = "Código de aula duplicado"),
    ),
)]
#[put("/{aula_id}")]
async fn update(
    service: web::Data<AulaService>,
    aula_id: web::Path<i32>,
    aula: web::Json<AulaUpdate>,
) -> Result<HttpResponse, ApiError> {
    let aula_id = validate_aula_id(aula_id.into_inner())?;
    let aula = aula.into_inner();
    aula.validate()?;
    let updated = web::block(move || service.update_aula(aula_id, aula)).await??;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    summary = "Eliminar aula",
    tag = "Aulas",
    params(
        ("aula_id" = i32, Path, description = "ID del aula")
    ),
    responses(
        (status = 204),
        (status = 404, description = "Aula no encontrada"),
    ),
)]
#[delete("/{aula_id}")]
async fn delete(
    service: web::Data<AulaService>,
    aula_id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let aula_id = validate_aula_id(aula_id.into_inner())?;
    web::block(move || service.delete_aula(aula_id)).await??;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    summary = "Buscar aulas con filtros",
    description = "Búsqueda avanzada de aulas. Todos los filtros son opcionales y se combinan con lógica AND; los filtros de texto son coincidencias parciales sin distinguir mayúsculas.",
    tag = "Aulas",
    request_body = AulaSearch,
    responses(
        (status = 200, body = [Aula])
    ),
)]
#[post("/search")]
async fn search(
    service: web::Data<AulaService>,
    filters: web::Json<AulaSearch>,
) -> Result<HttpResponse, ApiError> {
    let aulas = web::block(move || service.search_aulas(&filters)).await??;
    Ok(HttpResponse::Ok().json(aulas))
}

#[utoipa::path(
    get,
    summary = "Obtener aulas por tipo",
    description = "Retorna todas las aulas de un tipo específico",
    tag = "Aulas",
    params(
        ("tipo" = TipoAula, Path, description = "Tipo de aula")
    ),
    responses(
        (status = 200, body = [Aula])
    ),
)]
#[get("/tipo/{tipo}")]
async fn find_by_tipo(
    service: web::Data<AulaService>,
    tipo: web::Path<TipoAula>,
) -> Result<HttpResponse, ApiError> {
    let tipo = tipo.into_inner();
    let aulas = web::block(move || service.get_aulas_by_tipo(tipo)).await??;
    Ok(HttpResponse::Ok().json(aulas))
}

#[utoipa::path(
    get,
    summary = "Obtener aulas disponibles para capacidad",
    description = "Encuentra aulas que pueden acomodar la capacidad requerida más un 10% de margen. Los resultados se ordenan por capacidad ascendente.",
    tag = "Aulas",
    params(
        ("capacidad" = i32, Query, description = "Capacidad requerida de estudiantes"),
        ("tipo" = Option<TipoAula>, Query, description = "Tipo de aula (opcional)"),
    ),
    responses(
        (status = 200, body = [Aula])
    ),
)]
#[get("/capacity/available")]
async fn available_for_capacity(
    service: web::Data<AulaService>,
    query: web::Query<CapacityQuery>,
) -> Result<HttpResponse, ApiError> {
    let CapacityQuery { capacidad, tipo } = query.into_inner();
    if capacidad <= 0 {
        return Err(ApiError::request_validation("capacidad debe ser mayor a 0"));
    }
    let aulas = web::block(move || service.get_available_for_capacity(capacidad, tipo)).await??;
    Ok(HttpResponse::Ok().json(aulas))
}

#[utoipa::path(
    get,
    summary = "Obtener estadísticas de aulas",
    description = "Total de aulas, capacidad promedio, mínima y máxima, y distribución por tipo",
    tag = "Aulas",
    responses(
        (status = 200, body = AulaStatistics)
    ),
)]
#[get("/statistics/summary")]
async fn statistics(service: web::Data<AulaService>) -> Result<HttpResponse, ApiError> {
    let summary = web::block(move || service.get_statistics()).await??;
    Ok(HttpResponse::Ok().json(summary))
}

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Aulas", description = "Registro y consulta de aulas")
    ),
    components(
        schemas(
            Aula,
            AulaCreate,
            AulaUpdate,
            AulaSearch,
            AulaStatistics,
            AulasPorTipo,
            TipoAula,
        )
    ),
    paths(
        find_all,
        find,
        create,
        update,
        delete,
        search,
        find_by_tipo,
        available_for_capacity,
        statistics,
    ),
)]
pub struct ApiDoc;

pub fn init_routes(config: &mut web::ServiceConfig) {
    config.service(
        web::scope("/aulas")
            .service(find_all)
            .service(create)
            .service(search)
            .service(find_by_tipo)
            .service(available_for_capacity)
            .service(statistics)
            .service(find)
            .service(update)
            .service(delete),
    );
}
