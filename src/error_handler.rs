use actix_web::error::{BlockingError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fmt::Formatter;
use validator::ValidationErrors;

pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error_status_code: u16,
    pub error_message: String,
    pub error_code: String,
}

impl ApiError {
    pub fn new(error_status_code: u16, error_message: &str) -> ApiError {
        ApiError {
            error_status_code,
            error_message: error_message.to_string(),
            error_code: default_error_code(error_status_code).to_string(),
        }
    }

    pub fn with_code(mut self, error_code: &str) -> ApiError {
        self.error_code = error_code.to_string();
        self
    }

    pub fn validation(error_message: &str) -> ApiError {
        ApiError::new(400, error_message)
    }

    pub fn request_validation(error_message: &str) -> ApiError {
        ApiError::new(422, error_message)
    }

    pub fn aula_not_found(aula_id: i32) -> ApiError {
        ApiError::new(404, &format!("Aula con ID {} no encontrada", aula_id))
            .with_code("AULA_NOT_FOUND")
    }

    pub fn aula_codigo_exists(codigo: &str) -> ApiError {
        ApiError::new(409, &format!("Ya existe un aula con el código '{}'", codigo))
            .with_code("AULA_CODIGO_EXISTS")
    }
}

fn default_error_code(status: u16) -> &'static str {
    match status {
        400 => "VALIDATION_ERROR",
        401 => "UNAUTHORIZED",
        403 => "FORBIDDEN",
        404 => "NOT_FOUND",
        409 => "CONFLICT",
        422 => "REQUEST_VALIDATION_ERROR",
        503 => "SERVICE_UNAVAILABLE",
        _ => "INTERNAL_ERROR",
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_message.as_str())
    }
}

impl From<DieselError> for ApiError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, err) => {
                ApiError::new(409, err.message())
            }
            DieselError::DatabaseError(_, err) => {
                tracing::error!("Database error: {}", err.message());
                ApiError::new(500, err.message()).with_code("DATABASE_ERROR")
            }
            DieselError::NotFound => ApiError::new(404, "Record not found"),
            err => ApiError::new(500, &format!("Unknown Diesel error: {}", err)),
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(error: PoolError) -> Self {
        tracing::error!("Failed to get db connection: {}", error);
        ApiError::new(503, "No se pudo conectar a la base de datos")
            .with_code("DATABASE_CONNECTION_ERROR")
    }
}

impl From<BlockingError> for ApiError {
    fn from(_error: BlockingError) -> Self {
        ApiError::new(500, "Internal server error")
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::request_validation(&errors.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.error_status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let error_message = match status_code.as_u16() < 500 {
            true => self.error_message.clone(),
            false => "Internal server error".to_string(),
        };

        HttpResponse::build(status_code)
            .insert_header((ERROR_CODE_HEADER, self.error_code.as_str()))
            .json(json!({"message": error_message, "error_code": self.error_code}))
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::request_validation(&err.to_string()).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::request_validation(&err.to_string()).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::request_validation(&err.to_string()).into()
}

/// Turns extractor failures into the same JSON error body as handler errors.
pub fn init_extractors(config: &mut web::ServiceConfig) {
    config
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
