use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::aulas::{
    Aula, AulaCreate, AulaRepository, AulaSearch, AulaStatistics, AulaUpdate, TipoAula,
    MAX_CAPACIDAD,
};
use crate::error_handler::ApiError;

/// Page size used by listings that take no pagination parameters.
const DEFAULT_LIMIT: i64 = 100;

lazy_static! {
    static ref CODIGO_FORMAT: Regex = Regex::new(r"^[A-Z]-\d{1,3}$").unwrap();
}

/// Business rules for classrooms, on top of any [`AulaRepository`].
pub struct AulaService {
    repository: Arc<dyn AulaRepository>,
}

impl AulaService {
    pub fn new(repository: Arc<dyn AulaRepository>) -> Self {
        Self { repository }
    }

    pub fn get_aula(&self, aula_id: i32) -> Result<Aula, ApiError> {
        self.repository
            .get(aula_id)?
            .ok_or_else(|| ApiError::aula_not_found(aula_id))
    }

    pub fn get_all_aulas(&self, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError> {
        self.repository.get_all(skip, limit)
    }

    pub fn create_aula(&self, aula: AulaCreate) -> Result<Aula, ApiError> {
        if self.repository.get_by_codigo(&aula.codigo)?.is_some() {
            return Err(ApiError::aula_codigo_exists(&aula.codigo));
        }

        validate_capacidad(aula.capacidad)?;

        if !is_valid_codigo(&aula.codigo) {
            return Err(ApiError::validation(
                "El código del aula debe seguir el formato: [LETRA]-[NUMERO] (ej: A-101)",
            ));
        }

        let aula = self.repository.create(aula)?;
        tracing::info!("Created aula {} ({})", aula.id, aula.codigo);
        Ok(aula)
    }

    pub fn update_aula(&self, aula_id: i32, aula: AulaUpdate) -> Result<Aula, ApiError> {
        let existing = self.get_aula(aula_id)?;

        if let Some(codigo) = aula.codigo.as_deref().filter(|codigo| !codigo.is_empty()) {
            if codigo != existing.codigo && self.repository.get_by_codigo(codigo)?.is_some() {
                return Err(ApiError::aula_codigo_exists(codigo));
            }
        }

        if let Some(capacidad) = aula.capacidad {
            validate_capacidad(capacidad)?;
        }

        let aula = self
            .repository
            .update(aula_id, aula)?
            .ok_or_else(|| ApiError::aula_not_found(aula_id))?;
        tracing::info!("Updated aula {} ({})", aula.id, aula.codigo);
        Ok(aula)
    }

    pub fn delete_aula(&self, aula_id: i32) -> Result<(), ApiError> {
        self.get_aula(aula_id)?;

        // TODO: reject the deletion once classroom assignments exist and one is active.
        if !self.repository.delete(aula_id)? {
            return Err(ApiError::aula_not_found(aula_id));
        }
        tracing::info!("Deleted aula {}", aula_id);
        Ok(())
    }

    pub fn search_aulas(&self, search: &AulaSearch) -> Result<Vec<Aula>, ApiError> {
        self.repository.search(search)
    }

    pub fn get_aulas_by_tipo(&self, tipo: TipoAula) -> Result<Vec<Aula>, ApiError> {
        self.repository.get_by_tipo(tipo, 0, DEFAULT_LIMIT)
    }

    /// Classrooms that seat `capacidad` students plus a 10% comfort margin.
    pub fn get_available_for_capacity(
        &self,
        capacidad: i32,
        tipo: Option<TipoAula>,
    ) -> Result<Vec<Aula>, ApiError> {
        self.repository
            .get_available_for_capacity(capacidad_with_buffer(capacidad), tipo)
    }

    pub fn get_statistics(&self) -> Result<AulaStatistics, ApiError> {
        self.repository.statistics()
    }
}

/// `floor(capacidad * 1.1)`, saturating at `i32::MAX`.
pub fn capacidad_with_buffer(capacidad: i32) -> i32 {
    let buffered = capacidad as i64 * 11 / 10;
    buffered.min(i32::MAX as i64) as i32
}

pub fn is_valid_codigo(codigo: &str) -> bool {
    CODIGO_FORMAT.is_match(&codigo.to_uppercase())
}

fn validate_capacidad(capacidad: i32) -> Result<(), ApiError> {
    if capacidad <= 0 {
        return Err(ApiError::validation("La capacidad debe ser mayor a 0"));
    }
    if capacidad > MAX_CAPACIDAD {
        return Err(ApiError::validation(&format!(
            "La capacidad máxima permitida es {} estudiantes",
            MAX_CAPACIDAD
        )));
    }
    Ok(())
}
