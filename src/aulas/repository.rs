use std::sync::Arc;

use diesel::dsl::{count, max, min, sum};
use diesel::{
    ExpressionMethods, OptionalExtension, PgTextExpressionMethods, QueryDsl, RunQueryDsl,
    SelectableHelper,
};

use crate::app_data::db::DbAppState;
use crate::aulas::{Aula, AulaCreate, AulaSearch, AulaStatistics, AulaUpdate, AulasPorTipo, TipoAula};
use crate::error_handler::ApiError;
use crate::schema::aulas;

/// Storage for classrooms. Calls block, so handlers run them through `web::block`.
pub trait AulaRepository: Send + Sync {
    fn get(&self, id: i32) -> Result<Option<Aula>, ApiError>;

    /// Ordered by id.
    fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError>;

    fn get_by_codigo(&self, codigo: &str) -> Result<Option<Aula>, ApiError>;

    /// Ordered by id.
    fn get_by_tipo(&self, tipo: TipoAula, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError>;

    /// Ordered by codigo.
    fn search(&self, search: &AulaSearch) -> Result<Vec<Aula>, ApiError>;

    /// Classrooms with at least `capacidad` seats, smallest first.
    fn get_available_for_capacity(
        &self,
        capacidad: i32,
        tipo: Option<TipoAula>,
    ) -> Result<Vec<Aula>, ApiError>;

    fn statistics(&self) -> Result<AulaStatistics, ApiError>;

    fn create(&self, aula: AulaCreate) -> Result<Aula, ApiError>;

    fn update(&self, id: i32, aula: AulaUpdate) -> Result<Option<Aula>, ApiError>;

    fn delete(&self, id: i32) -> Result<bool, ApiError>;

    fn ping(&self) -> Result<(), ApiError>;
}

pub struct PgAulaRepository {
    db: Arc<DbAppState>,
}

impl PgAulaRepository {
    pub fn new(db: Arc<DbAppState>) -> Self {
        Self { db }
    }
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl AulaRepository for PgAulaRepository {
    fn get(&self, id: i32) -> Result<Option<Aula>, ApiError> {
        let aula = aulas::table
            .find(id)
            .select(Aula::as_select())
            .first::<Aula>(&mut self.db.connection()?)
            .optional()?;
        Ok(aula)
    }

    fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError> {
        let aulas = aulas::table
            .order(aulas::id)
            .offset(skip)
            .limit(limit)
            .select(Aula::as_select())
            .load::<Aula>(&mut self.db.connection()?)?;
        Ok(aulas)
    }

    fn get_by_codigo(&self, codigo: &str) -> Result<Option<Aula>, ApiError> {
        let aula = aulas::table
            .filter(aulas::codigo.eq(codigo))
            .select(Aula::as_select())
            .first::<Aula>(&mut self.db.connection()?)
            .optional()?;
        Ok(aula)
    }

    fn get_by_tipo(&self, tipo: TipoAula, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError> {
        let aulas = aulas::table
            .filter(aulas::tipo.eq(tipo))
            .order(aulas::id)
            .offset(skip)
            .limit(limit)
            .select(Aula::as_select())
            .load::<Aula>(&mut self.db.connection()?)?;
        Ok(aulas)
    }

    fn search(&self, search: &AulaSearch) -> Result<Vec<Aula>, ApiError> {
        let mut query = aulas::table.into_boxed();

        if let Some(codigo) = search.codigo_filter() {
            query = query.filter(aulas::codigo.ilike(like_pattern(codigo)));
        }
        if let Some(tipo) = search.tipo {
            query = query.filter(aulas::tipo.eq(tipo));
        }
        if let Some(capacidad_min) = search.capacidad_min {
            query = query.filter(aulas::capacidad.ge(capacidad_min));
        }
        if let Some(capacidad_max) = search.capacidad_max {
            query = query.filter(aulas::capacidad.le(capacidad_max));
        }
        if let Some(ubicacion) = search.ubicacion_filter() {
            query = query.filter(aulas::ubicacion.ilike(like_pattern(ubicacion)));
        }
        if let Some(equipamiento) = search.equipamiento_filter() {
            query = query.filter(aulas::equipamiento.ilike(like_pattern(equipamiento)));
        }

        let aulas = query
            .order((aulas::codigo, aulas::id))
            .select(Aula::as_select())
            .load::<Aula>(&mut self.db.connection()?)?;
        Ok(aulas)
    }

    fn get_available_for_capacity(
        &self,
        capacidad: i32,
        tipo: Option<TipoAula>,
    ) -> Result<Vec<Aula>, ApiError> {
        let mut query = aulas::table
            .filter(aulas::capacidad.ge(capacidad))
            .into_boxed();

        if let Some(tipo) = tipo {
            query = query.filter(aulas::tipo.eq(tipo));
        }

        let aulas = query
            .order((aulas::capacidad.asc(), aulas::id.asc()))
            .select(Aula::as_select())
            .load::<Aula>(&mut self.db.connection()?)?;
        Ok(aulas)
    }

    fn statistics(&self) -> Result<AulaStatistics, ApiError> {
        let conn = &mut self.db.connection()?;

        let (total, capacidad_total, capacidad_maxima, capacidad_minima) = aulas::table
            .select((
                count(aulas::id),
                sum(aulas::capacidad),
                max(aulas::capacidad),
                min(aulas::capacidad),
            ))
            .get_result::<(i64, Option<i64>, Option<i32>, Option<i32>)>(conn)?;

        let por_tipo_counts = aulas::table
            .group_by(aulas::tipo)
            .select((aulas::tipo, count(aulas::id)))
            .load::<(TipoAula, i64)>(conn)?;

        let mut por_tipo = AulasPorTipo::default();
        for (tipo, count) in por_tipo_counts {
            por_tipo.add(tipo, count);
        }

        Ok(AulaStatistics::from_aggregates(
            total,
            capacidad_total,
            capacidad_maxima,
            capacidad_minima,
            por_tipo,
        ))
    }

    fn create(&self, aula: AulaCreate) -> Result<Aula, ApiError> {
        let codigo = aula.codigo.clone();
        let aula = diesel::insert_into(aulas::table)
            .values(aula)
            .returning(Aula::as_returning())
            .get_result(&mut self.db.connection()?)
            .map_err(|e| match ApiError::from(e) {
                err if err.error_status_code == 409 => ApiError::aula_codigo_exists(&codigo),
                err => err,
            })?;
        Ok(aula)
    }

    fn update(&self, id: i32, aula: AulaUpdate) -> Result<Option<Aula>, ApiError> {
        if aula.is_empty() {
            return self.get(id);
        }

        let codigo = aula.codigo.clone();
        let aula = diesel::update(aulas::table.find(id))
            .set(aula)
            .returning(Aula::as_returning())
            .get_result(&mut self.db.connection()?)
            .optional()
            .map_err(|e| match (ApiError::from(e), codigo) {
                (err, Some(codigo)) if err.error_status_code == 409 => {
                    ApiError::aula_codigo_exists(&codigo)
                }
                (err, _) => err,
            })?;
        Ok(aula)
    }

    fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let deleted = diesel::delete(aulas::table.find(id)).execute(&mut self.db.connection()?)?;
        Ok(deleted > 0)
    }

    fn ping(&self) -> Result<(), ApiError> {
        diesel::sql_query("SELECT 1")
            .execute(&mut self.db.connection()?)
            .map_err(|error| ApiError::new(503, &format!("DB healthcheck failed: {}", error)))?;
        Ok(())
    }
}
