use crate::schema::aulas;
use diesel::pg::Pg;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const MAX_CAPACIDAD: i32 = 500;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, DbEnum,
)]
#[ExistingTypePath = "crate::schema::sql_types::TipoAula"]
#[DbValueStyle = "SCREAMING_SNAKE_CASE"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoAula {
    Teoria,
    Laboratorio,
    Seminario,
}

#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, ToSchema,
)]
#[diesel(table_name = aulas, check_for_backend(Pg))]
pub struct Aula {
    /// Internal ID of the classroom.
    pub id: i32,
    /// Unique code of the classroom, e.g. `A-101`.
    #[schema(example = "A-101")]
    pub codigo: String,
    /// Maximum number of students.
    #[schema(example = 40)]
    pub capacidad: i32,
    pub tipo: TipoAula,
    /// Physical location of the classroom.
    #[schema(example = "Edificio A, Piso 1")]
    pub ubicacion: String,
    /// Available equipment, free text.
    #[schema(example = "Proyector, Pizarra")]
    pub equipamiento: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable, Validate, ToSchema)]
#[diesel(table_name = aulas, check_for_backend(Pg))]
pub struct AulaCreate {
    /// Unique code of the classroom. Format: `[LETRA]-[NUMERO]`.
    #[schema(example = "A-101")]
    pub codigo: String,
    /// Maximum number of students (1-500).
    #[validate(range(min = 1, message = "La capacidad debe ser mayor a 0"))]
    #[schema(example = 40)]
    pub capacidad: i32,
    pub tipo: TipoAula,
    #[schema(example = "Edificio A, Piso 1")]
    pub ubicacion: String,
    #[schema(example = "Proyector, Pizarra")]
    pub equipamiento: Option<String>,
}

/// Partial update. Absent fields are left untouched; `equipamiento: null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset, Validate, ToSchema)]
#[diesel(table_name = aulas, check_for_backend(Pg))]
pub struct AulaUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "La capacidad debe ser mayor a 0"))]
    pub capacidad: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoAula>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub equipamiento: Option<Option<String>>,
}

impl AulaUpdate {
    pub fn is_empty(&self) -> bool {
        self.codigo.is_none()
            && self.capacidad.is_none()
            && self.tipo.is_none()
            && self.ubicacion.is_none()
            && self.equipamiento.is_none()
    }

    pub fn apply_to(self, aula: &mut Aula) {
        if let Some(codigo) = self.codigo {
            aula.codigo = codigo;
        }
        if let Some(capacidad) = self.capacidad {
            aula.capacidad = capacidad;
        }
        if let Some(tipo) = self.tipo {
            aula.tipo = tipo;
        }
        if let Some(ubicacion) = self.ubicacion {
            aula.ubicacion = ubicacion;
        }
        if let Some(equipamiento) = self.equipamiento {
            aula.equipamiento = equipamiento;
        }
    }
}

/// Search filters, combined with AND. Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AulaSearch {
    pub codigo: Option<String>,
    pub tipo: Option<TipoAula>,
    pub capacidad_min: Option<i32>,
    pub capacidad_max: Option<i32>,
    pub ubicacion: Option<String>,
    pub equipamiento: Option<String>,
}

impl AulaSearch {
    pub fn codigo_filter(&self) -> Option<&str> {
        non_empty(&self.codigo)
    }

    pub fn ubicacion_filter(&self) -> Option<&str> {
        non_empty(&self.ubicacion)
    }

    pub fn equipamiento_filter(&self) -> Option<&str> {
        non_empty(&self.equipamiento)
    }

    pub fn matches(&self, aula: &Aula) -> bool {
        self.codigo_filter()
            .map_or(true, |codigo| contains_ignore_case(&aula.codigo, codigo))
            && self.tipo.map_or(true, |tipo| aula.tipo == tipo)
            && self.capacidad_min.map_or(true, |min| aula.capacidad >= min)
            && self.capacidad_max.map_or(true, |max| aula.capacidad <= max)
            && self
                .ubicacion_filter()
                .map_or(true, |ubicacion| contains_ignore_case(&aula.ubicacion, ubicacion))
            && self.equipamiento_filter().map_or(true, |equipamiento| {
                aula.equipamiento
                    .as_deref()
                    .is_some_and(|value| contains_ignore_case(value, equipamiento))
            })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AulasPorTipo {
    pub teoria: i64,
    pub laboratorio: i64,
    pub seminario: i64,
}

impl AulasPorTipo {
    pub fn add(&mut self, tipo: TipoAula, count: i64) {
        match tipo {
            TipoAula::Teoria => self.teoria += count,
            TipoAula::Laboratorio => self.laboratorio += count,
            TipoAula::Seminario => self.seminario += count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AulaStatistics {
    pub total_aulas: i64,
    pub capacidad_promedio: f64,
    pub capacidad_maxima: i32,
    pub capacidad_minima: i32,
    pub por_tipo: AulasPorTipo,
}

impl AulaStatistics {
    pub fn from_aggregates(
        total_aulas: i64,
        capacidad_total: Option<i64>,
        capacidad_maxima: Option<i32>,
        capacidad_minima: Option<i32>,
        por_tipo: AulasPorTipo,
    ) -> Self {
        let capacidad_promedio = match (total_aulas, capacidad_total) {
            (total, Some(sum)) if total > 0 => sum as f64 / total as f64,
            _ => 0.0,
        };
        AulaStatistics {
            total_aulas,
            capacidad_promedio,
            capacidad_maxima: capacidad_maxima.unwrap_or(0),
            capacidad_minima: capacidad_minima.unwrap_or(0),
            por_tipo,
        }
    }

    pub fn from_aulas<'a>(aulas: impl IntoIterator<Item = &'a Aula>) -> Self {
        let mut total = 0;
        let mut sum = None;
        let mut max = None;
        let mut min = None;
        let mut por_tipo = AulasPorTipo::default();
        for aula in aulas {
            total += 1;
            sum = Some(sum.unwrap_or(0) + aula.capacidad as i64);
            max = Some(max.map_or(aula.capacidad, |max: i32| max.max(aula.capacidad)));
            min = Some(min.map_or(aula.capacidad, |min: i32| min.min(aula.capacidad)));
            por_tipo.add(aula.tipo, 1);
        }
        Self::from_aggregates(total, sum, max, min, por_tipo)
    }
}
