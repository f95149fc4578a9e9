use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::aulas::{Aula, AulaCreate, AulaRepository, AulaSearch, AulaStatistics, AulaUpdate, TipoAula};
use crate::error_handler::ApiError;

#[derive(Default)]
struct MemoryState {
    last_id: i32,
    aulas: BTreeMap<i32, Aula>,
}

impl MemoryState {
    fn codigo_taken(&self, codigo: &str, except: Option<i32>) -> bool {
        self.aulas
            .values()
            .any(|aula| aula.codigo == codigo && Some(aula.id) != except)
    }
}

/// Process-local storage, used with `STORAGE_BACKEND=memory` and in tests.
#[derive(Default)]
pub struct InMemoryAulaRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryAulaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|_| ApiError::new(500, "In-memory aula store is poisoned"))
    }
}

fn page<'a>(aulas: impl Iterator<Item = &'a Aula>, skip: i64, limit: i64) -> Vec<Aula> {
    aulas
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

impl AulaRepository for InMemoryAulaRepository {
    fn get(&self, id: i32) -> Result<Option<Aula>, ApiError> {
        Ok(self.state()?.aulas.get(&id).cloned())
    }

    fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError> {
        Ok(page(self.state()?.aulas.values(), skip, limit))
    }

    fn get_by_codigo(&self, codigo: &str) -> Result<Option<Aula>, ApiError> {
        let state = self.state()?;
        Ok(state.aulas.values().find(|aula| aula.codigo == codigo).cloned())
    }

    fn get_by_tipo(&self, tipo: TipoAula, skip: i64, limit: i64) -> Result<Vec<Aula>, ApiError> {
        let state = self.state()?;
        Ok(page(
            state.aulas.values().filter(|aula| aula.tipo == tipo),
            skip,
            limit,
        ))
    }

    fn search(&self, search: &AulaSearch) -> Result<Vec<Aula>, ApiError> {
        let state = self.state()?;
        let mut aulas: Vec<Aula> = state
            .aulas
            .values()
            .filter(|aula| search.matches(aula))
            .cloned()
            .collect();
        aulas.sort_by(|a, b| a.codigo.cmp(&b.codigo).then(a.id.cmp(&b.id)));
        Ok(aulas)
    }

    fn get_available_for_capacity(
        &self,
        capacidad: i32,
        tipo: Option<TipoAula>,
    ) -> Result<Vec<Aula>, ApiError> {
        let state = self.state()?;
        let mut aulas: Vec<Aula> = state
            .aulas
            .values()
            .filter(|aula| aula.capacidad >= capacidad)
            .filter(|aula| tipo.map_or(true, |tipo| aula.tipo == tipo))
            .cloned()
            .collect();
        aulas.sort_by(|a, b| a.capacidad.cmp(&b.capacidad).then(a.id.cmp(&b.id)));
        Ok(aulas)
    }

    fn statistics(&self) -> Result<AulaStatistics, ApiError> {
        Ok(AulaStatistics::from_aulas(self.state()?.aulas.values()))
    }

    fn create(&self, aula: AulaCreate) -> Result<Aula, ApiError> {
        let mut state = self.state()?;
        if state.codigo_taken(&aula.codigo, None) {
            return Err(ApiError::aula_codigo_exists(&aula.codigo));
        }

        state.last_id += 1;
        let aula = Aula {
            id: state.last_id,
            codigo: aula.codigo,
            capacidad: aula.capacidad,
            tipo: aula.tipo,
            ubicacion: aula.ubicacion,
            equipamiento: aula.equipamiento,
        };
        state.aulas.insert(aula.id, aula.clone());
        Ok(aula)
    }

    fn update(&self, id: i32, aula: AulaUpdate) -> Result<Option<Aula>, ApiError> {
        let mut state = self.state()?;
        if let Some(codigo) = &aula.codigo {
            if state.codigo_taken(codigo, Some(id)) {
                return Err(ApiError::aula_codigo_exists(codigo));
            }
        }

        Ok(state.aulas.get_mut(&id).map(|existing| {
            aula.apply_to(existing);
            existing.clone()
        }))
    }

    fn delete(&self, id: i32) -> Result<bool, ApiError> {
        Ok(self.state()?.aulas.remove(&id).is_some())
    }

    fn ping(&self) -> Result<(), ApiError> {
        self.state().map(|_| ())
    }
}
