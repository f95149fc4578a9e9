#[cfg(test)]
use crate::aulas::{Aula, AulaCreate, AulaRepository, TipoAula};

#[cfg(test)]
pub fn aula_create(codigo: &str, capacidad: i32, tipo: TipoAula, ubicacion: &str) -> AulaCreate {
    AulaCreate {
        codigo: codigo.to_string(),
        capacidad,
        tipo,
        ubicacion: ubicacion.to_string(),
        equipamiento: None,
    }
}

#[cfg(test)]
pub fn create_test_aula(
    repository: &dyn AulaRepository,
    codigo: &str,
    capacidad: i32,
    tipo: TipoAula,
) -> Aula {
    repository
        .create(aula_create(codigo, capacidad, tipo, "Edificio A, Piso 1"))
        .expect("Failed to create test aula!")
}

/// Six classrooms spread over the three types, used by the listing and search tests.
#[cfg(test)]
pub fn seed_test_aulas(repository: &dyn AulaRepository) -> Vec<Aula> {
    let seeds = [
        ("A-101", 40, TipoAula::Teoria, "Edificio A, Piso 1", Some("Proyector, Pizarra")),
        ("A-102", 60, TipoAula::Teoria, "Edificio A, Piso 1", Some("Pizarra")),
        ("B-201", 25, TipoAula::Laboratorio, "Edificio B, Piso 2", Some("Computadoras, Proyector")),
        ("B-202", 30, TipoAula::Laboratorio, "Edificio B, Piso 2", None),
        ("C-301", 15, TipoAula::Seminario, "Pabellón C", Some("Mesa redonda")),
        ("C-302", 120, TipoAula::Teoria, "Pabellón C", Some("Proyector, Sonido")),
    ];

    seeds
        .into_iter()
        .map(|(codigo, capacidad, tipo, ubicacion, equipamiento)| {
            let mut aula = aula_create(codigo, capacidad, tipo, ubicacion);
            aula.equipamiento = equipamiento.map(str::to_string);
            repository.create(aula).expect("Failed to seed test aula!")
        })
        .collect()
}
