mod memory;
mod model;
mod repository;
mod routes;
mod service;
#[cfg(test)]
pub mod test_utils;

pub use memory::InMemoryAulaRepository;
pub use model::*;
pub use repository::{AulaRepository, PgAulaRepository};
pub use routes::{init_routes, ApiDoc};
pub use service::AulaService;
