mod routes;
#[cfg(test)]
mod tests;

pub use routes::{init_routes, ApiDoc};
