use crate::error_handler::ApiError;
use diesel::r2d2::ConnectionManager;
use diesel::{r2d2, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;

#[cfg(test)]
use std::sync::Once;

type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub struct DbAppState {
    pub pool: Pool,
}

impl DbAppState {
    pub fn connection(&self) -> Result<DbConnection, ApiError> {
        Ok(self.pool.get()?)
    }

    pub fn run_pending_migrations(&self) -> Result<(), String> {
        let mut conn = self.connection().map_err(|e| e.to_string())?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| format!("Failed to run pending migrations: {}", e))?;
        for migration in applied {
            tracing::info!("Applied migration {}", migration);
        }
        Ok(())
    }
}

pub fn init_app_state(database_url: &str, max_size: u32) -> Result<Arc<DbAppState>, String> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .test_on_check_out(true)
        .max_size(max_size)
        .build(manager)
        .map_err(|e| format!("Failed to create db pool: {}", e))?;

    Ok(Arc::new(DbAppState { pool }))
}

#[cfg(test)]
static INIT_DB: Once = Once::new();

#[cfg(test)]
fn init_test_db_schema() {
    INIT_DB.call_once(|| {
        use diesel::Connection;

        let test_db_url =
            std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");

        let mut conn = PgConnection::establish(&test_db_url).expect("Failed to connect to test DB");

        conn.revert_all_migrations(MIGRATIONS)
            .expect("Failed to revert migrations");

        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
    });
}

#[cfg(test)]
pub fn init_test_db_state() -> Arc<DbAppState> {
    use diesel::r2d2::TestCustomizer;

    dotenv::dotenv().ok();

    init_test_db_schema();

    let test_db_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for running tests");

    let manager = ConnectionManager::<PgConnection>::new(test_db_url);
    let pool = r2d2::Pool::builder()
        .test_on_check_out(true)
        .max_size(1)
        .connection_customizer(Box::new(TestCustomizer))
        .build(manager)
        .expect("Failed to create test database pool");

    Arc::new(DbAppState { pool })
}

/// Pool pointing at a closed local port, so every checkout times out.
#[cfg(test)]
pub fn init_unreachable_db_state() -> Arc<DbAppState> {
    let manager = ConnectionManager::<PgConnection>::new("postgres://aulas@127.0.0.1:1/aulas");
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .min_idle(Some(0))
        .connection_timeout(std::time::Duration::from_millis(200))
        .build_unchecked(manager);

    Arc::new(DbAppState { pool })
}
