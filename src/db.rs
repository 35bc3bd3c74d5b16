use anyhow::{Context, Result, anyhow};
use diesel::{
    Connection, SqliteConnection,
    connection::SimpleConnection,
    r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::DatabaseConfig;

/// Migrations embedded into the binary so a fresh install needs no extra files.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite leaves foreign keys off unless asked, per connection.
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)
    }
}

/// Opens a single connection with the same pragmas the pool applies.
pub fn establish(url: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(url)
        .with_context(|| format!("Failed to open database at {url}"))?;
    conn.batch_execute(CONNECTION_PRAGMAS)
        .context("Failed to configure database connection")?;
    Ok(conn)
}

pub fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    Pool::builder()
        .max_size(config.pool_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(ConnectionManager::<SqliteConnection>::new(&config.url))
        .with_context(|| format!("Failed to build DB connection pool for {}", config.url))
}

/// Applies pending migrations and returns how many ran.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<usize> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {e}"))?;
    Ok(applied.len())
}
