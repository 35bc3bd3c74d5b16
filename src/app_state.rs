use anyhow::{Context, Result};

use crate::{
    config::Config,
    db::{self, DbConnection, DbPool},
};

/// Everything a command needs: the connection pool and the loaded config.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let db_pool = db::create_pool(&config.database)?;
        Ok(Self { db_pool, config })
    }

    pub fn connection(&self) -> Result<DbConnection> {
        self.db_pool
            .get()
            .context("Failed to obtain a DB connection pool")
    }
}
