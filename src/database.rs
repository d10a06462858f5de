//! PostgreSQL pool bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config;

pub const DEFAULT_CREDENTIALS: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "cohort";
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Open connection pool, handed to the repositories on startup.
#[derive(Clone)]
pub struct Database {
    pub postgres: PgPool,
}

impl Database {
    /// Open a PostgreSQL pool from the configuration section, filling in
    /// default credentials where the file leaves them out.
    pub async fn connect(config: &config::Postgres) -> Result<Self, sqlx::Error> {
        let username = config.username.as_deref().unwrap_or(DEFAULT_CREDENTIALS);
        let password = config.password.as_deref().unwrap_or(DEFAULT_CREDENTIALS);
        let database = config.database.as_deref().unwrap_or(DEFAULT_DATABASE_NAME);
        let addr = format!(
            "postgres://{username}:{password}@{}/{database}",
            config.address
        );

        let postgres = PgPoolOptions::new()
            .max_connections(config.pool_size.unwrap_or(DEFAULT_POOL_SIZE))
            .connect(&addr)
            .await?;

        tracing::info!(hostname = %config.address, %database, "postgres connected");

        Ok(Self { postgres })
    }
}
