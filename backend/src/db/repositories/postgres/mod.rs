//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{info, warn};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, LocationRepository, PathRepository, RepositoryError, RepositoryResult,
    WallRepository,
};
use crate::models::{
    Location, LocationId, LocationUpdate, NewLocation, NewPath, NewWall, Path, PathId, PathUpdate,
    Wall, WallId,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed map repository.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_pool_size, config.min_pool_size
        );
        Ok(Self { pool, config })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times on retryable errors (connection
    /// errors, timeouts, serialization failures), doubling the delay each time.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            warn!("Postgres connection attempt {} failed: {}", attempt + 1, err);
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        warn!("Retrying Postgres operation after: {}", e);
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Map Diesel's bare `NotFound` onto an entity-specific error.
fn map_lookup_error(
    entity: &'static str,
    operation: &'static str,
    id: i64,
) -> impl FnOnce(diesel::result::Error) -> RepositoryError {
    move |err| match err {
        diesel::result::Error::NotFound => RepositoryError::not_found_with_context(
            format!("{} {} not found", entity, id),
            ErrorContext::new(operation)
                .with_entity(entity.to_lowercase())
                .with_entity_id(id),
        ),
        other => map_diesel_error(other).with_operation(operation),
    }
}

#[async_trait]
impl LocationRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        self.with_conn(|conn| {
            let rows = locations::table
                .select(LocationRow::as_select())
                .order(locations::id.asc())
                .load::<LocationRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Location::from).collect())
        })
        .await
    }

    async fn get_location(&self, id: LocationId) -> RepositoryResult<Location> {
        self.with_conn(move |conn| {
            locations::table
                .find(id.value())
                .select(LocationRow::as_select())
                .first::<LocationRow>(conn)
                .map(Location::from)
                .map_err(map_lookup_error("Location", "get_location", id.value()))
        })
        .await
    }

    async fn create_location(&self, location: NewLocation) -> RepositoryResult<Location> {
        let row = NewLocationRow::from(location);
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let explicit_id = row.id.is_some();
                let inserted: LocationRow = diesel::insert_into(locations::table)
                    .values(&row)
                    .returning(LocationRow::as_returning())
                    .get_result(tx)
                    .map_err(map_diesel_error)?;

                // Keep the sequence ahead of explicitly supplied ids.
                if explicit_id {
                    sql_query(
                        "SELECT setval(pg_get_serial_sequence('locations', 'id'), \
                         (SELECT MAX(id) FROM locations))",
                    )
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                }

                Ok(Location::from(inserted))
            })
        })
        .await
    }

    async fn update_location(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> RepositoryResult<Location> {
        let changeset = LocationChangeset::from(update);
        self.with_conn(move |conn| {
            let row = if changeset.is_empty() {
                locations::table
                    .find(id.value())
                    .select(LocationRow::as_select())
                    .first::<LocationRow>(conn)
            } else {
                diesel::update(locations::table.find(id.value()))
                    .set(&changeset)
                    .returning(LocationRow::as_returning())
                    .get_result::<LocationRow>(conn)
            };
            row.map(Location::from)
                .map_err(map_lookup_error("Location", "update_location", id.value()))
        })
        .await
    }

    async fn delete_location(&self, id: LocationId) -> RepositoryResult<Location> {
        self.with_conn(move |conn| {
            diesel::delete(locations::table.find(id.value()))
                .returning(LocationRow::as_returning())
                .get_result::<LocationRow>(conn)
                .map(Location::from)
                .map_err(map_lookup_error("Location", "delete_location", id.value()))
        })
        .await
    }
}

#[async_trait]
impl PathRepository for PostgresRepository {
    async fn list_paths(&self) -> RepositoryResult<Vec<Path>> {
        self.with_conn(|conn| {
            let rows = paths::table
                .select(PathRow::as_select())
                .order(paths::id.asc())
                .load::<PathRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Path::from).collect())
        })
        .await
    }

    async fn get_path(&self, id: PathId) -> RepositoryResult<Path> {
        self.with_conn(move |conn| {
            paths::table
                .find(id.value())
                .select(PathRow::as_select())
                .first::<PathRow>(conn)
                .map(Path::from)
                .map_err(map_lookup_error("Path", "get_path", id.value()))
        })
        .await
    }

    async fn create_path(&self, path: NewPath) -> RepositoryResult<Path> {
        let row = NewPathRow::from(path);
        self.with_conn(move |conn| {
            diesel::insert_into(paths::table)
                .values(&row)
                .returning(PathRow::as_returning())
                .get_result::<PathRow>(conn)
                .map(Path::from)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update_path(&self, id: PathId, update: PathUpdate) -> RepositoryResult<Path> {
        let changeset = PathChangeset::from(update);
        self.with_conn(move |conn| {
            let row = if changeset.is_empty() {
                paths::table
                    .find(id.value())
                    .select(PathRow::as_select())
                    .first::<PathRow>(conn)
            } else {
                diesel::update(paths::table.find(id.value()))
                    .set(&changeset)
                    .returning(PathRow::as_returning())
                    .get_result::<PathRow>(conn)
            };
            row.map(Path::from)
                .map_err(map_lookup_error("Path", "update_path", id.value()))
        })
        .await
    }

    async fn delete_path(&self, id: PathId) -> RepositoryResult<Path> {
        self.with_conn(move |conn| {
            diesel::delete(paths::table.find(id.value()))
                .returning(PathRow::as_returning())
                .get_result::<PathRow>(conn)
                .map(Path::from)
                .map_err(map_lookup_error("Path", "delete_path", id.value()))
        })
        .await
    }

    async fn update_path_congestion(
        &self,
        updates: &[(PathId, i32)],
    ) -> RepositoryResult<Vec<PathId>> {
        let updates = updates.to_vec();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                let mut written = Vec::with_capacity(updates.len());
                for (id, congestion) in &updates {
                    let affected = diesel::update(paths::table.find(id.value()))
                        .set(paths::congestion.eq(*congestion))
                        .execute(tx)
                        .map_err(map_diesel_error)?;
                    // Zero rows: deleted since the caller listed it.
                    if affected > 0 {
                        written.push(*id);
                    }
                }
                Ok(written)
            })
        })
        .await
    }
}

#[async_trait]
impl WallRepository for PostgresRepository {
    async fn list_walls(&self) -> RepositoryResult<Vec<Wall>> {
        self.with_conn(|conn| {
            let rows = walls::table
                .select(WallRow::as_select())
                .order(walls::id.asc())
                .load::<WallRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Wall::from).collect())
        })
        .await
    }

    async fn get_wall(&self, id: WallId) -> RepositoryResult<Wall> {
        self.with_conn(move |conn| {
            walls::table
                .find(id.value())
                .select(WallRow::as_select())
                .first::<WallRow>(conn)
                .map(Wall::from)
                .map_err(map_lookup_error("Wall", "get_wall", id.value()))
        })
        .await
    }

    async fn create_wall(&self, wall: NewWall) -> RepositoryResult<Wall> {
        let row = NewWallRow::from(wall);
        self.with_conn(move |conn| {
            diesel::insert_into(walls::table)
                .values(&row)
                .returning(WallRow::as_returning())
                .get_result::<WallRow>(conn)
                .map(Wall::from)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_wall(&self, id: WallId) -> RepositoryResult<Wall> {
        self.with_conn(move |conn| {
            diesel::delete(walls::table.find(id.value()))
                .returning(WallRow::as_returning())
                .get_result::<WallRow>(conn)
                .map(Wall::from)
                .map_err(map_lookup_error("Wall", "delete_wall", id.value()))
        })
        .await
    }
}
