//! # Database Pool Management
//!
//! Connection pool creation, one-time initialization, and the readiness
//! guard behind every repository operation.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Lifecycle                                    │
//! │                                                                         │
//! │  App startup                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::connect(config).await ← Create pool (store NOT usable yet)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.initialize().await ← Migrations + catalog seed + admin seed         │
//! │       │                  (idempotent; marks the store ready)            │
//! │       ▼                                                                 │
//! │  db.users() / db.cart() / ... ← Repository operations                   │
//! │                                                                         │
//! │  Any repository call before initialize() fails with                     │
//! │  StoreError::Uninitialized.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::favorite::FavoriteRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::user::UserRepository;
use crate::seed;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("flowershop.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (plenty for a single-device storefront)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::connect(DbConfig::in_memory()).await?;
    /// db.initialize().await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            // A second connection would see a second, empty database
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

// =============================================================================
// Store Handle
// =============================================================================

/// Shared state behind [`Database`] and every repository: the pool plus the
/// readiness flag set by [`Database::initialize`].
#[derive(Debug, Clone)]
pub(crate) struct StoreHandle {
    pool: SqlitePool,
    ready: Arc<AtomicBool>,
}

impl StoreHandle {
    /// Returns the pool if the store has been initialized.
    ///
    /// Every repository operation funnels through here, which is what makes
    /// "call initialize() first" an enforced contract instead of a comment.
    pub(crate) fn pool(&self) -> StoreResult<&SqlitePool> {
        if self.ready.load(Ordering::Acquire) {
            Ok(&self.pool)
        } else {
            Err(StoreError::Uninitialized)
        }
    }

    /// Pool access that bypasses the readiness check (initialization itself,
    /// health checks).
    pub(crate) fn raw_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap (pool + flag are shared); UI layers typically hold one
/// clone per screen context.
#[derive(Debug, Clone)]
pub struct Database {
    handle: StoreHandle,
}

impl Database {
    /// Creates the connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite for a local single-writer app:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled (cascading user deletes depend on this)
    /// 3. Creates the connection pool
    ///
    /// The store is **not** usable yet: call [`Database::initialize`] once
    /// before any repository operation.
    pub async fn connect(config: DbConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database connection"
        );

        let connect_options = if config.database_path == Path::new(":memory:") {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            // sqlite://path?mode=rwc creates the file if not exists
            let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
                .create_if_missing(true)
        };

        let connect_options = connect_options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off for backwards compatibility
            .foreign_keys(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        Ok(Database {
            handle: StoreHandle {
                pool,
                ready: Arc::new(AtomicBool::new(false)),
            },
        })
    }

    /// One-time store setup. Idempotent - safe to call on every app start.
    ///
    /// ## What This Does
    /// 1. Runs embedded migrations (creates the six tables if absent)
    /// 2. Seeds the sample flower catalog if the product table is empty
    /// 3. Seeds the default administrator account if no admin exists
    /// 4. Marks the store ready, unlocking repository operations
    ///
    /// A second call re-runs the (no-op) migrator and skips both seeds, so
    /// nothing is ever duplicated.
    pub async fn initialize(&self) -> StoreResult<()> {
        info!("Initializing store");

        migrations::run_migrations(self.handle.raw_pool()).await?;
        seed::seed_sample_products(self.handle.raw_pool()).await?;
        seed::seed_default_admin(self.handle.raw_pool()).await?;

        self.handle.ready.store(true, Ordering::Release);

        info!("Store initialized");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories. Prefer repository
    /// methods when available.
    pub fn pool(&self) -> &SqlitePool {
        self.handle.raw_pool()
    }

    /// Returns the user repository (auth, profile, admin user management).
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.handle.clone())
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.handle.clone())
    }

    /// Returns the cart repository.
    pub fn cart(&self) -> CartRepository {
        CartRepository::new(self.handle.clone())
    }

    /// Returns the favorites repository.
    pub fn favorites(&self) -> FavoriteRepository {
        FavoriteRepository::new(self.handle.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.handle.clone())
    }

    /// Wipes all shopping data and non-admin accounts, then reseeds the
    /// sample catalog. Debug/maintenance affordance for the admin screen.
    pub async fn clear_all_data(&self) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        info!("Clearing all store data");

        sqlx::query("DELETE FROM cart_items").execute(pool).await?;
        sqlx::query("DELETE FROM favorites").execute(pool).await?;
        sqlx::query("DELETE FROM sessions").execute(pool).await?;
        sqlx::query("DELETE FROM orders").execute(pool).await?;
        sqlx::query("DELETE FROM products").execute(pool).await?;
        sqlx::query("DELETE FROM users WHERE role != 'admin'")
            .execute(pool)
            .await?;

        seed::seed_sample_products(pool).await?;

        Ok(())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.handle.raw_pool().close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.handle.raw_pool())
            .await
            .is_ok()
    }
}

// =============================================================================
// Test Support
// =============================================================================

/// Opens and initializes a fresh in-memory store. Shared by the repository
/// test modules.
#[cfg(test)]
pub(crate) async fn test_store() -> Database {
    let db = Database::connect(DbConfig::in_memory())
        .await
        .expect("in-memory connect");
    db.initialize().await.expect("initialize");
    db
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_core::{Role, DEFAULT_ADMIN_EMAIL};

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = test_store().await;
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_operations_fail_before_initialize() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();

        // No initialize() call yet
        let err = db.products().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Uninitialized));

        let err = db.users().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Uninitialized));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        db.initialize().await.unwrap();
        db.initialize().await.unwrap();

        // Catalog seeded exactly once
        let count = db.products().count().await.unwrap();
        assert_eq!(count, 6);

        // Exactly one seeded admin
        let admins: Vec<_> = db
            .users()
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|u| u.role == Role::Admin)
            .collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, DEFAULT_ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn test_clear_all_data_keeps_admin_and_reseeds() {
        let db = test_store().await;

        let user = db
            .users()
            .register(bloom_core::NewUser {
                email: "shopper@x.com".to_string(),
                password: "secret1".to_string(),
                full_name: "Shopper".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let products = db.products().get_all().await.unwrap();
        db.cart().add(user.id, &products[0]).await.unwrap();

        db.clear_all_data().await.unwrap();

        let users = db.users().get_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);

        // Catalog reseeded
        assert_eq!(db.products().count().await.unwrap(), 6);
    }
}
