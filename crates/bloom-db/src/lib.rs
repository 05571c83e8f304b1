//! # bloom-db: Data Store for Bloom Shop
//!
//! This crate provides database access for the Bloom Shop storefront.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bloom Shop Data Flow                              │
//! │                                                                         │
//! │  UI action (add to cart, login, ...)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bloom-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  (user, cart, │    │  (embedded)  │   │   │
//! │  │   │               │    │  product,     │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│  favorite,    │    │ 001_init.sql │   │   │
//! │  │   │ initialize()  │    │  order)       │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (flowershop.db on device)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, `initialize()`, readiness guard
//! - [`migrations`] - Embedded database migrations
//! - [`seed`] - Idempotent catalog and default-admin seeding
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations per entity group
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bloom_db::{Database, DbConfig};
//!
//! // Open the store and run one-time setup (idempotent)
//! let db = Database::connect(DbConfig::new("flowershop.db")).await?;
//! db.initialize().await?;
//!
//! // Authenticate and shop
//! let (user, token) = db.users().login("a@x.com", "secret1").await?;
//! let roses = db.products().get_by_category("roses").await?;
//! db.cart().add(user.id, &roses[0]).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::favorite::FavoriteRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
