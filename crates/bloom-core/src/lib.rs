//! # bloom-core: Pure Domain Logic for Bloom Shop
//!
//! This crate is the **heart** of the Bloom Shop storefront. It contains the
//! domain types and pure helpers shared by every other layer, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bloom Shop Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Mobile Frontend (React Native)                  │   │
//! │  │    Browse ──► Cart ──► Checkout ──► Profile ──► Admin          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ generated TS bindings                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bloom-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │ validation│  │ password  │                  │   │
//! │  │   │ User/Cart │  │   rules   │  │  Argon2id │                  │   │
//! │  │   │ Order/... │  │  checks   │  │ hash/verify│                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bloom-db (Data Store)                        │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, CartLine, Order, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Caller-side input validation rules
//! - [`password`] - Credential hashing and verification
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic or draws only on
//!    the OS RNG (password salts) - no hidden state
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod password;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bloom_core::User` instead of
// `use bloom_core::types::User`

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How long a login session stays valid, in days.
///
/// Sessions are minted at login with a fixed expiry this far in the future.
/// Expiry is only ever checked lazily when a token is validated.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Minimum accepted password length.
///
/// Enforced by [`validation::validate_password`] at the UI boundary; the
/// store itself never sees raw passwords shorter than this in practice.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Email of the administrator account seeded on first initialization.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@flowershop.com";

/// Initial password of the seeded administrator account.
///
/// Stored hashed, like every other credential. Meant to be changed on first
/// login of a real deployment.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Display name of the seeded administrator account.
pub const DEFAULT_ADMIN_NAME: &str = "System Administrator";
