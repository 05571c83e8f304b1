//! # Repository Module
//!
//! Database repository implementations for Bloom Shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  UI action                                                              │
//! │       │                                                                 │
//! │       │  db.cart().add(user_id, &product)                               │
//! │       ▼                                                                 │
//! │  CartRepository                                                         │
//! │  ├── add(&self, user_id, product)          (upsert)                     │
//! │  ├── update_quantity(&self, user, prod, n) (delete at n <= 0)           │
//! │  └── items(&self, user_id)                                              │
//! │       │                                                                 │
//! │       │  Parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  SQLite database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity group                        │
//! │  • The initialize() contract is enforced in exactly one helper          │
//! │  • Easy to exercise against an in-memory database in tests              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - auth (register/login/sessions), profile, admin ops
//! - [`product::ProductRepository`] - catalog CRUD and category listings
//! - [`cart::CartRepository`] - per-user cart lines with snapshot upserts
//! - [`favorite::FavoriteRepository`] - per-user favorites (toggle semantics)
//! - [`order::OrderRepository`] - checkout orders with frozen line items

pub mod cart;
pub mod favorite;
pub mod order;
pub mod product;
pub mod user;
