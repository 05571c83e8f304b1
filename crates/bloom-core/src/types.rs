//! # Domain Types
//!
//! Core domain types used throughout Bloom Shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  email (unique) │   │  name           │   │  user_id (FK)   │       │
//! │  │  role           │   │  price          │   │  items (JSON)   │       │
//! │  │  is_active      │   │  category       │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartLine     │   │  FavoriteEntry  │   │    Session      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  (user,product) │   │  (user,product) │   │  token (unique) │       │
//! │  │  snapshot + qty │   │  snapshot       │   │  expires_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `CartLine`, `FavoriteEntry`, and `Order` lines copy product fields at write
//! time. Later catalog edits never retroactively change what a customer saw,
//! added, or bought.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Enums
// =============================================================================

/// Account role. Admins own catalog CRUD, order status, and user management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    User,
    Admin,
}

/// Order lifecycle status.
///
/// Transitions are deliberately unrestricted: `pending`, `completed`, and
/// `cancelled` may move to any other status. The admin dashboard relies on
/// being able to reopen a mis-clicked order, so no terminal states are
/// enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
///
/// Never carries the password hash - credential material stays inside the
/// store and is only compared there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Row id (AUTOINCREMENT).
    pub id: i64,

    /// Login email, stored lowercased and trimmed. Unique.
    pub email: String,

    /// Display name.
    pub full_name: String,

    /// Optional contact phone.
    pub phone: Option<String>,

    /// Optional delivery address.
    pub address: Option<String>,

    /// Account role.
    pub role: Role,

    /// Soft-disable flag. Inactive users cannot log in or validate sessions.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub email: String,
    /// Raw password; hashed before it ever touches a row.
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Partial profile update. Only the whitelisted fields are mutable; an
/// all-`None` update is rejected by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Raw replacement password, hashed on the way in.
    pub password: Option<String>,
}

impl ProfileUpdate {
    /// True when no field is set - the store rejects such updates.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.password.is_none()
    }
}

// =============================================================================
// Session
// =============================================================================

/// A login session row.
///
/// One user may hold several concurrent sessions (multiple devices). Expiry
/// is checked lazily at validation time; rows linger until logout, cascade
/// delete, or an explicit purge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Session {
    pub id: i64,

    pub user_id: i64,

    /// Opaque token handed to the client at login. Unique.
    pub token: String,

    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    pub name: String,

    /// Current selling price.
    pub price: f64,

    /// Pre-discount price, kept for strike-through display.
    pub original_price: f64,

    /// Image reference (URL or asset key).
    pub image: String,

    /// Average rating shown on the card.
    pub rating: f64,

    /// Review count shown next to the rating.
    pub reviews: i64,

    /// Free-form classification tag ("BESTSELLER", "NEW", ...).
    pub badge: String,

    pub description: String,

    pub category: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub original_price: f64,
    pub image: String,
    pub rating: f64,
    pub reviews: i64,
    pub badge: String,
    pub description: String,
    pub category: String,
}

/// Partial product update (admin only). All-`None` patches are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub badge: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.original_price.is_none()
            && self.image.is_none()
            && self.rating.is_none()
            && self.reviews.is_none()
            && self.badge.is_none()
            && self.description.is_none()
            && self.category.is_none()
    }
}

// =============================================================================
// Cart & Favorites
// =============================================================================

/// One cart line per (user, product) pair.
///
/// Product fields are a frozen snapshot taken when the line was first added;
/// `quantity` is the only field that moves afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub original_price: f64,
    pub image: String,
    pub rating: f64,
    pub reviews: i64,
    pub badge: String,
    pub description: String,
    pub category: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A favorited product, snapshot semantics identical to [`CartLine`] but with
/// no quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct FavoriteEntry {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub original_price: f64,
    pub image: String,
    pub rating: f64,
    pub reviews: i64,
    pub badge: String,
    pub description: String,
    pub category: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

/// One purchased line inside an order, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    /// Product id at purchase time (the product may be deleted later).
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    /// Unit price at purchase time.
    pub price: f64,
}

/// A placed order.
///
/// Buyer name/email are denormalized so the order survives account edits;
/// `items` is stored as a JSON column and round-trips through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_empty_patch_detection() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(ProductUpdate::default().is_empty());

        let update = ProfileUpdate {
            phone: Some("123".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());

        let patch = ProductUpdate {
            price: Some(9.99),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_order_lines_json_round_trip() {
        let lines = vec![
            OrderLine {
                id: 1,
                name: "Premium Red Roses".to_string(),
                quantity: 2,
                price: 299.0,
            },
            OrderLine {
                id: 4,
                name: "Elegant White Lilies".to_string(),
                quantity: 1,
                price: 349.0,
            },
        ];

        let json = serde_json::to_string(&lines).unwrap();
        let back: Vec<OrderLine> = serde_json::from_str(&json).unwrap();
        assert_eq!(lines, back);
    }
}
