//! # Cart Repository
//!
//! Per-user cart lines with upsert semantics.
//!
//! ## Upsert Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    add(user, product)                                   │
//! │                                                                         │
//! │  First add                                                              │
//! │    └── INSERT line: quantity 1 + product snapshot frozen now            │
//! │                                                                         │
//! │  Repeat add (same user, same product)                                   │
//! │    └── ON CONFLICT(user_id, product_id): quantity + 1                   │
//! │        (the original snapshot stays - one line per product, ever)       │
//! │                                                                         │
//! │  update_quantity(user, product, 0)                                      │
//! │    └── line deleted entirely                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `UNIQUE(user_id, product_id)` constraint is what makes the single
//! upsert statement atomic; there is no read-modify-write window.

use chrono::Utc;
use tracing::debug;

use crate::error::StoreResult;
use crate::pool::StoreHandle;
use bloom_core::{CartLine, Product};

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    handle: StoreHandle,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub(crate) fn new(handle: StoreHandle) -> Self {
        CartRepository { handle }
    }

    /// Lists a user's cart, most recently touched lines first.
    pub async fn items(&self, user_id: i64) -> StoreResult<Vec<CartLine>> {
        let pool = self.handle.pool()?;

        let lines: Vec<CartLine> = sqlx::query_as(
            r#"
            SELECT id, user_id, product_id, name, price, original_price, image,
                   rating, reviews, badge, description, category, quantity,
                   created_at, updated_at
            FROM cart_items
            WHERE user_id = ?1
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(lines)
    }

    /// Adds one unit of a product to the cart.
    ///
    /// Upsert: a new line starts at quantity 1 with the product fields
    /// frozen as a snapshot; an existing line just gains quantity. Later
    /// catalog edits never reach the snapshot.
    pub async fn add(&self, user_id: i64, product: &Product) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(user_id = user_id, product_id = product.id, "Adding to cart");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO cart_items (
                user_id, product_id, name, price, original_price, image,
                rating, reviews, badge, description, category, quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?13)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = quantity + 1, updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.image)
        .bind(product.rating)
        .bind(product.reviews)
        .bind(&product.badge)
        .bind(&product.description)
        .bind(&product.category)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Overwrites a line's quantity; `quantity <= 0` removes the line
    /// entirely. A missing line is a quiet no-op, matching how quantity
    /// steppers behave in the cart screen.
    pub async fn update_quantity(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> StoreResult<()> {
        if quantity <= 0 {
            return self.remove(user_id, product_id).await;
        }

        let pool = self.handle.pool()?;

        debug!(
            user_id = user_id,
            product_id = product_id,
            quantity = quantity,
            "Updating cart quantity"
        );

        sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = ?3, updated_at = ?4
            WHERE user_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Removes one line from the cart. Idempotent.
    pub async fn remove(&self, user_id: i64, product_id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(
            user_id = user_id,
            product_id = product_id,
            "Removing from cart"
        );

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1 AND product_id = ?2")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Empties the whole cart (post-checkout, or the explicit clear action).
    pub async fn clear(&self, user_id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(user_id = user_id, "Clearing cart");

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Total units in the cart (the tab-bar badge number).
    pub async fn count(&self, user_id: i64) -> StoreResult<i64> {
        let pool = self.handle.pool()?;

        let count: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Cart total at snapshot prices.
    pub async fn total(&self, user_id: i64) -> StoreResult<f64> {
        let pool = self.handle.pool()?;

        let total: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(price * quantity), 0.0) FROM cart_items WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
