//! # Favorites Repository
//!
//! Per-user favorites with toggle-friendly semantics: adding an existing
//! favorite is a silent no-op (`INSERT OR IGNORE`), so the heart button can
//! fire without first reading state. Rows carry the same frozen product
//! snapshot as cart lines, minus quantity.

use chrono::Utc;
use tracing::debug;

use crate::error::StoreResult;
use crate::pool::StoreHandle;
use bloom_core::{FavoriteEntry, Product};

/// Repository for favorites database operations.
#[derive(Debug, Clone)]
pub struct FavoriteRepository {
    handle: StoreHandle,
}

impl FavoriteRepository {
    /// Creates a new FavoriteRepository.
    pub(crate) fn new(handle: StoreHandle) -> Self {
        FavoriteRepository { handle }
    }

    /// Lists a user's favorites, newest first.
    pub async fn items(&self, user_id: i64) -> StoreResult<Vec<FavoriteEntry>> {
        let pool = self.handle.pool()?;

        let entries: Vec<FavoriteEntry> = sqlx::query_as(
            r#"
            SELECT id, user_id, product_id, name, price, original_price, image,
                   rating, reviews, badge, description, category, created_at
            FROM favorites
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Favorites a product, freezing its fields at this instant.
    ///
    /// Duplicate adds are ignored, not errors - the unique
    /// `(user_id, product_id)` pair keeps exactly one row.
    pub async fn add(&self, user_id: i64, product: &Product) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(
            user_id = user_id,
            product_id = product.id,
            "Adding to favorites"
        );

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO favorites (
                user_id, product_id, name, price, original_price, image,
                rating, reviews, badge, description, category, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
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
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Unfavorites a product. Idempotent.
    pub async fn remove(&self, user_id: i64, product_id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(
            user_id = user_id,
            product_id = product_id,
            "Removing from favorites"
        );

        sqlx::query("DELETE FROM favorites WHERE user_id = ?1 AND product_id = ?2")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Removes every favorite for a user.
    pub async fn clear(&self, user_id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        sqlx::query("DELETE FROM favorites WHERE user_id = ?1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Whether a product is currently favorited (drives the heart icon).
    pub async fn is_favorite(&self, user_id: i64, product_id: i64) -> StoreResult<bool> {
        let pool = self.handle.pool()?;

        let row: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM favorites WHERE user_id = ?1 AND product_id = ?2")
                .bind(user_id)
                .bind(product_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.is_some())
    }

    /// Number of favorites for a user (profile screen counter).
    pub async fn count(&self, user_id: i64) -> StoreResult<i64> {
        let pool = self.handle.pool()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::test_store;
    use crate::Database;
    use bloom_core::NewUser;

    async fn shopper(db: &Database) -> i64 {
        db.users()
            .register(NewUser {
                email: "shopper@x.com".to_string(),
                password: "secret1".to_string(),
                full_name: "Shopper".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_duplicate_add_is_a_noop() {
        let db = test_store().await;
        let user_id = shopper(&db).await;
        let product = db.products().get_by_id(1).await.unwrap().unwrap();

        db.favorites().add(user_id, &product).await.unwrap();
        db.favorites().add(user_id, &product).await.unwrap();

        let entries = db.favorites().items(user_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id, product.id);
        assert_eq!(db.favorites().count(user_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_is_favorite_toggle_round_trip() {
        let db = test_store().await;
        let user_id = shopper(&db).await;
        let product = db.products().get_by_id(1).await.unwrap().unwrap();
        let favorites = db.favorites();

        assert!(!favorites.is_favorite(user_id, product.id).await.unwrap());

        favorites.add(user_id, &product).await.unwrap();
        assert!(favorites.is_favorite(user_id, product.id).await.unwrap());

        favorites.remove(user_id, product.id).await.unwrap();
        assert!(!favorites.is_favorite(user_id, product.id).await.unwrap());

        // Removing again stays quiet
        favorites.remove(user_id, product.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_survives_product_delete() {
        let db = test_store().await;
        let user_id = shopper(&db).await;
        let product = db.products().get_by_id(1).await.unwrap().unwrap();

        db.favorites().add(user_id, &product).await.unwrap();
        db.products().delete(product.id).await.unwrap();

        let entries = db.favorites().items(user_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, product.name);
        assert_eq!(entries[0].price, product.price);
    }

    #[tokio::test]
    async fn test_clear() {
        let db = test_store().await;
        let user_id = shopper(&db).await;

        for product in db.products().get_all().await.unwrap().iter().take(3) {
            db.favorites().add(user_id, product).await.unwrap();
        }
        assert_eq!(db.favorites().count(user_id).await.unwrap(), 3);

        db.favorites().clear(user_id).await.unwrap();
        assert_eq!(db.favorites().count(user_id).await.unwrap(), 0);
    }
}
