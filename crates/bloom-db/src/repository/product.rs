//! # Product Repository
//!
//! Catalog operations. Browsing is open to everyone; create, update, and
//! delete are admin-dashboard calls (the role check happens in the UI layer,
//! which only routes admins there).
//!
//! Deletes are hard deletes, as the storefront expects: cart lines,
//! favorites, and order lines all carry their own product snapshot, so
//! removing a catalog row never corrupts history.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::pool::StoreHandle;
use bloom_core::{NewProduct, Product, ProductUpdate};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let products = db.products();
///
/// let all = products.get_all().await?;
/// let roses = products.get_by_category("roses").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    handle: StoreHandle,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub(crate) fn new(handle: StoreHandle) -> Self {
        ProductRepository { handle }
    }

    /// Lists the whole catalog, newest first.
    pub async fn get_all(&self) -> StoreResult<Vec<Product>> {
        let pool = self.handle.pool()?;

        let products: Vec<Product> = sqlx::query_as(
            r#"
            SELECT id, name, price, original_price, image, rating,
                   reviews, badge, description, category, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Lists one category, newest first.
    pub async fn get_by_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let pool = self.handle.pool()?;

        let products: Vec<Product> = sqlx::query_as(
            r#"
            SELECT id, name, price, original_price, image, rating,
                   reviews, badge, description, category, created_at, updated_at
            FROM products
            WHERE category = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(category)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let pool = self.handle.pool()?;

        let product: Option<Product> = sqlx::query_as(
            r#"
            SELECT id, name, price, original_price, image, rating,
                   reviews, badge, description, category, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product (admin).
    pub async fn insert(&self, new_product: NewProduct) -> StoreResult<Product> {
        let pool = self.handle.pool()?;

        debug!(name = %new_product.name, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, price, original_price, image, rating,
                reviews, badge, description, category,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&new_product.name)
        .bind(new_product.price)
        .bind(new_product.original_price)
        .bind(&new_product.image)
        .bind(new_product.rating)
        .bind(new_product.reviews)
        .bind(&new_product.badge)
        .bind(&new_product.description)
        .bind(&new_product.category)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    /// Applies a partial product update (admin) and bumps `updated_at`.
    ///
    /// ## Errors
    /// * `StoreError::NoFieldsToUpdate` - all patch fields are `None`
    /// * `StoreError::NotFound` - no such product
    pub async fn update(&self, id: i64, patch: &ProductUpdate) -> StoreResult<Product> {
        let pool = self.handle.pool()?;

        if patch.is_empty() {
            return Err(StoreError::NoFieldsToUpdate);
        }

        debug!(id = id, "Updating product");

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE products SET ");
        let mut sets = builder.separated(", ");

        if let Some(name) = &patch.name {
            sets.push("name = ");
            sets.push_bind_unseparated(name.clone());
        }
        if let Some(price) = patch.price {
            sets.push("price = ");
            sets.push_bind_unseparated(price);
        }
        if let Some(original_price) = patch.original_price {
            sets.push("original_price = ");
            sets.push_bind_unseparated(original_price);
        }
        if let Some(image) = &patch.image {
            sets.push("image = ");
            sets.push_bind_unseparated(image.clone());
        }
        if let Some(rating) = patch.rating {
            sets.push("rating = ");
            sets.push_bind_unseparated(rating);
        }
        if let Some(reviews) = patch.reviews {
            sets.push("reviews = ");
            sets.push_bind_unseparated(reviews);
        }
        if let Some(badge) = &patch.badge {
            sets.push("badge = ");
            sets.push_bind_unseparated(badge.clone());
        }
        if let Some(description) = &patch.description {
            sets.push("description = ");
            sets.push_bind_unseparated(description.clone());
        }
        if let Some(category) = &patch.category {
            sets.push("category = ");
            sets.push_bind_unseparated(category.clone());
        }
        sets.push("updated_at = ");
        sets.push_bind_unseparated(Utc::now());

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    /// Hard-deletes a product (admin). Existing cart/favorite/order
    /// snapshots are unaffected.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts catalog rows (diagnostics, seed guard checks).
    pub async fn count(&self) -> StoreResult<i64> {
        let pool = self.handle.pool()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
