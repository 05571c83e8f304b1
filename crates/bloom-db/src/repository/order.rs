//! # Order Repository
//!
//! Checkout orders. Each row freezes the buyer's name/email and the purchased
//! lines (as a JSON column) at checkout time, so later account edits, catalog
//! repricing, or product deletion never rewrite order history.
//!
//! Status transitions are unrestricted in both directions; the admin
//! dashboard depends on being able to reopen a completed or cancelled order.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::pool::StoreHandle;
use bloom_core::{Order, OrderLine, OrderStatus};

/// Raw order row. `items` is a JSON string in SQLite and only becomes
/// `Vec<OrderLine>` here, so a corrupt column surfaces as a store error
/// instead of a silent empty order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    user_name: String,
    user_email: String,
    items: String,
    total: f64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> StoreResult<Order> {
        let items: Vec<OrderLine> = serde_json::from_str(&self.items).map_err(|e| {
            StoreError::Internal(format!("order {} has malformed items JSON: {e}", self.id))
        })?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            user_name: self.user_name,
            user_email: self.user_email,
            items,
            total: self.total,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, user_name, user_email, items, total, status, created_at, updated_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    handle: StoreHandle,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub(crate) fn new(handle: StoreHandle) -> Self {
        OrderRepository { handle }
    }

    /// Places an order with status `pending`.
    ///
    /// Buyer name/email and the line items are denormalized into the row;
    /// the caller passes them from the current user and cart.
    pub async fn create(
        &self,
        user_id: i64,
        user_name: &str,
        user_email: &str,
        items: Vec<OrderLine>,
        total: f64,
    ) -> StoreResult<Order> {
        let pool = self.handle.pool()?;

        let items_json = serde_json::to_string(&items)
            .map_err(|e| StoreError::Internal(format!("failed to encode order items: {e}")))?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                user_id, user_name, user_email, items, total, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(user_email)
        .bind(&items_json)
        .bind(total)
        .bind(OrderStatus::Pending)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(order_id = id, user_id = user_id, total = total, "Order placed");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Order", id))
    }

    /// Gets a single order by id.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Order>> {
        let pool = self.handle.pool()?;

        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))
                .bind(id)
                .fetch_optional(pool)
                .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Lists every order, newest first (admin dashboard).
    pub async fn get_all(&self) -> StoreResult<Vec<Order>> {
        let pool = self.handle.pool()?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Lists one user's orders, newest first.
    pub async fn for_user(&self, user_id: i64) -> StoreResult<Vec<Order>> {
        let pool = self.handle.pool()?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Sets an order's status (admin). Any status may follow any other.
    pub async fn update_status(&self, order_id: i64, status: OrderStatus) -> StoreResult<Order> {
        let pool = self.handle.pool()?;

        debug!(order_id = order_id, status = ?status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(order_id)
            .bind(status)
            .bind(Utc::now())
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Order", order_id));
        }

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Order", order_id))
    }

    /// Counts order rows (diagnostics).
    pub async fn count(&self) -> StoreResult<i64> {
        let pool = self.handle.pool()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
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
    use bloom_core::{NewUser, User};

    async fn shopper(db: &Database) -> User {
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
    }

    fn rose_lines() -> Vec<OrderLine> {
        vec![
            OrderLine {
                id: 1,
                name: "Premium Red Roses".to_string(),
                quantity: 2,
                price: 299.0,
            },
            OrderLine {
                id: 2,
                name: "Sunflower Delight".to_string(),
                quantity: 1,
                price: 199.0,
            },
        ]
    }

    #[tokio::test]
    async fn test_create_starts_pending_and_round_trips_items() {
        let db = test_store().await;
        let user = shopper(&db).await;

        let lines = rose_lines();
        let order = db
            .orders()
            .create(user.id, &user.full_name, &user.email, lines.clone(), 797.0)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_name, "Shopper");
        assert_eq!(order.user_email, "shopper@x.com");
        assert_eq!(order.total, 797.0);
        assert_eq!(order.items, lines);

        // Fetch back through a fresh query path
        let fetched = db.orders().get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.items, lines);
    }

    #[tokio::test]
    async fn test_status_moves_freely_in_both_directions() {
        let db = test_store().await;
        let user = shopper(&db).await;

        let order = db
            .orders()
            .create(user.id, &user.full_name, &user.email, rose_lines(), 797.0)
            .await
            .unwrap();

        let completed = db
            .orders()
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);

        // Reopening a completed order is allowed
        let reopened = db
            .orders()
            .update_status(order.id, OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(reopened.status, OrderStatus::Pending);

        let cancelled = db
            .orders()
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(cancelled.updated_at >= order.updated_at);
    }

    #[tokio::test]
    async fn test_update_status_missing_order() {
        let db = test_store().await;

        let err = db
            .orders()
            .update_status(9999, OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_listings_are_newest_first_and_per_user() {
        let db = test_store().await;
        let first = shopper(&db).await;
        let second = db
            .users()
            .register(NewUser {
                email: "other@x.com".to_string(),
                password: "secret1".to_string(),
                full_name: "Other".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let orders = db.orders();
        let a = orders
            .create(first.id, &first.full_name, &first.email, rose_lines(), 797.0)
            .await
            .unwrap();
        let b = orders
            .create(first.id, &first.full_name, &first.email, rose_lines(), 598.0)
            .await
            .unwrap();
        let c = orders
            .create(
                second.id,
                &second.full_name,
                &second.email,
                rose_lines(),
                199.0,
            )
            .await
            .unwrap();

        // Same-second inserts fall back to id order
        let all: Vec<i64> = orders.get_all().await.unwrap().iter().map(|o| o.id).collect();
        assert_eq!(all, vec![c.id, b.id, a.id]);

        let mine: Vec<i64> = orders
            .for_user(first.id)
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(mine, vec![b.id, a.id]);

        assert_eq!(orders.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_order_survives_buyer_profile_edit() {
        let db = test_store().await;
        let user = shopper(&db).await;

        let order = db
            .orders()
            .create(user.id, &user.full_name, &user.email, rose_lines(), 797.0)
            .await
            .unwrap();

        db.users()
            .update_profile(
                user.id,
                &bloom_core::ProfileUpdate {
                    full_name: Some("Renamed Shopper".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let fetched = db.orders().get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_name, "Shopper");
    }
}
