//! # Seed Data
//!
//! Idempotent seeding run during [`Database::initialize`]: a fixed sample
//! flower catalog (only when the product table is empty) and the default
//! administrator account (only when no admin row exists).
//!
//! [`Database::initialize`]: crate::Database::initialize

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;
use bloom_core::{password, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, DEFAULT_ADMIN_PASSWORD};

/// A catalog entry seeded on first launch.
struct SampleProduct {
    name: &'static str,
    price: f64,
    original_price: f64,
    image: &'static str,
    rating: f64,
    reviews: i64,
    badge: &'static str,
    description: &'static str,
    category: &'static str,
}

/// The fixed first-launch catalog. Keep in sync with the storefront's
/// category filters (roses, bouquets, wedding, birthday).
const SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        name: "Premium Red Roses",
        price: 299.0,
        original_price: 399.0,
        image: "https://images.unsplash.com/photo-1518895949257-7621c3c786d7?w=400",
        rating: 4.8,
        reviews: 124,
        badge: "BESTSELLER",
        description: "Beautiful premium red roses perfect for expressing love and appreciation.",
        category: "roses",
    },
    SampleProduct {
        name: "Sunflower Delight",
        price: 199.0,
        original_price: 249.0,
        image: "https://images.unsplash.com/photo-1597848212624-e19f2049ce73?w=400",
        rating: 4.6,
        reviews: 89,
        badge: "NEW",
        description: "Bright and cheerful sunflowers that bring joy to any space.",
        category: "bouquets",
    },
    SampleProduct {
        name: "Mixed Garden Bouquet",
        price: 399.0,
        original_price: 499.0,
        image: "https://images.unsplash.com/photo-1563241527-3004b7be0ffd?w=400",
        rating: 4.9,
        reviews: 156,
        badge: "TRENDING",
        description: "A stunning mix of seasonal flowers arranged by our expert florists.",
        category: "bouquets",
    },
    SampleProduct {
        name: "Elegant White Lilies",
        price: 349.0,
        original_price: 449.0,
        image: "https://images.unsplash.com/photo-1586348943529-beaae6c28db9?w=400",
        rating: 4.7,
        reviews: 93,
        badge: "PREMIUM",
        description: "Pure and elegant white lilies for sophisticated occasions.",
        category: "wedding",
    },
    SampleProduct {
        name: "Birthday Party Bouquet",
        price: 259.0,
        original_price: 329.0,
        image: "https://images.unsplash.com/photo-1508610048659-a06b669e3321?w=400",
        rating: 4.5,
        reviews: 67,
        badge: "POPULAR",
        description: "Colorful and vibrant bouquet perfect for birthday celebrations.",
        category: "birthday",
    },
    SampleProduct {
        name: "Pink Rose Arrangement",
        price: 329.0,
        original_price: 429.0,
        image: "https://images.unsplash.com/photo-1502181415656-405a82d99281?w=400",
        rating: 4.8,
        reviews: 112,
        badge: "BESTSELLER",
        description: "Delicate pink roses arranged in a beautiful bouquet.",
        category: "roses",
    },
];

/// Seeds the sample catalog if the product table is empty.
pub(crate) async fn seed_sample_products(pool: &SqlitePool) -> StoreResult<()> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM products LIMIT 1")
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let now = Utc::now();

    for product in SAMPLE_PRODUCTS {
        sqlx::query(
            r#"
            INSERT INTO products (
                name, price, original_price, image, rating,
                reviews, badge, description, category,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(product.name)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.image)
        .bind(product.rating)
        .bind(product.reviews)
        .bind(product.badge)
        .bind(product.description)
        .bind(product.category)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    }

    info!(count = SAMPLE_PRODUCTS.len(), "Sample catalog seeded");
    Ok(())
}

/// Seeds the default administrator account if no admin exists.
///
/// The credential is hashed like any other; the well-known default password
/// is only a bootstrap convenience.
pub(crate) async fn seed_default_admin(pool: &SqlitePool) -> StoreResult<()> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE role = 'admin' LIMIT 1")
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Ok(());
    }

    let password_hash = password::hash_password(DEFAULT_ADMIN_PASSWORD)?;
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, full_name, role, is_active, created_at, updated_at)
        VALUES (?1, ?2, ?3, 'admin', 1, ?4, ?5)
        "#,
    )
    .bind(DEFAULT_ADMIN_EMAIL)
    .bind(&password_hash)
    .bind(DEFAULT_ADMIN_NAME)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    info!(email = DEFAULT_ADMIN_EMAIL, "Default admin seeded");
    Ok(())
}
