//! # User Repository
//!
//! Accounts, authentication, and sessions.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  1. LOGIN                                                               │
//! │     └── login(email, password) → mints opaque token,                    │
//! │         inserts session row expiring SESSION_TTL_DAYS out               │
//! │                                                                         │
//! │  2. APP START                                                           │
//! │     └── validate_session(token) → Some(User) only while the row         │
//! │         exists, is unexpired, and the user is active                    │
//! │                                                                         │
//! │  3. LOGOUT                                                              │
//! │     └── logout(token) → deletes the row (idempotent)                    │
//! │                                                                         │
//! │  Expiry is lazy: nothing sweeps old rows automatically. A user may      │
//! │  hold several live sessions at once (several devices).                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::pool::StoreHandle;
use bloom_core::{password, NewUser, ProfileUpdate, Session, User, SESSION_TTL_DAYS};

/// Columns selected whenever a [`User`] is returned. `password_hash` is
/// deliberately absent: credential material never leaves this module.
const USER_COLUMNS: &str =
    "id, email, full_name, phone, address, role, is_active, created_at, updated_at";

/// Repository for account, profile, and session operations.
///
/// ## Usage
/// ```rust,ignore
/// let users = db.users();
///
/// let user = users.register(new_user).await?;
/// let (user, token) = users.login("a@x.com", "secret1").await?;
/// let restored = users.validate_session(&token).await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    handle: StoreHandle,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub(crate) fn new(handle: StoreHandle) -> Self {
        UserRepository { handle }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Registers a new account with role `user`.
    ///
    /// The email is lowercased and trimmed before insert, so case/whitespace
    /// variants of an existing address collide with it.
    ///
    /// ## Errors
    /// * `StoreError::DuplicateEmail` - normalized email already registered
    pub async fn register(&self, new_user: NewUser) -> StoreResult<User> {
        let pool = self.handle.pool()?;

        let email = new_user.email.trim().to_lowercase();
        debug!(email = %email, "Registering user");

        // Derived credential only; the raw password is dropped here
        let password_hash = password::hash_password(&new_user.password)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                email, password_hash, full_name, phone, address,
                role, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 'user', 1, ?6, ?7)
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(new_user.full_name.trim())
        .bind(normalize_optional(new_user.phone.as_deref()))
        .bind(normalize_optional(new_user.address.as_deref()))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| {
            let err = StoreError::from(e);
            if err.is_unique_violation_on("users.email") {
                StoreError::DuplicateEmail {
                    email: email.clone(),
                }
            } else {
                err
            }
        })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("User", id))
    }

    /// Authenticates by email + password and opens a session.
    ///
    /// On success returns the user together with an opaque token whose
    /// session row expires [`SESSION_TTL_DAYS`] from now.
    ///
    /// ## Errors
    /// * `StoreError::InvalidCredentials` - unknown email, wrong password,
    ///   or deactivated account (indistinguishable by design)
    pub async fn login(&self, email: &str, password_input: &str) -> StoreResult<(User, String)> {
        let pool = self.handle.pool()?;

        let email = email.trim().to_lowercase();
        debug!(email = %email, "Login attempt");

        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE email = ?1 AND is_active = 1")
                .bind(&email)
                .fetch_optional(pool)
                .await?;

        let Some((user_id, stored_hash)) = row else {
            return Err(StoreError::InvalidCredentials);
        };

        if !password::verify_password(password_input, &stored_hash) {
            return Err(StoreError::InvalidCredentials);
        }

        let user = self
            .get_by_id(user_id)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        let token = mint_session_token();
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);

        sqlx::query(
            "INSERT INTO sessions (user_id, token, expires_at, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(user_id)
        .bind(&token)
        .bind(expires_at)
        .bind(now)
        .execute(pool)
        .await?;

        debug!(user_id = user_id, "Login succeeded");
        Ok((user, token))
    }

    /// Resolves a session token to its user, used on every app start to
    /// restore a logged-in state.
    ///
    /// Returns `None` for unknown tokens, expired sessions (checked lazily,
    /// right now), and deactivated users - all indistinguishable.
    pub async fn validate_session(&self, token: &str) -> StoreResult<Option<User>> {
        let pool = self.handle.pool()?;

        let session: Option<Session> = sqlx::query_as(
            "SELECT id, user_id, token, expires_at, created_at FROM sessions WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        // Lazy expiry: an expired row reads as a missing one. It stays in
        // the table until logout or purge_expired_sessions.
        if session.expires_at <= Utc::now() {
            return Ok(None);
        }

        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1 AND is_active = 1"
        ))
        .bind(session.user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes the session row for a token. Idempotent: logging out an
    /// already-absent token is a successful no-op.
    pub async fn logout(&self, token: &str) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Deletes every expired session row and returns how many were removed.
    ///
    /// Nothing schedules this - expiry works lazily without it - but the
    /// session table otherwise grows until users log out, so maintenance
    /// code may call it.
    pub async fn purge_expired_sessions(&self) -> StoreResult<u64> {
        let pool = self.handle.pool()?;

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(Utc::now())
            .execute(pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged = purged, "Purged expired sessions");
        }
        Ok(purged)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Applies a partial profile update (self-service or admin).
    ///
    /// Mutable fields are whitelisted: full name, phone, address, password.
    /// Phone/address set to an empty string are cleared to NULL; a new
    /// password is hashed on the way in. `updated_at` is bumped.
    ///
    /// ## Errors
    /// * `StoreError::NoFieldsToUpdate` - nothing to change (and
    ///   `updated_at` is left untouched)
    /// * `StoreError::NotFound` - no such user
    pub async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> StoreResult<User> {
        let pool = self.handle.pool()?;

        let full_name = update
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let new_password = update.password.as_deref().filter(|s| !s.is_empty());

        if full_name.is_none()
            && update.phone.is_none()
            && update.address.is_none()
            && new_password.is_none()
        {
            return Err(StoreError::NoFieldsToUpdate);
        }

        let password_hash = match new_password {
            Some(raw) => Some(password::hash_password(raw)?),
            None => None,
        };

        debug!(user_id = user_id, "Updating profile");

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut sets = builder.separated(", ");

        if let Some(name) = full_name {
            sets.push("full_name = ");
            sets.push_bind_unseparated(name.to_string());
        }
        if let Some(phone) = update.phone.as_deref() {
            sets.push("phone = ");
            sets.push_bind_unseparated(normalize_optional(Some(phone)));
        }
        if let Some(address) = update.address.as_deref() {
            sets.push("address = ");
            sets.push_bind_unseparated(normalize_optional(Some(address)));
        }
        if let Some(hash) = password_hash {
            sets.push("password_hash = ");
            sets.push_bind_unseparated(hash);
        }
        sets.push("updated_at = ");
        sets.push_bind_unseparated(Utc::now());

        builder.push(" WHERE id = ");
        builder.push_bind(user_id);

        let result = builder.build().execute(pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user_id));
        }

        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("User", user_id))
    }

    /// Gets a user by row id.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let pool = self.handle.pool()?;

        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    /// Gets a user by email (normalized before lookup).
    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let pool = self.handle.pool()?;

        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))
                .bind(email.trim().to_lowercase())
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Lists every account, newest first (admin dashboard).
    pub async fn get_all(&self) -> StoreResult<Vec<User>> {
        let pool = self.handle.pool()?;

        let users: Vec<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Flips a user's active flag. Deactivated users cannot log in and their
    /// existing sessions stop validating.
    pub async fn toggle_status(&self, user_id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(user_id = user_id, "Toggling user status");

        let result =
            sqlx::query("UPDATE users SET is_active = NOT is_active, updated_at = ?2 WHERE id = ?1")
                .bind(user_id)
                .bind(Utc::now())
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user_id));
        }

        Ok(())
    }

    /// Hard-deletes a user. The schema cascades to the user's sessions,
    /// cart lines, favorites, and orders.
    pub async fn delete(&self, user_id: i64) -> StoreResult<()> {
        let pool = self.handle.pool()?;

        debug!(user_id = user_id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user_id));
        }

        Ok(())
    }
}

/// Mints an opaque session token (64 hex chars of UUIDv4 material).
///
/// Opaque on purpose: the token proves nothing by itself and means nothing
/// outside the sessions table.
fn mint_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Maps `Some("")`/whitespace to NULL, mirroring how the profile forms clear
/// optional fields.
fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::test_store;
    use bloom_core::Role;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "secret1".to_string(),
            full_name: "A Shopper".to_string(),
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let db = test_store().await;

        let user = db
            .users()
            .register(sample_user("  Anna@Example.COM  "))
            .await
            .unwrap();

        assert_eq!(user.email, "anna@example.com");
        assert_eq!(user.role, Role::User);
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_across_case_variants() {
        let db = test_store().await;
        let users = db.users();

        users.register(sample_user("a@x.com")).await.unwrap();

        let err = users
            .register(sample_user(" A@X.com "))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail { email } if email == "a@x.com"));

        // Exactly one shopper row exists (plus the seeded admin)
        let all = users.get_all().await.unwrap();
        let shoppers: Vec<_> = all.iter().filter(|u| u.role == Role::User).collect();
        assert_eq!(shoppers.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_email_normalizes_lookup() {
        let db = test_store().await;
        let users = db.users();

        let registered = users.register(sample_user("a@x.com")).await.unwrap();

        // Case/whitespace variants resolve to the same stored row
        let found = users.get_by_email("  A@X.COM ").await.unwrap().unwrap();
        assert_eq!(found.id, registered.id);
        assert_eq!(found.email, "a@x.com");

        assert!(users.get_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_and_validate_session() {
        let db = test_store().await;
        let users = db.users();

        let registered = users.register(sample_user("a@x.com")).await.unwrap();
        let (logged_in, token) = users.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id, registered.id);

        let restored = users.validate_session(&token).await.unwrap().unwrap();
        assert_eq!(restored.id, registered.id);
        assert_eq!(restored.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let db = test_store().await;
        let users = db.users();

        let user = users.register(sample_user("a@x.com")).await.unwrap();

        // Wrong password
        let err = users.login("a@x.com", "wrong-password").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));

        // Unknown email
        let err = users.login("nobody@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));

        // Deactivated account
        users.toggle_status(user.id).await.unwrap();
        let err = users.login("a@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_deactivation_kills_existing_sessions() {
        let db = test_store().await;
        let users = db.users();

        let user = users.register(sample_user("a@x.com")).await.unwrap();
        let (_, token) = users.login("a@x.com", "secret1").await.unwrap();

        users.toggle_status(user.id).await.unwrap();
        assert!(users.validate_session(&token).await.unwrap().is_none());

        // Reactivation brings the session back - the row never went away
        users.toggle_status(user.id).await.unwrap();
        assert!(users.validate_session(&token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let db = test_store().await;
        let users = db.users();

        users.register(sample_user("a@x.com")).await.unwrap();
        let (_, token) = users.login("a@x.com", "secret1").await.unwrap();

        users.logout(&token).await.unwrap();
        assert!(users.validate_session(&token).await.unwrap().is_none());

        // Second logout of the same token succeeds quietly
        users.logout(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_reads_as_missing() {
        let db = test_store().await;
        let users = db.users();

        let user = users.register(sample_user("a@x.com")).await.unwrap();

        // Plant a session that expired an hour ago
        let expired_at = Utc::now() - chrono::Duration::hours(1);
        sqlx::query(
            "INSERT INTO sessions (user_id, token, expires_at, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(user.id)
        .bind("stale-token")
        .bind(expired_at)
        .bind(expired_at - chrono::Duration::days(30))
        .execute(db.pool())
        .await
        .unwrap();

        assert!(users.validate_session("stale-token").await.unwrap().is_none());

        // The row is still there until purged
        let purged = users.purge_expired_sessions().await.unwrap();
        assert_eq!(purged, 1);
    }

    #[tokio::test]
    async fn test_multiple_concurrent_sessions() {
        let db = test_store().await;
        let users = db.users();

        users.register(sample_user("a@x.com")).await.unwrap();
        let (_, token_phone) = users.login("a@x.com", "secret1").await.unwrap();
        let (_, token_tablet) = users.login("a@x.com", "secret1").await.unwrap();

        assert_ne!(token_phone, token_tablet);
        assert!(users.validate_session(&token_phone).await.unwrap().is_some());
        assert!(users.validate_session(&token_tablet).await.unwrap().is_some());

        // Logging out one device leaves the other alone
        users.logout(&token_phone).await.unwrap();
        assert!(users.validate_session(&token_phone).await.unwrap().is_none());
        assert!(users.validate_session(&token_tablet).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_profile_update_rejected() {
        let db = test_store().await;
        let users = db.users();

        let user = users.register(sample_user("a@x.com")).await.unwrap();

        let err = users
            .update_profile(user.id, &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NoFieldsToUpdate));

        // updated_at untouched by the failed call
        let unchanged = users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(unchanged.updated_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_profile_update_whitelist() {
        let db = test_store().await;
        let users = db.users();

        let user = users.register(sample_user("a@x.com")).await.unwrap();

        let updated = users
            .update_profile(
                user.id,
                &ProfileUpdate {
                    full_name: Some("Renamed Shopper".to_string()),
                    phone: Some("555-0100".to_string()),
                    address: None,
                    password: Some("newsecret".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, "Renamed Shopper");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert!(updated.updated_at > user.updated_at);

        // Password actually rotated
        assert!(users.login("a@x.com", "secret1").await.is_err());
        assert!(users.login("a@x.com", "newsecret").await.is_ok());

        // Empty string clears an optional field to NULL
        let cleared = users
            .update_profile(
                user.id,
                &ProfileUpdate {
                    phone: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.phone.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let db = test_store().await;
        let users = db.users();

        let user = users.register(sample_user("a@x.com")).await.unwrap();
        let (_, token) = users.login("a@x.com", "secret1").await.unwrap();

        let product = &db.products().get_all().await.unwrap()[0];
        db.cart().add(user.id, product).await.unwrap();
        db.favorites().add(user.id, product).await.unwrap();
        db.orders()
            .create(
                user.id,
                &user.full_name,
                &user.email,
                vec![bloom_core::OrderLine {
                    id: product.id,
                    name: product.name.clone(),
                    quantity: 1,
                    price: product.price,
                }],
                product.price,
            )
            .await
            .unwrap();

        users.delete(user.id).await.unwrap();

        assert!(users.get_by_id(user.id).await.unwrap().is_none());
        assert!(users.validate_session(&token).await.unwrap().is_none());
        assert!(db.cart().items(user.id).await.unwrap().is_empty());
        assert!(db.favorites().items(user.id).await.unwrap().is_empty());
        assert!(db.orders().for_user(user.id).await.unwrap().is_empty());

        // And the session row itself is gone, not just unreadable
        let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(sessions, 0);
    }

    #[tokio::test]
    async fn test_end_to_end_shopping_session() {
        let db = test_store().await;
        let users = db.users();

        users
            .register(NewUser {
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
                full_name: "A".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let (user, _token) = users.login("a@x.com", "secret1").await.unwrap();

        let product = db.products().get_by_id(1).await.unwrap().unwrap();
        db.cart().add(user.id, &product).await.unwrap();
        db.cart().add(user.id, &product).await.unwrap();

        let lines = db.cart().items(user.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);

        db.cart().clear(user.id).await.unwrap();
        assert!(db.cart().items(user.id).await.unwrap().is_empty());
    }
}
