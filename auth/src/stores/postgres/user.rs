//! PostgreSQL user repository implementation.
//!
//! # Schema
//!
//! Accounts live in `users`. `phone_number` carries a unique index, and a
//! partial unique index on `reset_otp` keeps pending OTPs globally distinct.
//! Both violations are mapped to domain errors rather than surfaced as
//! database failures.
//!
//! # Example
//!
//! ```no_run
//! use studentdesk_auth::stores::PostgresUserRepository;
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/studentdesk").await?;
//! let repo = PostgresUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::providers::UserRepository;
use crate::state::{CredentialResetState, Meta, User, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

const USER_COLUMNS: &str = "id, name, email, phone_number, password_hash, meta, \
                            reset_otp, reset_otp_expires_at, created_at, updated_at";

const PHONE_UNIQUE_CONSTRAINT: &str = "users_phone_number_key";
const RESET_OTP_UNIQUE_CONSTRAINT: &str = "users_reset_otp_key";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    name: String,
    email: Option<String>,
    phone_number: String,
    password_hash: String,
    meta: Json<Meta>,
    reset_otp: Option<String>,
    reset_otp_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let reset = match (row.reset_otp, row.reset_otp_expires_at) {
            (Some(otp), Some(expires_at)) => Some(CredentialResetState { otp, expires_at }),
            _ => None,
        };

        Self {
            user_id: UserId(row.id),
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            password_hash: row.password_hash,
            meta: row.meta.0,
            reset,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn violated_constraint(error: &sqlx::Error) -> Option<&str> {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => db.constraint(),
        _ => None,
    }
}

fn db_error(context: &str, error: &sqlx::Error) -> AuthError {
    AuthError::DatabaseError(format!("{context}: {error}"))
}

/// `PostgreSQL` user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new `PostgreSQL` user repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, value: &str, context: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {clause} ORDER BY created_at ASC LIMIT 1"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(context, &e))?;

        Ok(row.map(User::from))
    }
}

impl UserRepository for PostgresUserRepository {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get user", &e))?
            .map(User::from)
            .ok_or(AuthError::UserNotFound)
    }

    async fn get_user_by_phone(&self, phone_number: &str) -> Result<User> {
        self.fetch_one_where("phone_number = $1", phone_number, "Failed to get user by phone")
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.fetch_one_where("email = $1", email, "Failed to get user by email")
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn get_user_by_name(&self, name: &str) -> Result<User> {
        self.fetch_one_where("name = $1", name, "Failed to get user by name")
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn phone_exists(&self, phone_number: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = $1)")
            .bind(phone_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check phone number", &e))
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, phone_number, password_hash, meta, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.user_id.0)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone_number)
            .bind(&user.password_hash)
            .bind(Json(&user.meta))
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map(User::from)
            .map_err(|e| match violated_constraint(&e) {
                Some(PHONE_UNIQUE_CONSTRAINT) => AuthError::AlreadyRegistered,
                _ => db_error("Failed to create user", &e),
            })
    }

    async fn update_email(
        &self,
        user_id: UserId,
        email: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<User> {
        let sql = format!(
            "UPDATE users SET email = $2, updated_at = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.0)
            .bind(email)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update email", &e))?
            .map(User::from)
            .ok_or(AuthError::UserNotFound)
    }

    async fn store_reset_state(&self, user_id: UserId, reset: &CredentialResetState) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET reset_otp = $2, reset_otp_expires_at = $3 WHERE id = $1",
        )
        .bind(user_id.0)
        .bind(&reset.otp)
        .bind(reset.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(RESET_OTP_UNIQUE_CONSTRAINT) => AuthError::OtpCollision,
            _ => db_error("Failed to store reset OTP", &e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    async fn get_user_by_reset_otp(&self, otp: &str) -> Result<User> {
        self.fetch_one_where("reset_otp = $1", otp, "Failed to look up reset OTP")
            .await?
            .ok_or(AuthError::InvalidOtp)
    }

    async fn redeem_reset_otp(
        &self,
        user_id: UserId,
        otp: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        // Single conditional UPDATE: of two concurrent redemptions only one
        // can still see the OTP.
        let sql = format!(
            "UPDATE users \
             SET password_hash = $3, reset_otp = NULL, reset_otp_expires_at = NULL, updated_at = $4 \
             WHERE id = $1 AND reset_otp = $2 AND reset_otp_expires_at >= $4 \
             RETURNING {USER_COLUMNS}"
        );

        let redeemed = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.0)
            .bind(otp)
            .bind(password_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to redeem reset OTP", &e))?;

        if let Some(row) = redeemed {
            return Ok(User::from(row));
        }

        let still_pending = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND reset_otp = $2)",
        )
        .bind(user_id.0)
        .bind(otp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to inspect reset OTP", &e))?;

        Err(if still_pending {
            AuthError::OtpExpired
        } else {
            AuthError::InvalidOtp
        })
    }
}
