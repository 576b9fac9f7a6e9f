// User storage

use axum::async_trait;
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{NewUser, User, UserRow},
};

/// Storage collaborator for registered users.
///
/// Implementations enforce username uniqueness: `create_user` must fail with
/// `AuthError::UsernameAlreadyExists` instead of overwriting.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError>;

    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>, AuthError>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, user_name, first_name, last_name, password, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_name, first_name, last_name, password, role
            "#,
        )
        .bind(user.id)
        .bind(&user.user_name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::UsernameAlreadyExists;
                }
            }
            AuthError::from(e)
        })?;

        row.try_into()
    }

    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, user_name, first_name, last_name, password, role FROM users WHERE user_name = $1",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
pub(crate) use in_memory::InMemoryUserStore;
