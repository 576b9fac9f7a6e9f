// Authentication data models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::error::AuthError;

/// Role granted to a user. Registration only ever produces `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

/// Persisted user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    /// argon2 PHC string, never the plaintext
    pub password: String,
    pub role: Role,
}

/// User about to be inserted. The id is assigned by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
}

impl From<NewUser> for User {
    fn from(user: NewUser) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password_hash,
            role: user.role,
        }
    }
}

/// Row shape of the `users` table
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_name: row.user_name,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            password: row.password,
            role: row.role.parse()?,
        })
    }
}

/// Authorities granted to a user: its role name as a single permission.
pub fn authorities(user: &User) -> BTreeSet<String> {
    BTreeSet::from([user.role.as_str().to_string()])
}

/// Registration request DTO
///
/// Every field is optional on the wire; presence is checked by
/// `validation::validate_registration`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub user_name: Option<String>,
    #[schema(example = "hunter2x")]
    pub password: Option<String>,
    #[schema(example = "hunter2x")]
    pub confirm_password: Option<String>,
    #[schema(example = "Alice")]
    pub first_name: Option<String>,
    #[schema(example = "Smith")]
    pub last_name: Option<String>,
}

/// Registration response DTO
///
/// `token` holds either the signed token or a `"Registration error: ..."`
/// message when validation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}
