// Authentication service - business logic layer

use serde_json::Map;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{authorities, AuthResponse, NewUser, RegisterRequest, Role},
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
    validation::{validate_registration, RegistrationError},
};

/// Prefix of the message returned in place of a token when validation fails
pub const REGISTRATION_ERROR_PREFIX: &str = "Registration error: ";

/// Authentication service coordinating registration
pub struct AuthService {
    store: Arc<dyn UserStore>,
    password_service: PasswordService,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        password_service: PasswordService,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            password_service,
            token_service,
        }
    }

    /// Register a new user
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Hashes the password off the async executor
    /// 3. Stores the user with role USER
    /// 4. Issues a token for the stored username
    ///
    /// A validation failure is not an `Err`: the reason is returned in the
    /// `token` field, prefixed with `"Registration error: "`.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let registration = match validate_registration(request) {
            Ok(registration) => registration,
            Err(reason) => {
                debug!("Registration rejected: {}", reason);
                return Ok(rejected(&reason));
            }
        };

        let password_hash = self.hash_password(registration.password).await?;

        let new_user = NewUser {
            id: Uuid::new_v4(),
            user_name: registration.user_name,
            first_name: registration.first_name,
            last_name: registration.last_name,
            password_hash,
            role: Role::User,
        };

        let user = self.store.create_user(new_user).await?;
        let token = self.token_service.issue(&user.user_name, Map::new())?;

        info!(
            "Registered user {} (id={}, authorities={:?})",
            user.user_name,
            user.id,
            authorities(&user)
        );

        Ok(AuthResponse { token })
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.password_service.clone();

        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHashError(format!("hashing task failed: {}", e)))?
    }
}

fn rejected(reason: &RegistrationError) -> AuthResponse {
    AuthResponse {
        token: format!("{}{}", REGISTRATION_ERROR_PREFIX, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::HashSettings;
    use crate::auth::repository::InMemoryUserStore;
    use crate::auth::token::tests::test_token_service;

    fn fast_password_service() -> PasswordService {
        PasswordService::new(HashSettings {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn test_service() -> (AuthService, Arc<InMemoryUserStore>, Arc<TokenService>) {
        let store = Arc::new(InMemoryUserStore::default());
        let tokens = Arc::new(test_token_service());
        let service = AuthService::new(store.clone(), fast_password_service(), tokens.clone());
        (service, store, tokens)
    }

    fn request(user: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            user_name: Some(user.to_string()),
            password: Some(password.to_string()),
            confirm_password: Some(confirm.to_string()),
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_success_issues_token_for_username() {
        let (service, store, tokens) = test_service();

        let response = service.register(request("alice", "hunter2x", "hunter2x")).await.unwrap();
        let claims = tokens.verify(&response.token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, store, _) = test_service();
        service.register(request("alice", "hunter2x", "hunter2x")).await.unwrap();

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(user.password, "hunter2x");
        assert!(fast_password_service().verify_password("hunter2x", &user.password).unwrap());
        assert_eq!(user.role, Role::User);
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.last_name, "Smith");
    }

    #[tokio::test]
    async fn test_each_user_gets_fresh_id() {
        let (service, store, _) = test_service();
        service.register(request("alice", "hunter2x", "hunter2x")).await.unwrap();
        service.register(request("bob", "hunter2x", "hunter2x")).await.unwrap();

        let alice = store.find_by_username("alice").await.unwrap().unwrap();
        let bob = store.find_by_username("bob").await.unwrap().unwrap();
        assert_ne!(alice.id, bob.id);
    }

    #[tokio::test]
    async fn test_validation_failure_is_error_payload() {
        let (service, store, _) = test_service();

        let response = service.register(request("", "x", "x")).await.unwrap();

        assert_eq!(response.token, "Registration error: username must not be empty");
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_short_password_not_persisted() {
        let (service, store, _) = test_service();

        let response = service.register(request("alice", "abcde", "abcde")).await.unwrap();

        assert_eq!(response.token, "Registration error: password must be at least 6 characters");
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_mismatch_not_persisted() {
        let (service, store, _) = test_service();

        let response = service.register(request("alice", "secret1", "secret2")).await.unwrap();

        assert_eq!(response.token, "Registration error: passwords do not match");
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_every_missing_field_reported() {
        let (service, store, _) = test_service();
        let cases = [
            (
                RegisterRequest { user_name: None, ..request("alice", "hunter2x", "hunter2x") },
                "username must not be empty",
            ),
            (
                RegisterRequest { password: None, ..request("alice", "hunter2x", "hunter2x") },
                "password must not be empty",
            ),
            (
                RegisterRequest { first_name: None, ..request("alice", "hunter2x", "hunter2x") },
                "first name must not be empty",
            ),
            (
                RegisterRequest { last_name: Some(String::new()), ..request("alice", "hunter2x", "hunter2x") },
                "last name must not be empty",
            ),
        ];

        for (req, reason) in cases {
            let response = service.register(req).await.unwrap();
            assert_eq!(response.token, format!("{}{}", REGISTRATION_ERROR_PREFIX, reason));
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (service, store, _) = test_service();

        service.register(request("alice", "hunter2x", "hunter2x")).await.unwrap();
        let second = service.register(request("alice", "another1", "another1")).await;

        assert!(matches!(second, Err(AuthError::UsernameAlreadyExists)));
        assert_eq!(store.len().await, 1);

        // the original credential is untouched
        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert!(fast_password_service().verify_password("hunter2x", &user.password).unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_only_one_wins() {
        let (service, store, _) = test_service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.register(request("carol", "hunter2x", "hunter2x")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }
}
