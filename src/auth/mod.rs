// Authentication module
// User registration with argon2 password hashing and JWT issuance

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use handlers::register_handler;
pub use middleware::bearer_passthrough;
pub use models::{AuthResponse, RegisterRequest};
pub use password::PasswordService;
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::{SigningKey, TokenService};
