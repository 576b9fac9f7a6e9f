// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, RegisterRequest},
    service::AuthService,
};

/// Register a new user
/// POST /auth/register
///
/// Always answers 200 for validation failures; the reason is carried in `token`.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Signed token, or a \"Registration error: ...\" message", body = AuthResponse),
        (status = 409, description = "Username already exists", body = String, example = json!({"error": "Username already exists"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error"}))
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    tracing::debug!("Registration request for {:?}", request.user_name);

    let response = service.register(request).await?;
    Ok(Json(response))
}
