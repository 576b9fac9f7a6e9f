mod auth;
mod config;
mod db;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    AuthResponse, AuthService, PasswordService, RegisterRequest, SigningKey, TokenService,
    UserRepository,
};
use config::AppConfig;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(auth::handlers::register_handler),
    components(schemas(RegisterRequest, AuthResponse)),
    tags(
        (name = "auth", description = "User registration and token issuance")
    ),
    info(
        title = "Budget Auth API",
        version = "1.0.0",
        description = "Registers users and issues signed identity tokens"
    )
)]
struct ApiDoc;

/// CORS policy: one allowed origin, GET/POST/PUT/DELETE, any header
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Create the application router
fn create_router(auth_service: Arc<AuthService>, cors_origin: HeaderValue) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/auth/register", post(auth::register_handler))
        .layer(middleware::from_fn(auth::bearer_passthrough))
        .layer(cors_layer(cors_origin))
        .with_state(auth_service)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Budget Auth API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");
    tracing::debug!("Loaded configuration: {:?}", config);

    // The signing key is decoded once and shared read-only by every request
    let signing_key =
        SigningKey::from_base64_secret(&config.jwt_secret).expect("Failed to load JWT signing key");
    let token_service = Arc::new(TokenService::new(signing_key, config.token_validity_seconds));
    if token_service.validity_seconds() == auth::token::DEFAULT_VALIDITY_SECONDS {
        tracing::warn!(
            "Tokens expire {} seconds after issue; set JWT_EXPIRATION_SECONDS for a longer window",
            token_service.validity_seconds()
        );
    }
    let password_service =
        PasswordService::new(config.hash).expect("Invalid password hashing parameters");
    let cors_origin = HeaderValue::from_str(&config.cors_allowed_origin)
        .expect("CORS_ALLOWED_ORIGIN is not a valid header value");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let auth_service = Arc::new(AuthService::new(
        Arc::new(UserRepository::new(db_pool)),
        password_service,
        token_service,
    ));

    let app = create_router(auth_service, cors_origin);

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Budget Auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
