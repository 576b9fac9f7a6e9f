// JWT token signing and verification

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validity window used by the legacy backend, in milliseconds (24 seconds).
pub const LEGACY_VALIDITY_MILLIS: i64 = 1000 * 60 * 24;

/// Default validity window in seconds, equal to the legacy window.
pub const DEFAULT_VALIDITY_SECONDS: i64 = LEGACY_VALIDITY_MILLIS / 1000;

const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub iat: i64,    // issued at, unix seconds
    pub exp: i64,    // expiration, unix seconds
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HMAC-SHA256 key material, decoded once from a base64 secret
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_base64_secret(secret: &str) -> Result<Self, AuthError> {
        let encoding = EncodingKey::from_base64_secret(secret)
            .map_err(|e| AuthError::ConfigError(format!("JWT_SECRET is not valid base64: {}", e)))?;
        let decoding = DecodingKey::from_base64_secret(secret)
            .map_err(|e| AuthError::ConfigError(format!("JWT_SECRET is not valid base64: {}", e)))?;

        Ok(Self { encoding, decoding })
    }
}

/// Token service for JWT operations
///
/// Built once at startup and shared read-only between requests.
pub struct TokenService {
    key: SigningKey,
    validity_seconds: i64,
    header: Header,
    validation: Validation,
}

impl TokenService {
    pub fn new(key: SigningKey, validity_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // `aud` is an ordinary extra claim here, not an audience restriction
        validation.validate_aud = false;

        Self {
            key,
            validity_seconds,
            header: Header::new(Algorithm::HS256),
            validation,
        }
    }

    pub fn validity_seconds(&self) -> i64 {
        self.validity_seconds
    }

    /// Sign a token for `subject` with explicit timestamps (unix seconds).
    ///
    /// Entries of `extra_claims` named `sub`, `iat` or `exp` are dropped.
    pub fn sign(
        &self,
        subject: &str,
        mut extra_claims: Map<String, Value>,
        issued_at: i64,
        expires_at: i64,
    ) -> Result<String, AuthError> {
        for reserved in RESERVED_CLAIMS {
            extra_claims.remove(reserved);
        }

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: expires_at,
            extra: extra_claims,
        };

        encode(&self.header, &claims, &self.key.encoding)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Sign a token valid from now for the configured window
    pub fn issue(&self, subject: &str, extra_claims: Map<String, Value>) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        self.sign(subject, extra_claims, now, now + self.validity_seconds)
    }

    /// Check the signature and expiry of a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}
