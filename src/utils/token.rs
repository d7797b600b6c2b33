use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::config::get_config;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;

/// Mint a short-lived HS256 bearer token for an admin account.
pub fn issue_admin_token(username: &str) -> Result<String> {
    let config = get_config();
    let expires_at = Utc::now() + Duration::minutes(config.access_token_ttl_minutes);
    let claims = Claims {
        sub: username.to_string(),
        exp: expires_at.timestamp() as usize,
        role: Some("admin".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|err| Error::Internal(format!("token signing failed: {}", err)))
}
