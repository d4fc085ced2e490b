use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // User ID
    pub iat: i64,   // Issued at
    pub exp: usize, // Expiration timestamp
}

/// Sign a new token for a user, valid for `ttl`.
pub fn sign(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("token lifetime overflows the clock"))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify the signature and expiry of a token and decode its claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
