pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config;

const MAX_TOKEN_MINUTES: u64 = 60 * 24 * 365;

/// Issues a token for `actor_id`, returning it with its RFC 3339 expiry.
pub fn generate_jwt(actor_id: &str) -> Result<(String, String), jsonwebtoken::errors::Error> {
    // Capped at a year so the expiry arithmetic cannot overflow.
    let minutes = config::jwt_duration_minutes().min(MAX_TOKEN_MINUTES) as i64;
    let expiry = Utc::now() + Duration::minutes(minutes);

    let claims = Claims {
        sub: actor_id.to_owned(),
        exp: usize::try_from(expiry.timestamp()).unwrap_or(usize::MAX),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
