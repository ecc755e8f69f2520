#[cfg(test)]
mod tests {
    use api::auth::claims::{AuthUser, Claims};
    use axum::{
        extract::FromRequestParts,
        http::{Request, StatusCode},
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};
    use util::config;
    use util::test_helpers::setup_test_env;

    fn generate_token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    fn claims(sub: &str, offset_secs: i64) -> Claims {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        Claims {
            sub: sub.into(),
            exp: (now + offset_secs) as usize,
        }
    }

    async fn extract(token: Option<String>) -> Result<AuthUser, (StatusCode, &'static str)> {
        let mut builder = Request::builder();
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn valid_token_yields_actor() {
        setup_test_env();
        let token = generate_token(&claims("kiosk-7", 3600), &config::jwt_secret());

        let user = extract(Some(token)).await.unwrap();
        assert_eq!(user.actor(), "kiosk-7");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        setup_test_env();
        let token = generate_token(&claims("kiosk-7", 3600), "wrong_secret");

        let (status, message) = extract(Some(token)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        setup_test_env();
        let token = generate_token(&claims("kiosk-7", -3600), &config::jwt_secret());

        let (status, message) = extract(Some(token)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (status, message) = extract(None).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Missing or invalid Authorization header");
    }
}
