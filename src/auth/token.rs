use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::models::{Role, User};

/// Signed token claims. Stateless by design: once issued, a token stays
/// valid until `exp` passes; there is no revocation list and logout is a
/// client-side concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &User, auth: &AuthConfig) -> Self {
        let now = Utc::now();
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            iss: auth.issuer.clone(),
            sub: user.username.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(auth.jwt_expire_hours)).timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    Invalid(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "token generation error: {}", msg),
            TokenError::Invalid(msg) => write!(f, "invalid token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Sign a token for the given user. No side effects; last-login bookkeeping
/// is the caller's business.
pub fn issue_token(user: &User, auth: &AuthConfig) -> Result<String, TokenError> {
    let claims = Claims::new(user, auth);
    let encoding_key = EncodingKey::from_secret(auth.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Validate a token and return its claims. Pure function of
/// (token, secret, current time): rejects unexpected signing algorithms,
/// bad signatures, and tokens outside their [nbf, exp] window.
pub fn validate_token(token: &str, auth: &AuthConfig) -> Result<Claims, TokenError> {
    let decoding_key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_nbf = true;
    validation.set_issuer(&[&auth.issuer]);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
/// A missing Bearer prefix yields an empty string, not an error: callers
/// must treat that as "no credential supplied".
pub fn extract_bearer(header: &str) -> &str {
    header.strip_prefix("Bearer ").map(str::trim).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".into(),
            jwt_expire_hours: 24,
            issuer: "alumni-api".into(),
        }
    }

    fn user() -> User {
        User {
            id: 42,
            username: "budi".into(),
            email: "budi@example.com".into(),
            role: Role::User,
            is_deleted: false,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_validates_with_matching_claims() {
        let auth = auth_config();
        let token = issue_token(&user(), &auth).unwrap();
        let claims = validate_token(&token, &auth).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "budi");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, "alumni-api");
        assert_eq!(claims.sub, "budi");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = auth_config();
        let mut claims = Claims::new(&user(), &auth);
        claims.exp = Utc::now().timestamp() - 60;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &auth).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let auth = auth_config();
        let token = issue_token(&user(), &auth).unwrap();
        let mut tampered = token[..token.len() - 2].to_string();
        tampered.push_str("xx");

        assert!(validate_token(&tampered, &auth).is_err());
    }

    #[test]
    fn unexpected_signing_algorithm_is_rejected() {
        let auth = auth_config();
        let claims = Claims::new(&user(), &auth);
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &auth).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let auth = auth_config();
        let mut other = auth_config();
        other.issuer = "someone-else".into();
        let token = issue_token(&user(), &other).unwrap();

        assert!(validate_token(&token, &auth).is_err());
    }

    #[test]
    fn extract_bearer_handles_missing_prefix() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(extract_bearer("abc.def.ghi"), "");
        assert_eq!(extract_bearer(""), "");
        assert_eq!(extract_bearer("Basic dXNlcjpwYXNz"), "");
    }
}
