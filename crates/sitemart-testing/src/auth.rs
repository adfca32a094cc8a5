//! Mock auth helpers for integration tests.
//!
//! Services verify `Authorization: Bearer <jwt>` themselves. `MockAuth` mints
//! a valid token for a chosen identity so tests never need the real issuer.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use sitemart_auth_types::token::{JwtClaims, issue_access_token};
use sitemart_domain::id::UserId;
use sitemart_domain::user::Role;

/// Secret shared by test state and `MockAuth` unless overridden.
pub const TEST_JWT_SECRET: &str = "sitemart-test-secret";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id: UserId(user_id),
            email: format!("user{user_id}@example.com"),
            role: Role::User,
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    pub fn admin(mut self) -> Self {
        self.role = Role::Admin;
        self
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_owned();
        self
    }

    /// Signed access token valid for one hour.
    pub fn token(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = JwtClaims {
            sub: self.user_id.to_string(),
            email: self.email.clone(),
            role: self.role,
            exp: now + 3600,
        };
        issue_access_token(&claims, &self.secret).unwrap()
    }

    /// `Authorization` header value for this identity.
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap()
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.bearer());
        map
    }
}
