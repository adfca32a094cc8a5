//! Authenticated-caller extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sitemart_core::error::AppError;
use sitemart_domain::id::UserId;
use sitemart_domain::user::Role;

use crate::token::validate_access_token;

/// HMAC secret used to verify access tokens. Exposed to the extractor through
/// `FromRef` on the service state.
#[derive(Clone)]
pub struct JwtSecret(pub String);

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

/// The caller behind an `Authorization: Bearer <jwt>` header.
///
/// Rejects with 401 when the header is missing, is not a bearer credential,
/// or carries a token that fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for Principal
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    // Validation is synchronous; resolve before the returned future so it
    // does not borrow `parts` or `state`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = match bearer_token(parts) {
            None => Err(AppError::Unauthorized),
            Some(token) => validate_access_token(token, &secret.0)
                .map(|info| Self {
                    user_id: info.user_id,
                    email: info.email,
                    role: info.role,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "access token rejected");
                    AppError::Unauthorized
                }),
        };

        async move { result }
    }
}
