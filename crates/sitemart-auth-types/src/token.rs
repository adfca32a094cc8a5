//! JWT access-token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_TO_ISSUE_TOKENS", test))]
use serde::Serialize;

use sitemart_domain::id::UserId;
use sitemart_domain::user::Role;

/// Verified identity carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Access-token claims.
///
/// | claim | meaning |
/// |-------|---------|
/// | `sub` | numeric user id, as a string |
/// | `email` | account email at issue time |
/// | `role` | `user` or `admin` |
/// | `exp` | expiry, seconds since UNIX epoch |
///
/// [`Serialize`] is only derived under `USE_ONLY_TO_ISSUE_TOKENS`: services
/// validate tokens, they never mint them.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_TO_ISSUE_TOKENS", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub exp: u64,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Malformed,
        }
    }
}

impl TryFrom<JwtClaims> for TokenInfo {
    type Error = AuthError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.sub.parse().map_err(|_| AuthError::Malformed)?,
            email: claims.email,
            role: claims.role,
            exp: claims.exp,
        })
    }
}

/// HS256 with `exp` and `sub` required. Default leeway (60s) covers clock
/// skew between the issuer and this service.
fn hs256_rules() -> Validation {
    let mut rules = Validation::new(Algorithm::HS256);
    rules.set_required_spec_claims(&["exp", "sub"]);
    rules
}

/// Validate an access token and return the identity it carries.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<JwtClaims>(token, &key, &hs256_rules())?;
    TokenInfo::try_from(data.claims)
}

/// Mint an access token. Only for the issuing service and test fixtures.
#[cfg(any(feature = "USE_ONLY_TO_ISSUE_TOKENS", test))]
pub fn issue_access_token(
    claims: &JwtClaims,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
}
