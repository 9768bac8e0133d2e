// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::user::User};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject - the user id.
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Expiration time as Unix timestamp (seconds).
    pub exp: u64,
}

pub fn unix_now() -> Result<u64, AppError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_seconds: u64,
}

impl TokenSigner {
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
        }
    }

    /// Signs a token for `user` valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.issue_until(user, unix_now()? + self.expiration_seconds)
    }

    /// Signs a token for `user` expiring at `exp` (Unix seconds).
    pub fn issue_until(&self, user: &User, exp: u64) -> Result<String, AppError> {
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// The signature is checked before the expiry, so a correctly signed but
    /// stale token is `ExpiredToken` and never `InvalidToken`. Expiry has no
    /// leeway: a token is dead from the second `exp` is reached.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AppError::InvalidToken)?;

        if unix_now()? >= token_data.claims.exp {
            return Err(AppError::ExpiredToken);
        }

        Ok(token_data.claims)
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication.
///
/// Validates the bearer header and injects `Claims` into the request
/// extensions. Missing, invalid or expired tokens end the request with 401.
pub async fn require_auth(
    State(tokens): State<TokenSigner>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::InvalidToken)?;
    let claims = tokens.verify(token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Extractor for the authenticated caller.
///
/// Reuses the claims left by `require_auth` when present, otherwise verifies
/// the header itself. Use `Option<AuthUser>` where a token is optional.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub claims: Claims,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            claims,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenSigner: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(AuthUser::from(claims.clone()));
        }

        let token = bearer_token(&parts.headers).ok_or(AppError::InvalidToken)?;
        let claims = TokenSigner::from_ref(state).verify(token)?;
        Ok(AuthUser::from(claims))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    TokenSigner: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
