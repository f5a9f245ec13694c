//! JWT-based authentication extractors for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use kindred_core::error::CoreError;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::auth::ROLE_ADMIN;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(subject = %user.subject, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity provider's user id (from `claims.sub`).
    pub subject: String,
    /// The caller's role name.
    pub role: String,
}

impl AuthUser {
    /// Whether this caller counts as privileged for the maintenance gate.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Authenticate from request headers.
    pub fn from_headers(headers: &HeaderMap, config: &JwtConfig) -> Result<Self, AppError> {
        let auth_header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, config).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            subject: claims.sub,
            role: claims.role,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_headers(&parts.headers, &state.config.jwt)
    }
}

/// Caller identity for public endpoints whose answer depends on privilege.
///
/// Missing or invalid tokens yield `None` instead of a rejection.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthUser>);

impl OptionalAuth {
    pub fn is_privileged(&self) -> bool {
        self.0.as_ref().is_some_and(AuthUser::is_admin)
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(
            AuthUser::from_headers(&parts.headers, &state.config.jwt).ok(),
        ))
    }
}
