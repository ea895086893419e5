//! Bearer-token and role extraction
//!
//! Every `/api/v1` call carries `Authorization: Bearer <token>` plus an
//! `X-Role` header. Token issuance lives elsewhere; this layer only checks
//! the credential against the configured shared token (when one is set)
//! and parses the role for per-route gating.

use super::types::ErrorResponse;
use super::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Caller role, from the `X-Role` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleName {
    Admin,
    Manager,
    User,
}

impl RoleName {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(RoleName::Admin),
            "manager" => Some(RoleName::Manager),
            "user" => Some(RoleName::User),
            _ => None,
        }
    }

    /// Whether this role may create or modify transfers.
    pub fn can_manage_transfers(self) -> bool {
        matches!(self, RoleName::Admin | RoleName::Manager)
    }
}

/// Authenticated request context.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub role: RoleName,
}

/// Rejection carrying the conventional `detail` body.
pub struct AuthRejection {
    status: StatusCode,
    detail: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.detail))).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                detail: "Falta la credencial Bearer",
            })?;

        let token_ok = match state.api_token.as_deref() {
            Some(expected) => bearer.token() == expected,
            None => !bearer.token().is_empty(),
        };
        if !token_ok {
            return Err(AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                detail: "Credencial inválida",
            });
        }

        let role = parts
            .headers
            .get("x-role")
            .and_then(|v| v.to_str().ok())
            .and_then(RoleName::parse)
            .ok_or(AuthRejection {
                status: StatusCode::FORBIDDEN,
                detail: "Cabecera X-Role ausente o desconocida",
            })?;

        Ok(AuthContext { role })
    }
}
