//! Authentication extractor
//!
//! Verifies the bearer token and captures who is acting and from where, so
//! every mutation can be attributed in the audit log.

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use unixify_core::Actor;

use crate::response::ApiError;
use crate::state::AppState;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const UNKNOWN_IP: &str = "unknown";

/// Authenticated caller extracted from the JWT and the connection
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
}

impl AuthUser {
    /// Audit attribution for this caller
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.username.clone(), self.ip_address.clone())
    }
}

/// First hop of `X-Forwarded-For`, else the peer socket address
fn client_ip(parts: &Parts) -> String {
    let forwarded = parts
        .headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_IP.to_string(), |ConnectInfo(addr)| addr.ip().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::from(e)
            })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid user ID in token");
            ApiError::from(e)
        })?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
            ip_address: client_ip(parts),
        })
    }
}
