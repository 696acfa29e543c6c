//! Query string extractors
//!
//! Typed query parameters for listing, identifier checks and the audit log.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use unixify_core::{AuditAction, AuditEntityType, AuditQuery};

use crate::response::ApiError;

/// Query string deserialized into `T`, rejected as `INVALID_QUERY_PARAMETER`
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(inner) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(QueryParams(inner))
    }
}

/// `?type=&q=` for account and group listings
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, rename = "type")]
    pub identity_type: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl ListParams {
    /// Search term, if one was given
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// `?type=` (required)
#[derive(Debug, Deserialize)]
pub struct TypeParams {
    #[serde(rename = "type")]
    pub identity_type: String,
}

/// `?uid=&exclude_id=`
#[derive(Debug, Deserialize)]
pub struct UidCheckParams {
    pub uid: i64,
    #[serde(default)]
    pub exclude_id: i64,
}

/// `?gid=&exclude_id=`
#[derive(Debug, Deserialize)]
pub struct GidCheckParams {
    pub gid: i64,
    #[serde(default)]
    pub exclude_id: i64,
}

/// `?uid=&type=`
#[derive(Debug, Deserialize)]
pub struct UidValidateParams {
    pub uid: i64,
    #[serde(rename = "type")]
    pub identity_type: String,
}

/// `?gid=&type=`
#[derive(Debug, Deserialize)]
pub struct GidValidateParams {
    pub gid: i64,
    #[serde(rename = "type")]
    pub identity_type: String,
}

/// Raw audit log query parameters
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl TryFrom<AuditLogParams> for AuditQuery {
    type Error = ApiError;

    fn try_from(params: AuditLogParams) -> Result<Self, Self::Error> {
        let entity_type = params
            .entity_type
            .map(|s| {
                s.parse::<AuditEntityType>()
                    .map_err(|e| ApiError::invalid_query(e.to_string()))
            })
            .transpose()?;

        let action = params
            .action
            .map(|s| {
                s.parse::<AuditAction>()
                    .map_err(|e| ApiError::invalid_query(e.to_string()))
            })
            .transpose()?;

        Ok(AuditQuery {
            entity_type,
            action,
            entity_id: params.entity_id,
            user_id: params.user_id,
            limit: params.limit.unwrap_or(AuditQuery::DEFAULT_LIMIT),
            offset: params.offset.unwrap_or(0),
        }
        .normalized())
    }
}

/// Validated audit log filter
#[derive(Debug, Clone)]
pub struct AuditFilter(pub AuditQuery);

#[async_trait]
impl<S> FromRequestParts<S> for AuditFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let QueryParams(params) =
            QueryParams::<AuditLogParams>::from_request_parts(parts, state).await?;

        AuditQuery::try_from(params).map(AuditFilter)
    }
}
