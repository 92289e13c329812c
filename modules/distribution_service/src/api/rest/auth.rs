//! Request authentication for REST handlers

use super::error::{map_domain_error, Problem};
use crate::contract::AuthContext;
use crate::domain::Service;
use crate::infra::auth::JwtVerifier;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

/// Authenticated caller, resolved from the bearer token and the caller's
/// stored profile
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (Some(verifier), Some(service)) = (
            parts.extensions.get::<Arc<JwtVerifier>>().cloned(),
            parts.extensions.get::<Arc<Service>>().cloned(),
        ) else {
            tracing::error!("auth extensions missing from router");
            return Err(map_domain_error(crate::contract::DistributionError::Internal));
        };

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let identity = verifier.verify_header(header).map_err(map_domain_error)?;
        let context = service
            .resolve_caller(identity.user_id, identity.email)
            .await
            .map_err(map_domain_error)?;

        tracing::debug!(user_id = %context.user_id, role = %context.role, "authenticated request");
        Ok(Caller(context))
    }
}
