//! Bearer authentication and role guards.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use jobportal::{AuthError, LifecycleError, Principal, PrincipalKind};

use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::InvalidCredential)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AuthError::InvalidCredential)?;
    Ok(token.trim().to_string())
}

/// Resolves the bearer credential and attaches the [`Principal`] to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("token missing, authentication denied");
            return Err(e.into());
        }
    };

    let tokens = Arc::clone(&state.tokens);
    let principal = tokio::task::spawn_blocking(move || tokens.resolve(&token)).await??;

    tracing::debug!(principal = %principal, "authenticated");
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn require(principal: &Principal, kind: PrincipalKind) -> Result<(), ApiError> {
    if principal.kind() != kind {
        return Err(LifecycleError::Forbidden.into());
    }
    Ok(())
}

pub async fn require_company(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require(&principal, PrincipalKind::Company)?;
    Ok(next.run(request).await)
}

pub async fn require_user(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require(&principal, PrincipalKind::User)?;
    Ok(next.run(request).await)
}
