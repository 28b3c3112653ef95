use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;
use auth::Principal;

/// Bearer credential from the Authorization header. The literal `Bearer `
/// prefix is stripped when present; a raw token is accepted as-is.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

/// Boundary filter in front of every protected route: verify the bearer
/// token and attach the resulting [`Principal`] to the request, or reject
/// with 401 before any handler runs. No other side effects.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let principal = state
        .auth_service
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid token"))?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extractor for the principal attached by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(ErrorResponse {
                        error: "Not authenticated".to_string(),
                    }),
                )
            })
    }
}
