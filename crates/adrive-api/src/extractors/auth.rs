//! `AuthUser` extractor: pulls the JWT from the Authorization header,
//! verifies it, and injects the request context.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use adrive_core::error::AppError;
use adrive_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
///
/// The context's cancellation token fires when the last clone of this
/// value is dropped, which happens when the handler finishes or its
/// future is abandoned by a disconnect or the request timeout.
#[derive(Debug, Clone)]
pub struct AuthUser {
    ctx: RequestContext,
    _cancel_on_drop: Arc<DropGuard>,
}

impl AuthUser {
    /// Wraps a context, tying its cancellation to the lifetime of the extractor.
    pub fn new(ctx: RequestContext) -> Self {
        let cancel = CancellationToken::new();
        Self {
            ctx: ctx.with_cancellation(cancel.clone()),
            _cancel_on_drop: Arc::new(cancel.drop_guard()),
        }
    }

    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.token_verifier.verify(token.trim())?;

        debug!(
            user_id = claims.sub,
            role = %claims.role,
            username = %claims.username,
            "Request authenticated"
        );
        let ctx = RequestContext::new(claims.user_id(), claims.role, claims.username);
        Ok(AuthUser::new(ctx))
    }
}
