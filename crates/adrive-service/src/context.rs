//! Request context carrying the authenticated user and the request's cancellation token.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use adrive_core::types::UserId;
use adrive_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API layer from verified token claims and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// The username (convenience field from token claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    /// Cancelled when the caller goes away or the request times out.
    pub cancel: CancellationToken,
}

impl RequestContext {
    /// Creates a new request context with a fresh cancellation token.
    pub fn new(user_id: UserId, role: UserRole, username: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            username: username.into(),
            request_time: Utc::now(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Whether the caller has gone away.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
