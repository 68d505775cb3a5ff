use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// The signed-in user as seen by the navigation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// External capability answering "who is the current user".
///
/// Resolution may itself wait on session restoration; implementations must
/// answer only once that has fully completed, never from a half-restored
/// state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<AuthUser>, IdentityError>;
}

/// A provider with a fixed answer. Useful in tests and previews.
pub struct StaticIdentity(Option<AuthUser>);

impl StaticIdentity {
    pub fn signed_in(user: AuthUser) -> Self {
        Self(Some(user))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<Option<AuthUser>, IdentityError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone)]
enum SessionState {
    Restoring,
    Ready(Option<AuthUser>),
}

/// Session-backed provider. `current_user` waits until the session store
/// signals that restoration finished, then answers from the restored state.
/// Sign-in and sign-out after restoration flow through the same channel.
pub struct SessionIdentity {
    state: watch::Receiver<SessionState>,
}

impl SessionIdentity {
    /// Create a provider in the "restoring" state together with the handle
    /// the session store uses to drive it.
    pub fn restoring() -> (Self, SessionHandle) {
        let (tx, rx) = watch::channel(SessionState::Restoring);
        (Self { state: rx }, SessionHandle { tx })
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_user(&self) -> Result<Option<AuthUser>, IdentityError> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| matches!(s, SessionState::Ready(_)))
            .await
            .map_err(|_| IdentityError::Unavailable("session store dropped".to_string()))?;
        match &*state {
            SessionState::Ready(user) => Ok(user.clone()),
            SessionState::Restoring => Ok(None),
        }
    }
}

/// Write side of a [`SessionIdentity`], owned by the session store.
pub struct SessionHandle {
    tx: watch::Sender<SessionState>,
}

impl SessionHandle {
    /// Finish session restoration with whatever user (if any) was restored.
    pub fn restored(&self, user: Option<AuthUser>) {
        let _ = self.tx.send(SessionState::Ready(user));
    }

    pub fn sign_in(&self, user: AuthUser) {
        let _ = self.tx.send(SessionState::Ready(Some(user)));
    }

    pub fn sign_out(&self) {
        let _ = self.tx.send(SessionState::Ready(None));
    }
}
