use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Authenticated user context required by every data operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Where the UI should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    /// External authentication entry point.
    SignIn,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication request failed: {0}")]
    Provider(String),

    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("session expired")]
    Expired,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current session, refreshing it first if the provider can.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Fires on sign-in, sign-out and token refresh.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// In-process auth provider holding one session.
pub struct LocalAuth {
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for LocalAuth {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session: Mutex::new(None),
            events,
        }
    }
}

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: &str) -> Self {
        let auth = Self::default();
        auth.sign_in(user_id);
        auth
    }

    pub fn sign_in(&self, user_id: &str) -> Session {
        let session = Session {
            user_id: user_id.to_string(),
            access_token: uuid::Uuid::new_v4().to_string(),
            refresh_token: None,
            expires_at: None,
        };
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        // No subscribers is fine.
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        session
    }

    /// Drops the session as if it had lapsed at the provider.
    pub fn expire(&self) {
        self.session.lock().unwrap_or_else(|e| e.into_inner()).take();
        let _ = self.events.send(AuthEvent::SignedOut);
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.session.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.expire();
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_and_out_emit_events() {
        let auth = LocalAuth::new();
        let mut rx = auth.subscribe();

        let session = auth.sign_in("user-1");
        assert_eq!(rx.recv().await.unwrap(), AuthEvent::SignedIn(session.clone()));
        assert_eq!(auth.current_session().await.unwrap(), Some(session));

        auth.sign_out().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), AuthEvent::SignedOut);
        assert_eq!(auth.current_session().await.unwrap(), None);
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc::now();
        let session = Session {
            user_id: "u".into(),
            access_token: "t".into(),
            refresh_token: None,
            expires_at: Some(now),
        };
        assert!(session.is_expired(now));
    }
}
