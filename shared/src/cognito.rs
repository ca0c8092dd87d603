use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::types::{AuthFlowType, AuthenticationResultType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use crewdesk_atoms::{AuthError, AuthEvent, AuthProvider, Session};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::{broadcast, Mutex};

type HmacSha256 = Hmac<Sha256>;

/// `SECRET_HASH` for app clients with a secret:
/// base64(HMAC-SHA256(secret, username + client_id)).
pub fn secret_hash(
    client_secret: &str,
    username: &str,
    client_id: &str,
) -> Result<String, AuthError> {
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .map_err(|e| AuthError::Provider(format!("invalid client secret: {}", e)))?;
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Default)]
struct Signed {
    session: Option<Session>,
    username: Option<String>,
}

/// Cognito user-pool sign-in with automatic token refresh.
pub struct CognitoAuth {
    client: CognitoClient,
    client_id: String,
    client_secret: Option<String>,
    state: Mutex<Signed>,
    events: broadcast::Sender<AuthEvent>,
}

impl CognitoAuth {
    pub fn new(
        client: CognitoClient,
        client_id: impl Into<String>,
        client_secret: Option<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            client,
            client_id: client_id.into(),
            client_secret,
            state: Mutex::new(Signed::default()),
            events,
        }
    }

    fn with_secret_hash(
        &self,
        params: &mut Vec<(&'static str, String)>,
        username: &str,
    ) -> Result<(), AuthError> {
        if let Some(secret) = &self.client_secret {
            params.push(("SECRET_HASH", secret_hash(secret, username, &self.client_id)?));
        }
        Ok(())
    }

    async fn initiate(
        &self,
        flow: AuthFlowType,
        params: Vec<(&'static str, String)>,
    ) -> Result<AuthenticationResultType, AuthError> {
        let mut request = self
            .client
            .initiate_auth()
            .client_id(&self.client_id)
            .auth_flow(flow);
        for (key, value) in params {
            request = request.auth_parameters(key, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Rejected(format!("Cognito initiate_auth error: {}", e)))?;

        if let Some(challenge) = response.challenge_name() {
            return Err(AuthError::Rejected(format!(
                "unsupported challenge {}",
                challenge.as_str()
            )));
        }
        response
            .authentication_result()
            .cloned()
            .ok_or_else(|| AuthError::Provider("no authentication result".into()))
    }

    async fn user_id(&self, access_token: &str) -> Result<String, AuthError> {
        let user = self
            .client
            .get_user()
            .access_token(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Cognito get_user error: {}", e)))?;

        let sub = user
            .user_attributes()
            .iter()
            .find(|attr| attr.name() == "sub")
            .and_then(|attr| attr.value())
            .map(str::to_string);
        Ok(sub.unwrap_or_else(|| user.username().to_string()))
    }

    fn session_from(
        user_id: String,
        result: &AuthenticationResultType,
        previous_refresh: Option<String>,
    ) -> Result<Session, AuthError> {
        let access_token = result
            .access_token()
            .ok_or_else(|| AuthError::Provider("no access token".into()))?;
        Ok(Session {
            user_id,
            access_token: access_token.to_string(),
            refresh_token: result.refresh_token().map(str::to_string).or(previous_refresh),
            expires_at: Some(Utc::now() + Duration::seconds(i64::from(result.expires_in()))),
        })
    }

    /// Password sign-in. Emits `SignedIn` on success.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let mut params = vec![
            ("USERNAME", username.to_string()),
            ("PASSWORD", password.to_string()),
        ];
        self.with_secret_hash(&mut params, username)?;

        let result = self.initiate(AuthFlowType::UserPasswordAuth, params).await?;
        let access_token = result
            .access_token()
            .ok_or_else(|| AuthError::Provider("no access token".into()))?;
        let user_id = self.user_id(access_token).await?;
        let session = Self::session_from(user_id, &result, None)?;

        let mut state = self.state.lock().await;
        state.session = Some(session.clone());
        state.username = Some(username.to_string());
        drop(state);

        tracing::info!(user_id = %session.user_id, "signed in");
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn refresh(&self, expired: &Session, username: &str) -> Result<Session, AuthError> {
        let refresh_token = expired.refresh_token.clone().ok_or(AuthError::Expired)?;
        let mut params = vec![("REFRESH_TOKEN", refresh_token.clone())];
        self.with_secret_hash(&mut params, username)?;

        let result = self.initiate(AuthFlowType::RefreshTokenAuth, params).await?;
        Self::session_from(expired.user_id.clone(), &result, Some(refresh_token))
    }
}

#[async_trait]
impl AuthProvider for CognitoAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let mut state = self.state.lock().await;
        let Some(session) = state.session.clone() else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now()) {
            return Ok(Some(session));
        }

        let username = state.username.clone().unwrap_or_else(|| session.user_id.clone());
        match self.refresh(&session, &username).await {
            Ok(refreshed) => {
                tracing::info!(user_id = %refreshed.user_id, "token refreshed");
                state.session = Some(refreshed.clone());
                let _ = self.events.send(AuthEvent::TokenRefreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            Err(err) => {
                tracing::warn!("session refresh failed: {}", err);
                *state = Signed::default();
                let _ = self.events.send(AuthEvent::SignedOut);
                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let signed = std::mem::take(&mut *self.state.lock().await);
        let _ = self.events.send(AuthEvent::SignedOut);

        let Some(session) = signed.session else {
            return Ok(());
        };
        self.client
            .global_sign_out()
            .access_token(&session.access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Cognito global_sign_out error: {}", e)))?;
        tracing::info!(user_id = %session.user_id, "signed out");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_hash_matches_cognito_formula() {
        assert_eq!(
            secret_hash("shh", "alice", "client-123").unwrap(),
            "ugAHGR1wqiu5qhRWRrfdD660lFPs1JrwDpbj1JInPCg="
        );
    }

    #[test]
    fn session_keeps_previous_refresh_token() {
        let result = AuthenticationResultType::builder()
            .access_token("access")
            .expires_in(3600)
            .build();
        let session =
            CognitoAuth::session_from("sub-1".into(), &result, Some("refresh".into())).unwrap();
        assert_eq!(session.user_id, "sub-1");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn missing_access_token_is_a_provider_error() {
        let result = AuthenticationResultType::builder().build();
        assert!(matches!(
            CognitoAuth::session_from("sub-1".into(), &result, None),
            Err(AuthError::Provider(_))
        ));
    }
}
