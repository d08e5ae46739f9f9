use std::time::Duration;

use ring::digest;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::Config;
use crate::models::{Resource, Role, UserProfile};
use crate::services::{ApiClient, ApiError, QueryCache};

/// Session keys used in the application
pub const SESSION_KEY_TOKEN: &str = "credit_transfer_token";
pub const SESSION_KEY_USER: &str = "user_info";

/// Creates a session layer for Axum
pub fn create_session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    let session_store = MemoryStore::default();

    SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            config.session_idle_hours,
        )))
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: ApiClient,
    pub cache: QueryCache,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = ApiClient::new(&config.api_base_url);
        let cache = QueryCache::new(
            config.query_cache_capacity,
            Duration::from_secs(config.query_stale_secs),
        );

        Self {
            config,
            client,
            cache,
        }
    }

    /// Cached read of `path` under `query_key` for this session
    pub async fn query<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        query_key: &str,
        path: &str,
    ) -> Result<T, ApiError> {
        let client = &self.client;
        let token = ctx.token();
        self.cache
            .fetch(ctx.scope(), query_key, move || {
                client.get::<serde_json::Value>(path, Some(token))
            })
            .await
    }

    /// Full list of an entity, served from the query cache when fresh
    pub async fn list<R: Resource>(&self, ctx: &SessionContext) -> Result<Vec<R>, ApiError> {
        let schema = R::schema();
        self.query(ctx, schema.query_key, schema.endpoint).await
    }

    pub async fn invalidate(&self, ctx: &SessionContext, query_key: &str) {
        self.cache.invalidate(ctx.scope(), query_key).await;
    }
}

/// Credentials and profile of the signed-in user, loaded from the session
/// store by the auth guard and handed to every protected handler.
#[derive(Clone)]
pub struct SessionContext {
    token: SecretString,
    user: Option<UserProfile>,
    scope: String,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.user)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(token: String, user: Option<UserProfile>) -> Self {
        let scope = cache_scope(&token);
        Self {
            token: SecretString::new(token),
            user,
            scope,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Key prefix isolating this session's cached queries
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Role of the cached profile; sessions without a profile act as `user`
    pub fn role(&self) -> Role {
        self.user.as_ref().map(|u| u.role).unwrap_or_default()
    }

    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.shown_name().to_string())
            .unwrap_or_default()
    }

    /// Reads the context back from the session, `None` when nobody is signed in
    pub async fn load(session: &Session) -> Result<Option<Self>, tower_sessions::session::Error> {
        let token: Option<String> = session.get(SESSION_KEY_TOKEN).await?;
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let user: Option<UserProfile> = session.get(SESSION_KEY_USER).await?;

        Ok(Some(Self::new(token, user)))
    }

    /// Stores the context after a successful login under a fresh session id
    pub async fn persist(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.cycle_id().await?;
        session
            .insert(SESSION_KEY_TOKEN, self.token.expose_secret())
            .await?;
        session.insert(SESSION_KEY_USER, &self.user).await?;
        Ok(())
    }

    pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.flush().await
    }
}

fn cache_scope(token: &str) -> String {
    let digest = digest::digest(&digest::SHA256, token.as_bytes());
    hex::encode(&digest.as_ref()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_is_stable_and_token_free() {
        let a = SessionContext::new("t1".to_string(), None);
        let b = SessionContext::new("t1".to_string(), None);
        let c = SessionContext::new("t2".to_string(), None);

        assert_eq!(a.scope(), b.scope());
        assert_ne!(a.scope(), c.scope());
        assert_eq!(a.scope().len(), 32);
        assert!(!a.scope().contains("t1"));
    }

    #[test]
    fn test_role_defaults_to_user_without_profile() {
        let ctx = SessionContext::new("t1".to_string(), None);
        assert_eq!(ctx.role(), Role::User);
        assert_eq!(ctx.display_name(), "");
    }

    #[test]
    fn test_debug_output_hides_token() {
        let ctx = SessionContext::new("very-secret".to_string(), None);
        assert!(!format!("{:?}", ctx).contains("very-secret"));
    }
}
