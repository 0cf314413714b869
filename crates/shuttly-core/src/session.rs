// ── Authentication session ──
//
// Holds the current user and drives the token lifecycle: rehydrate
// once at startup from durable storage, login after an auth exchange,
// logout (voluntary or forced by a 401). The bearer token itself lives
// on the `ApiClient`; durable persistence sits behind `TokenStore`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{debug, warn};

use shuttly_api::ApiClient;

use crate::error::CoreError;
use crate::model::{Role, User};

/// Durable storage for the bearer token -- the only client state that
/// survives a restart. Implemented in `shuttly-config` (env var →
/// keyring → token file) and by in-memory fakes in tests.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<SecretString>;
    fn store(&self, token: &SecretString) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// The one network call the session makes: resolve a token to its user.
#[async_trait]
pub trait IdentityServices: Send + Sync {
    async fn current_user(&self) -> Result<User, CoreError>;
}

/// Process-wide session state, read by every gated command.
pub struct AuthSession {
    store: Arc<dyn TokenStore>,
    user: Option<User>,
}

impl AuthSession {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store, user: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Startup rehydration: if a token is persisted, install it on the
    /// client and resolve it to a user. Any failure -- expired token,
    /// network error, whatever -- clears the persisted token and
    /// leaves the session unauthenticated. Runs once; there is no
    /// periodic re-validation.
    pub async fn rehydrate(
        &mut self,
        client: &ApiClient,
        identity: &dyn IdentityServices,
    ) -> Result<bool, CoreError> {
        let Some(token) = self.store.load() else {
            debug!("no persisted token; starting unauthenticated");
            return Ok(false);
        };

        client.set_token(token);
        match identity.current_user().await {
            Ok(user) => {
                debug!(user_id = %user.id, "session rehydrated");
                self.user = Some(user);
                Ok(true)
            }
            Err(err) => {
                warn!("persisted token rejected: {err}");
                client.clear_token();
                if let Err(clear_err) = self.store.clear() {
                    warn!("failed to clear stale token: {clear_err}");
                }
                self.user = None;
                Ok(false)
            }
        }
    }

    /// Become authenticated with credentials from a completed auth
    /// exchange. Persists the token; no network call.
    pub fn login(
        &mut self,
        client: &ApiClient,
        token: SecretString,
        user: User,
    ) -> Result<(), CoreError> {
        self.store.store(&token)?;
        client.set_token(token);
        debug!(user_id = %user.id, "logged in");
        self.user = Some(user);
        Ok(())
    }

    /// Clear the persisted token and in-memory user.
    pub fn logout(&mut self, client: &ApiClient) -> Result<(), CoreError> {
        self.store.clear()?;
        client.clear_token();
        self.user = None;
        debug!("logged out");
        Ok(())
    }

    /// Logout forced by a session error (401 mid-session). Storage
    /// failures are logged, not surfaced -- the session ends either way.
    pub fn force_logout(&mut self, client: &ApiClient) {
        if let Err(err) = self.store.clear() {
            warn!("failed to clear token during forced logout: {err}");
        }
        client.clear_token();
        self.user = None;
        warn!("session ended: token expired or invalid");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use secrecy::ExposeSecret;

    use super::*;

    struct MemoryStore {
        token: Mutex<Option<String>>,
    }

    impl MemoryStore {
        fn with_token(token: &str) -> Arc<Self> {
            Arc::new(Self {
                token: Mutex::new(Some(token.to_owned())),
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                token: Mutex::new(None),
            })
        }
    }

    impl TokenStore for MemoryStore {
        fn load(&self) -> Option<SecretString> {
            self.token
                .lock()
                .unwrap()
                .clone()
                .map(SecretString::from)
        }

        fn store(&self, token: &SecretString) -> Result<(), CoreError> {
            *self.token.lock().unwrap() = Some(token.expose_secret().to_owned());
            Ok(())
        }

        fn clear(&self) -> Result<(), CoreError> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    struct FakeIdentity {
        result: Mutex<Option<Result<User, CoreError>>>,
    }

    #[async_trait]
    impl IdentityServices for FakeIdentity {
        async fn current_user(&self) -> Result<User, CoreError> {
            self.result.lock().unwrap().take().expect("one call only")
        }
    }

    fn user() -> User {
        User {
            id: "64a10f2b9d3e4c0012ab34ce".into(),
            name: "Asha".into(),
            email: Some("asha@example.com".into()),
            phone: Some("9876543210".into()),
            role: Role::User,
        }
    }

    fn client() -> ApiClient {
        let base = "https://shuttle.example.com".parse().unwrap();
        ApiClient::new(base, &shuttly_api::TransportConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn rehydrate_with_valid_token_authenticates() {
        let store = MemoryStore::with_token("persisted");
        let mut session = AuthSession::new(store.clone());
        let client = client();
        let identity = FakeIdentity {
            result: Mutex::new(Some(Ok(user()))),
        };

        assert!(session.rehydrate(&client, &identity).await.unwrap());
        assert!(session.is_authenticated());
        assert!(client.has_token());
        assert!(store.load().is_some());
    }

    #[tokio::test]
    async fn rehydrate_with_rejected_token_clears_everything() {
        let store = MemoryStore::with_token("stale");
        let mut session = AuthSession::new(store.clone());
        let client = client();
        let identity = FakeIdentity {
            result: Mutex::new(Some(Err(CoreError::Api(shuttly_api::Error::Authentication {
                message: "jwt expired".into(),
            })))),
        };

        assert!(!session.rehydrate(&client, &identity).await.unwrap());
        assert!(!session.is_authenticated());
        assert!(!client.has_token());
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn rehydrate_without_token_is_a_quiet_no() {
        let store = MemoryStore::empty();
        let mut session = AuthSession::new(store);
        let client = client();
        let identity = FakeIdentity {
            result: Mutex::new(None),
        };

        assert!(!session.rehydrate(&client, &identity).await.unwrap());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn login_persists_and_logout_clears() {
        let store = MemoryStore::empty();
        let mut session = AuthSession::new(store.clone());
        let client = client();

        session
            .login(&client, SecretString::from("fresh"), user())
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::User));
        assert!(client.has_token());
        assert!(store.load().is_some());

        session.logout(&client).unwrap();
        assert!(!session.is_authenticated());
        assert!(!client.has_token());
        assert!(store.load().is_none());
    }
}
