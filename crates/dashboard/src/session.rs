//! Session store.
//!
//! Holds the signed-in identity for the life of the process. The state is
//! resolved once by [`SessionStore::restore`] and afterwards changes only
//! through [`SessionStore::sign_in`] and [`SessionStore::sign_out`]. Every
//! transition is queued to every live subscriber before the call that caused
//! it returns.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell, mpsc};
use tracing::{info, instrument, warn};

use painel_app::{
    auth::{Credentials, SessionToken},
    domain::sellers::records::SellerUuid,
};

use crate::{credentials::CredentialStore, identity::IdentityProvider};

/// An authenticated seller session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent with every catalog request.
    pub token: SessionToken,
    pub email: String,
    /// The seller every product request is scoped to.
    pub owner_uuid: SellerUuid,
    /// The token is rejected from this instant on.
    pub expires_at: Timestamp,
}

impl Session {
    /// Whether the token is already expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Resolution state of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// [`SessionStore::restore`] has not finished yet.
    #[default]
    Unresolved,
    Authenticated(Session),
    Anonymous,
}

impl SessionState {
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Unresolved | Self::Anonymous => None,
        }
    }
}

/// Failures reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session is not active")]
    Inactive,

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

struct Inner {
    state: SessionState,
    subscribers: Vec<mpsc::UnboundedSender<SessionState>>,
}

/// Process-wide holder of the signed-in identity.
///
/// Shared behind an [`Arc`] by the access guard and the product controllers.
pub struct SessionStore {
    identity: Arc<dyn IdentityProvider>,
    credentials: Arc<dyn CredentialStore>,
    restored: OnceCell<()>,
    inner: Mutex<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("restored", &self.restored.initialized())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            identity,
            credentials,
            restored: OnceCell::new(),
            inner: Mutex::new(Inner {
                state: SessionState::Unresolved,
                subscribers: Vec::new(),
            }),
        }
    }

    /// The state as of now, which is [`SessionState::Unresolved`] until
    /// [`Self::restore`] completes.
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// The current session, if authenticated.
    pub async fn session(&self) -> Option<Session> {
        self.inner.lock().await.state.session().cloned()
    }

    /// The session once the store has resolved, running [`Self::restore`]
    /// first if it has not.
    pub async fn resolved_session(&self) -> Option<Session> {
        self.restore().await.session().cloned()
    }

    /// Register a subscriber. The current state is queued first, then every
    /// later transition in order. Dropping the receiver unsubscribes.
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionState> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().await;

        if sender.send(inner.state.clone()).is_ok() {
            inner.subscribers.push(sender);
        }

        receiver
    }

    /// Recover a prior session from stored credentials.
    ///
    /// Runs once per store; concurrent and later callers wait for the same
    /// resolution and get the resolved state.
    pub async fn restore(&self) -> SessionState {
        self.restored
            .get_or_init(|| async {
                let state = self.resolve_stored().await;

                self.transition(state).await;
            })
            .await;

        self.state().await
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// # Errors
    ///
    /// Returns the identity service's rejection; the state is left unchanged.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: Credentials) -> Result<Session, SessionError> {
        self.restore().await;

        let session = self.identity.sign_in(credentials).await?;

        if let Err(error) = self.credentials.save(&session).await {
            warn!("signed in, but failed to persist credentials: {error}");
        }

        info!(owner_uuid = %session.owner_uuid, "signed in");

        self.transition(SessionState::Authenticated(session.clone()))
            .await;

        Ok(session)
    }

    /// Drop the current identity. Server revocation and credential removal
    /// are best effort; the store always ends up anonymous.
    #[instrument(skip_all)]
    pub async fn sign_out(&self) {
        self.restore().await;

        if let Some(session) = self.session().await
            && let Err(error) = self.identity.sign_out(&session).await
        {
            warn!("failed to revoke session on the server: {error}");
        }

        self.forget_credentials().await;

        self.transition(SessionState::Anonymous).await;

        info!("signed out");
    }

    async fn resolve_stored(&self) -> SessionState {
        let stored = match self.credentials.load().await {
            Ok(Some(stored)) => stored,
            Ok(None) => return SessionState::Anonymous,
            Err(error) => {
                warn!("ignoring unreadable stored credentials: {error}");

                return SessionState::Anonymous;
            }
        };

        if stored.is_expired_at(Timestamp::now()) {
            self.forget_credentials().await;

            return SessionState::Anonymous;
        }

        match self.identity.get_session(&stored.token).await {
            Ok(session) => SessionState::Authenticated(session),
            Err(SessionError::Inactive | SessionError::InvalidCredentials) => {
                self.forget_credentials().await;

                SessionState::Anonymous
            }
            Err(error) => {
                warn!("could not verify stored session, keeping it until it expires: {error}");

                SessionState::Authenticated(stored)
            }
        }
    }

    async fn forget_credentials(&self) {
        if let Err(error) = self.credentials.clear().await {
            warn!("failed to remove stored credentials: {error}");
        }
    }

    async fn transition(&self, state: SessionState) {
        let mut inner = self.inner.lock().await;

        inner
            .subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());

        inner.state = state;
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use crate::{
        credentials::MemoryCredentialStore,
        identity::MockIdentityProvider,
        test_helpers::{credentials, make_session},
    };

    use super::*;

    fn store(identity: MockIdentityProvider, credentials: MemoryCredentialStore) -> SessionStore {
        SessionStore::new(Arc::new(identity), Arc::new(credentials))
    }

    fn drain(receiver: &mut mpsc::UnboundedReceiver<SessionState>) -> Vec<SessionState> {
        let mut states = Vec::new();

        while let Ok(state) = receiver.try_recv() {
            states.push(state);
        }

        states
    }

    #[tokio::test]
    async fn restore_without_credentials_is_anonymous() {
        let mut identity = MockIdentityProvider::new();

        identity.expect_get_session().never();

        let store = store(identity, MemoryCredentialStore::default());

        assert_eq!(store.state().await, SessionState::Unresolved);
        assert_eq!(store.restore().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn restore_verifies_stored_session_once() -> TestResult {
        let session = make_session();
        let verified = session.clone();

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_get_session()
            .once()
            .return_once(move |_| Ok(verified));

        let store = Arc::new(store(
            identity,
            MemoryCredentialStore::with_session(session.clone()),
        ));

        let (first, second) = tokio::join!(store.restore(), store.restore());

        assert_eq!(first, SessionState::Authenticated(session.clone()));
        assert_eq!(second, first);
        assert_eq!(store.restore().await, first);

        Ok(())
    }

    #[tokio::test]
    async fn restore_drops_expired_credentials_without_a_network_call() -> TestResult {
        let mut session = make_session();

        session.expires_at = Timestamp::now().checked_sub(SignedDuration::from_mins(1))?;

        let mut identity = MockIdentityProvider::new();

        identity.expect_get_session().never();

        let stored = MemoryCredentialStore::with_session(session);
        let store = store(identity, stored.clone());

        assert_eq!(store.restore().await, SessionState::Anonymous);
        assert_eq!(stored.load().await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn restore_drops_revoked_credentials() -> TestResult {
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_get_session()
            .once()
            .return_once(|_| Err(SessionError::Inactive));

        let stored = MemoryCredentialStore::with_session(make_session());
        let store = store(identity, stored.clone());

        assert_eq!(store.restore().await, SessionState::Anonymous);
        assert_eq!(stored.load().await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn restore_keeps_unverifiable_session_when_offline() {
        let session = make_session();

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_get_session()
            .once()
            .return_once(|_| Err(SessionError::Unavailable("connection refused".to_string())));

        let store = store(identity, MemoryCredentialStore::with_session(session.clone()));

        assert_eq!(store.restore().await, SessionState::Authenticated(session));
    }

    #[tokio::test]
    async fn sign_in_persists_and_notifies() -> TestResult {
        let session = make_session();
        let issued = session.clone();

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_in()
            .once()
            .withf(|credentials| credentials.email == "seller@example.com")
            .return_once(move |_| Ok(issued));

        let stored = MemoryCredentialStore::default();
        let store = store(identity, stored.clone());

        let mut updates = store.subscribe().await;

        store.sign_in(credentials()).await?;

        assert_eq!(
            drain(&mut updates),
            [
                SessionState::Unresolved,
                SessionState::Anonymous,
                SessionState::Authenticated(session.clone()),
            ]
        );
        assert_eq!(stored.load().await?, Some(session));

        Ok(())
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_state_unchanged() {
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_in()
            .once()
            .return_once(|_| Err(SessionError::InvalidCredentials));

        let store = store(identity, MemoryCredentialStore::default());

        store.restore().await;

        let mut updates = store.subscribe().await;

        assert_eq!(
            store.sign_in(credentials()).await,
            Err(SessionError::InvalidCredentials)
        );
        assert_eq!(drain(&mut updates), [SessionState::Anonymous]);
    }

    #[tokio::test]
    async fn sign_out_is_anonymous_even_when_revocation_fails() -> TestResult {
        let session = make_session();
        let verified = session.clone();

        let mut identity = MockIdentityProvider::new();

        identity
            .expect_get_session()
            .once()
            .return_once(move |_| Ok(verified));
        identity
            .expect_sign_out()
            .once()
            .return_once(|_| Err(SessionError::Unavailable("timeout".to_string())));

        let stored = MemoryCredentialStore::with_session(session);
        let store = store(identity, stored.clone());

        store.restore().await;

        let mut updates = store.subscribe().await;

        store.sign_out().await;

        assert_eq!(store.state().await, SessionState::Anonymous);
        assert_eq!(stored.load().await?, None);
        assert_eq!(drain(&mut updates).last(), Some(&SessionState::Anonymous));

        Ok(())
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let mut identity = MockIdentityProvider::new();

        identity.expect_sign_out().never();

        let store = store(identity, MemoryCredentialStore::default());

        drop(store.subscribe().await);

        let mut live = store.subscribe().await;

        store.sign_out().await;

        assert_eq!(drain(&mut live).last(), Some(&SessionState::Anonymous));
        assert_eq!(store.inner.lock().await.subscribers.len(), 1);
    }
}
