//! Identity service boundary used by the session store.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use painel_app::auth::{AuthService, AuthServiceError, Credentials, Identity, SessionToken};

use crate::session::{Session, SessionError};

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange email and password for a session.
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, SessionError>;

    /// Revoke `session` on the server.
    async fn sign_out(&self, session: &Session) -> Result<(), SessionError>;

    /// Resolve a live session from its token.
    async fn get_session(&self, token: &SessionToken) -> Result<Session, SessionError>;
}

/// In-process provider backed by the auth service.
pub struct ServiceIdentityProvider {
    auth: Arc<dyn AuthService>,
}

impl ServiceIdentityProvider {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self { auth }
    }
}

impl fmt::Debug for ServiceIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceIdentityProvider")
            .finish_non_exhaustive()
    }
}

fn into_session(token: SessionToken, identity: Identity) -> Session {
    Session {
        token,
        email: identity.email,
        owner_uuid: identity.seller_uuid,
        expires_at: identity.expires_at,
    }
}

fn into_session_error(error: AuthServiceError) -> SessionError {
    match error {
        AuthServiceError::InvalidCredentials => SessionError::InvalidCredentials,
        AuthServiceError::NotFound => SessionError::Inactive,
        other => {
            warn!("identity service failure: {other}");

            SessionError::Unavailable(other.to_string())
        }
    }
}

#[async_trait]
impl IdentityProvider for ServiceIdentityProvider {
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, SessionError> {
        let issued = self
            .auth
            .sign_in(credentials)
            .await
            .map_err(into_session_error)?;

        Ok(into_session(issued.token, issued.identity))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), SessionError> {
        match self.auth.sign_out(&session.token).await {
            Ok(()) | Err(AuthServiceError::NotFound) => Ok(()),
            Err(error) => Err(into_session_error(error)),
        }
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Session, SessionError> {
        let identity = self
            .auth
            .get_session(token)
            .await
            .map_err(into_session_error)?;

        Ok(into_session(token.clone(), identity))
    }
}
