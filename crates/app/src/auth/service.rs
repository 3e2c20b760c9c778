//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, Credentials, Identity, IssuedSession, SessionToken, SessionTokenVersion,
        SignUp, build_verifier_input, format_session_token, generate_session_secret,
        hash_password, hash_verifier,
        models::NewSession,
        parse_session_token,
        repository::{NewSellerRow, PgAuthRepository},
        verify_password,
    },
    domain::sellers::records::{SellerRecord, SellerUuid},
};

/// Default lifetime of a session issued at sign-in.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(12);

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    session_ttl: SignedDuration,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, session_ttl: SignedDuration) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            session_ttl,
        }
    }

    /// Verify a bearer token against storage, returning the session id with
    /// its identity.
    async fn verify(&self, token: &SessionToken) -> Result<Identity, AuthServiceError> {
        let parsed =
            parse_session_token(token.expose()).map_err(|_invalid| AuthServiceError::NotFound)?;

        let session = self
            .repository
            .find_active_session(parsed.session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let verifier = hash_verifier(&build_verifier_input(
            &parsed.session_uuid,
            parsed.version,
            &session.seller_uuid,
            &parsed.secret,
        ));

        if session.version != parsed.version || verifier != session.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        Ok(Identity {
            session_uuid: parsed.session_uuid,
            seller_uuid: session.seller_uuid,
            email: session.email,
            expires_at: session.expires_at,
        })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[instrument(skip(self, sign_up), fields(email = %sign_up.email))]
    async fn sign_up(&self, sign_up: SignUp) -> Result<SellerRecord, AuthServiceError> {
        let password_hash = hash_password(&sign_up.password)?;

        let seller = self
            .repository
            .create_seller(NewSellerRow {
                uuid: SellerUuid::new(),
                email: &sign_up.email,
                name: &sign_up.name,
                phone: &sign_up.phone,
                password_hash: &password_hash,
            })
            .await?;

        info!(seller = %seller.uuid, "seller registered");

        Ok(seller)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError> {
        let seller = self
            .repository
            .find_seller_by_email(credentials.email.trim())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &seller.password_hash)? {
            debug!("password mismatch");

            return Err(AuthServiceError::InvalidCredentials);
        }

        let session_uuid = Uuid::now_v7();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let expires_at = Timestamp::now()
            .checked_add(self.session_ttl)
            .map_err(AuthServiceError::ExpiryOutOfRange)?;

        self.repository
            .create_session(&NewSession {
                uuid: session_uuid,
                seller_uuid: seller.uuid,
                version,
                token_hash: hash_verifier(&build_verifier_input(
                    &session_uuid,
                    version,
                    &seller.uuid,
                    &secret,
                )),
                expires_at,
            })
            .await?;

        info!(seller = %seller.uuid, session = %session_uuid, "session issued");

        Ok(IssuedSession {
            token,
            identity: Identity {
                session_uuid,
                seller_uuid: seller.uuid,
                email: seller.email,
                expires_at,
            },
        })
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthServiceError> {
        let identity = self.verify(token).await?;

        if !self.repository.revoke_session(identity.session_uuid).await? {
            return Err(AuthServiceError::NotFound);
        }

        info!(session = %identity.session_uuid, "session revoked");

        Ok(())
    }

    #[instrument(skip_all)]
    async fn get_session(&self, token: &SessionToken) -> Result<Identity, AuthServiceError> {
        self.verify(token).await
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a seller account.
    async fn sign_up(&self, sign_up: SignUp) -> Result<SellerRecord, AuthServiceError>;

    /// Exchanges email and password for a new session.
    async fn sign_in(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Revokes the session behind `token`.
    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthServiceError>;

    /// Resolves a live session from its bearer token.
    async fn get_session(&self, token: &SessionToken) -> Result<Identity, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::{SignUpForm, validate_sign_up},
        test::TestContext,
    };

    use super::*;

    fn sign_up(email: &str) -> SignUp {
        let form = SignUpForm {
            name: "Maria".to_string(),
            email: email.to_string(),
            phone: "11987654321".to_string(),
            password: "segredo".to_string(),
            password_confirmation: "segredo".to_string(),
        };

        match validate_sign_up(&form) {
            Ok(sign_up) => sign_up,
            Err(errors) => panic!("fixture form should be valid: {errors}"),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres test container"]
    async fn sign_in_issues_a_session_that_resolves() -> TestResult {
        let ctx = TestContext::new().await;

        let seller = ctx.auth.sign_up(sign_up("maria@example.com")).await?;

        let issued = ctx
            .auth
            .sign_in(credentials("maria@example.com", "segredo"))
            .await?;

        assert_eq!(issued.identity.seller_uuid, seller.uuid);

        let identity = ctx.auth.get_session(&issued.token).await?;

        assert_eq!(identity.session_uuid, issued.identity.session_uuid);
        assert_eq!(identity.seller_uuid, seller.uuid);
        assert_eq!(identity.email, "maria@example.com");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres test container"]
    async fn duplicate_email_is_already_registered() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.sign_up(sign_up("maria@example.com")).await?;

        let result = ctx.auth.sign_up(sign_up("MARIA@example.com")).await;

        assert!(
            matches!(result, Err(AuthServiceError::AlreadyRegistered)),
            "expected AlreadyRegistered, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres test container"]
    async fn wrong_password_is_invalid_credentials() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.sign_up(sign_up("maria@example.com")).await?;

        let result = ctx
            .auth
            .sign_in(credentials("maria@example.com", "errada"))
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres test container"]
    async fn signed_out_session_no_longer_resolves() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.sign_up(sign_up("maria@example.com")).await?;

        let issued = ctx
            .auth
            .sign_in(credentials("maria@example.com", "segredo"))
            .await?;

        ctx.auth.sign_out(&issued.token).await?;

        let result = ctx.auth.get_session(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres test container"]
    async fn expired_session_does_not_resolve() -> TestResult {
        let ctx = TestContext::new().await;
        let auth = PgAuthService::new(ctx.db.pool().clone(), SignedDuration::from_secs(-1));

        auth.sign_up(sign_up("maria@example.com")).await?;

        let issued = auth
            .sign_in(credentials("maria@example.com", "segredo"))
            .await?;

        let result = auth.get_session(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres test container"]
    async fn tampered_token_does_not_resolve() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.sign_up(sign_up("maria@example.com")).await?;

        let issued = ctx
            .auth
            .sign_in(credentials("maria@example.com", "segredo"))
            .await?;

        let (id, _secret) = issued
            .token
            .expose()
            .split_once('.')
            .ok_or("token should contain a secret")?;
        let forged = SessionToken::new(format!("{id}.{}", "0".repeat(64)));

        let result = ctx.auth.get_session(&forged).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
