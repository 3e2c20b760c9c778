//! Sign-in Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use painel_app::auth::{Credentials, IssuedSession};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Sign-in Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl From<SignInRequest> for Credentials {
    fn from(request: SignInRequest) -> Self {
        Credentials {
            email: request.email,
            password: request.password,
        }
    }
}

/// Issued session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignInResponse {
    /// Bearer token; shown once
    pub token: String,
    pub email: String,
    pub owner_uuid: Uuid,
    /// RFC 3339 expiry
    pub expires_at: String,
}

impl From<IssuedSession> for SignInResponse {
    fn from(session: IssuedSession) -> Self {
        SignInResponse {
            token: session.token.expose().to_string(),
            email: session.identity.email,
            owner_uuid: session.identity.seller_uuid.into(),
            expires_at: session.identity.expires_at.to_string(),
        }
    }
}

/// Sign-in Handler
#[endpoint(
    tags("auth"),
    summary = "Sign in",
    responses(
        (status_code = StatusCode::OK, description = "Session issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignInRequest>,
    depot: &mut Depot,
) -> Result<Json<SignInResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let session = state
        .app
        .auth
        .sign_in(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}
