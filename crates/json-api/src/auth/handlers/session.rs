//! Current Session Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use painel_app::auth::Identity;

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    pub session_uuid: Uuid,
    pub email: String,
    pub owner_uuid: Uuid,
    pub expires_at: String,
}

impl From<&Identity> for SessionResponse {
    fn from(identity: &Identity) -> Self {
        SessionResponse {
            session_uuid: identity.session_uuid,
            email: identity.email.clone(),
            owner_uuid: identity.seller_uuid.into(),
            expires_at: identity.expires_at.to_string(),
        }
    }
}

/// Current Session Handler
///
/// Returns the identity behind the bearer token.
#[endpoint(
    tags("auth"),
    summary = "Current session",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SessionResponse>, StatusError> {
    let identity = depot.identity_or_401()?;

    Ok(Json(identity.into()))
}
