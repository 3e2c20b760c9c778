//! Sign-out Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{auth::into_status_error, extensions::*, state::State};

/// Sign-out Handler
///
/// Revokes the bearer session.
#[endpoint(
    tags("auth"),
    summary = "Sign out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Session revoked"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let token = depot.session_token_or_401()?;

    state
        .app
        .auth
        .sign_out(token)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
