//! Auth Errors

use painel_app::auth::AuthServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::NotFound => StatusError::unauthorized().brief("Session is not active"),
        AuthServiceError::AlreadyRegistered => {
            StatusError::conflict().brief("Email already registered")
        }
        AuthServiceError::ExpiryOutOfRange(source) => {
            error!("session expiry out of range: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process session token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
    }
}
