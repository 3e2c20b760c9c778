//! Depot helper extensions.

use std::any::Any;

use painel_app::{
    auth::{Identity, SessionToken},
    domain::sellers::records::SellerUuid,
};
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Store the authenticated session for downstream handlers.
    fn insert_identity(&mut self, identity: Identity, token: SessionToken);

    fn identity_or_401(&self) -> Result<&Identity, StatusError>;

    fn session_token_or_401(&self) -> Result<&SessionToken, StatusError>;

    /// Owner every product query is scoped to.
    fn owner_uuid_or_401(&self) -> Result<SellerUuid, StatusError> {
        self.identity_or_401().map(|identity| identity.seller_uuid)
    }
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity, token: SessionToken) {
        self.inject(identity);
        self.inject(token);
    }

    fn identity_or_401(&self) -> Result<&Identity, StatusError> {
        self.obtain::<Identity>()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn session_token_or_401(&self) -> Result<&SessionToken, StatusError> {
        self.obtain::<SessionToken>()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
