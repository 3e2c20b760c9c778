//! Catalog repository.
//!
//! Every call takes the caller's session rather than an owner id, so a
//! request for another seller's products cannot be expressed.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{error, instrument};

use painel_app::{
    auth::{AuthService, AuthServiceError},
    context::AppContext,
    domain::{
        products::{
            ProductsService, ProductsServiceError,
            data::{NewProduct, ProductUpdate},
            records::{ProductRecord, ProductUuid},
        },
        sellers::records::SellerUuid,
    },
};

use crate::{errors::CatalogError, session::Session};

#[automock]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// The caller's products, newest first.
    async fn list(&self, session: &Session) -> Result<Vec<ProductRecord>, CatalogError>;

    async fn get(&self, session: &Session, id: ProductUuid) -> Result<ProductRecord, CatalogError>;

    /// Insert a product owned by the session's seller.
    async fn create(
        &self,
        session: &Session,
        payload: NewProduct,
    ) -> Result<ProductRecord, CatalogError>;

    /// Replace every mutable field of the product.
    async fn update(
        &self,
        session: &Session,
        id: ProductUuid,
        payload: ProductUpdate,
    ) -> Result<ProductRecord, CatalogError>;

    /// Permanently remove the product.
    async fn delete(&self, session: &Session, id: ProductUuid) -> Result<(), CatalogError>;
}

/// In-process repository over the application services. The owner is
/// resolved from the session token on every call.
pub struct ServiceCatalogRepository {
    auth: Arc<dyn AuthService>,
    products: Arc<dyn ProductsService>,
}

impl ServiceCatalogRepository {
    #[must_use]
    pub fn new(app: &AppContext) -> Self {
        Self {
            auth: Arc::clone(&app.auth),
            products: Arc::clone(&app.products),
        }
    }

    async fn owner(&self, session: &Session) -> Result<SellerUuid, CatalogError> {
        match self.auth.get_session(&session.token).await {
            Ok(identity) => Ok(identity.seller_uuid),
            Err(AuthServiceError::NotFound | AuthServiceError::InvalidCredentials) => {
                Err(CatalogError::Auth)
            }
            Err(other) => {
                error!("failed to resolve session: {other}");

                Err(CatalogError::Repository(other.to_string()))
            }
        }
    }
}

impl fmt::Debug for ServiceCatalogRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCatalogRepository")
            .finish_non_exhaustive()
    }
}

fn into_catalog_error(error: ProductsServiceError) -> CatalogError {
    match error {
        ProductsServiceError::NotFound => CatalogError::NotFound,
        ProductsServiceError::AlreadyExists
        | ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => CatalogError::rejected(error.to_string()),
        ProductsServiceError::Sql(_) => {
            error!("product storage failure: {error}");

            CatalogError::Repository(error.to_string())
        }
    }
}

#[async_trait]
impl CatalogRepository for ServiceCatalogRepository {
    #[instrument(skip_all)]
    async fn list(&self, session: &Session) -> Result<Vec<ProductRecord>, CatalogError> {
        let owner = self.owner(session).await?;

        self.products
            .list_products(owner)
            .await
            .map_err(into_catalog_error)
    }

    #[instrument(skip(self, session))]
    async fn get(&self, session: &Session, id: ProductUuid) -> Result<ProductRecord, CatalogError> {
        let owner = self.owner(session).await?;

        self.products
            .get_product(owner, id)
            .await
            .map_err(into_catalog_error)
    }

    #[instrument(skip_all)]
    async fn create(
        &self,
        session: &Session,
        payload: NewProduct,
    ) -> Result<ProductRecord, CatalogError> {
        let owner = self.owner(session).await?;

        self.products
            .create_product(owner, payload)
            .await
            .map_err(into_catalog_error)
    }

    #[instrument(skip(self, session, payload))]
    async fn update(
        &self,
        session: &Session,
        id: ProductUuid,
        payload: ProductUpdate,
    ) -> Result<ProductRecord, CatalogError> {
        let owner = self.owner(session).await?;

        self.products
            .update_product(owner, id, payload)
            .await
            .map_err(into_catalog_error)
    }

    #[instrument(skip(self, session))]
    async fn delete(&self, session: &Session, id: ProductUuid) -> Result<(), CatalogError> {
        let owner = self.owner(session).await?;

        self.products
            .delete_product(owner, id)
            .await
            .map_err(into_catalog_error)
    }
}
