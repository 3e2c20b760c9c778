//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, instrument};

use crate::{
    database::Db,
    domain::{
        products::{
            data::{NewProduct, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid},
            repository::{PgProductsRepository, ProductColumns},
        },
        sellers::records::SellerUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn list_products(
        &self,
        owner: SellerUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_owner_transaction(owner).await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        debug!(count = products.len(), "listed products");

        Ok(products)
    }

    #[instrument(skip(self), fields(owner = %owner, product = %product))]
    async fn get_product(
        &self,
        owner: SellerUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_owner_transaction(owner).await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[instrument(skip(self, product), fields(owner = %owner))]
    async fn create_product(
        &self,
        owner: SellerUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_owner_transaction(owner).await?;

        let created = self
            .repository
            .create_product(
                &mut tx,
                ProductUuid::new(),
                ProductColumns {
                    name: &product.name,
                    product_type: product.product_type,
                    price: product.price,
                    payment_type: product.payment_type,
                    status: product.status,
                    description: product.description.as_deref(),
                    image_url: product.image_url.as_deref(),
                    commission_rate: product.commission_rate,
                    facebook_pixel: product.facebook_pixel.as_deref(),
                    google_analytics_pixel: product.google_analytics_pixel.as_deref(),
                },
            )
            .await?;

        tx.commit().await?;

        debug!(product = %created.uuid, "created product");

        Ok(created)
    }

    #[instrument(skip(self, update), fields(owner = %owner, product = %product))]
    async fn update_product(
        &self,
        owner: SellerUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_owner_transaction(owner).await?;

        let updated = self
            .repository
            .update_product(
                &mut tx,
                product,
                ProductColumns {
                    name: &update.name,
                    product_type: update.product_type,
                    price: update.price,
                    payment_type: update.payment_type,
                    status: update.status,
                    description: update.description.as_deref(),
                    image_url: update.image_url.as_deref(),
                    commission_rate: update.commission_rate,
                    facebook_pixel: update.facebook_pixel.as_deref(),
                    google_analytics_pixel: update.google_analytics_pixel.as_deref(),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(self), fields(owner = %owner, product = %product))]
    async fn delete_product(
        &self,
        owner: SellerUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_owner_transaction(owner).await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves the owner's products, newest first.
    async fn list_products(
        &self,
        owner: SellerUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product owned by `owner`.
    async fn get_product(
        &self,
        owner: SellerUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a product owned by `owner`. Identifier and timestamps are
    /// assigned by the store.
    async fn create_product(
        &self,
        owner: SellerUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces every mutable field of the product.
    async fn update_product(
        &self,
        owner: SellerUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product owned by `owner`.
    async fn delete_product(
        &self,
        owner: SellerUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError>;
}
