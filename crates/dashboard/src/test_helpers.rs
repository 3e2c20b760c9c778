//! Test helpers.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use painel_app::{
    auth::{Credentials, SessionToken},
    domain::{
        products::{
            data::{NewProduct, ProductUpdate},
            records::{PaymentType, ProductRecord, ProductStatus, ProductType, ProductUuid},
        },
        sellers::records::SellerUuid,
    },
};

use crate::{
    credentials::MemoryCredentialStore,
    errors::CatalogError,
    identity::MockIdentityProvider,
    repository::CatalogRepository,
    session::{Session, SessionStore},
};

pub(crate) const TEST_OWNER_UUID: SellerUuid = SellerUuid::from_uuid(Uuid::nil());

pub(crate) fn make_session() -> Session {
    Session {
        token: SessionToken::new("pn_v1_test"),
        email: "seller@example.com".to_string(),
        owner_uuid: TEST_OWNER_UUID,
        expires_at: Timestamp::now()
            .checked_add(SignedDuration::from_hours(12))
            .unwrap_or(Timestamp::MAX),
    }
}

pub(crate) fn credentials() -> Credentials {
    Credentials {
        email: "seller@example.com".to_string(),
        password: "segredo".to_string(),
    }
}

pub(crate) fn make_product(uuid: ProductUuid, name: &str, status: ProductStatus) -> ProductRecord {
    ProductRecord {
        uuid,
        owner_uuid: TEST_OWNER_UUID,
        name: name.to_string(),
        product_type: ProductType::CursoOnline,
        price: 10_000,
        payment_type: PaymentType::Unico,
        status,
        description: None,
        image_url: None,
        commission_rate: None,
        facebook_pixel: None,
        google_analytics_pixel: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A signed-in store whose server-side revocation always succeeds.
pub(crate) async fn signed_in_store() -> Arc<SessionStore> {
    let session = make_session();

    let mut identity = MockIdentityProvider::new();

    identity
        .expect_get_session()
        .returning(move |_| Ok(session.clone()));
    identity.expect_sign_out().returning(|_| Ok(()));

    let store = Arc::new(SessionStore::new(
        Arc::new(identity),
        Arc::new(MemoryCredentialStore::with_session(make_session())),
    ));

    store.restore().await;

    store
}

/// In-memory catalog that honours ownership, ordering and token validity.
#[derive(Debug, Default)]
pub(crate) struct FakeCatalog {
    products: Mutex<Vec<ProductRecord>>,
    revoked: Mutex<bool>,
}

impl FakeCatalog {
    /// Reject every later call as if the session had expired.
    pub(crate) fn expire_sessions(&self) {
        *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    fn authorize(&self, session: &Session) -> Result<SellerUuid, CatalogError> {
        if *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(CatalogError::Auth);
        }

        Ok(session.owner_uuid)
    }

    fn products(&self) -> std::sync::MutexGuard<'_, Vec<ProductRecord>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogRepository for FakeCatalog {
    async fn list(&self, session: &Session) -> Result<Vec<ProductRecord>, CatalogError> {
        let owner = self.authorize(session)?;

        let mut products: Vec<_> = self
            .products()
            .iter()
            .filter(|product| product.owner_uuid == owner)
            .cloned()
            .collect();

        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.uuid.cmp(&a.uuid)));

        Ok(products)
    }

    async fn get(&self, session: &Session, id: ProductUuid) -> Result<ProductRecord, CatalogError> {
        let owner = self.authorize(session)?;

        self.products()
            .iter()
            .find(|product| product.uuid == id && product.owner_uuid == owner)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn create(
        &self,
        session: &Session,
        payload: NewProduct,
    ) -> Result<ProductRecord, CatalogError> {
        let owner = self.authorize(session)?;
        let now = Timestamp::now();

        let record = ProductRecord {
            uuid: ProductUuid::new(),
            owner_uuid: owner,
            name: payload.name,
            product_type: payload.product_type,
            price: payload.price,
            payment_type: payload.payment_type,
            status: payload.status,
            description: payload.description,
            image_url: payload.image_url,
            commission_rate: payload.commission_rate,
            facebook_pixel: payload.facebook_pixel,
            google_analytics_pixel: payload.google_analytics_pixel,
            created_at: now,
            updated_at: now,
        };

        self.products().push(record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        session: &Session,
        id: ProductUuid,
        payload: ProductUpdate,
    ) -> Result<ProductRecord, CatalogError> {
        let owner = self.authorize(session)?;
        let mut products = self.products();

        let record = products
            .iter_mut()
            .find(|product| product.uuid == id && product.owner_uuid == owner)
            .ok_or(CatalogError::NotFound)?;

        record.name = payload.name;
        record.product_type = payload.product_type;
        record.price = payload.price;
        record.payment_type = payload.payment_type;
        record.status = payload.status;
        record.description = payload.description;
        record.image_url = payload.image_url;
        record.commission_rate = payload.commission_rate;
        record.facebook_pixel = payload.facebook_pixel;
        record.google_analytics_pixel = payload.google_analytics_pixel;
        record.updated_at = Timestamp::now();

        Ok(record.clone())
    }

    async fn delete(&self, session: &Session, id: ProductUuid) -> Result<(), CatalogError> {
        let owner = self.authorize(session)?;
        let mut products = self.products();
        let before = products.len();

        products.retain(|product| !(product.uuid == id && product.owner_uuid == owner));

        if products.len() == before {
            return Err(CatalogError::NotFound);
        }

        Ok(())
    }
}
