//! JSON API client.

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use painel_app::{
    auth::{Credentials, SessionToken},
    domain::{
        products::{
            data::{NewProduct, ProductUpdate},
            form::{ProductForm, ProductFormErrors},
            records::{PaymentType, ProductRecord, ProductStatus, ProductType, ProductUuid},
        },
        sellers::records::SellerUuid,
    },
};

use crate::{
    errors::CatalogError,
    identity::IdentityProvider,
    repository::CatalogRepository,
    session::{Session, SessionError},
};

/// Client for the `painel-json` server. Implements both the identity
/// provider and the catalog repository.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder, token: &SessionToken) -> RequestBuilder {
        builder.bearer_auth(token.expose())
    }

    async fn send_catalog(&self, request: RequestBuilder) -> Result<Response, CatalogError> {
        let response = request
            .send()
            .await
            .map_err(|error| CatalogError::Repository(format!("request failed: {error}")))?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(catalog_error(response).await)
    }
}

async fn catalog_error(response: Response) -> CatalogError {
    match response.status() {
        StatusCode::UNAUTHORIZED => CatalogError::Auth,
        StatusCode::NOT_FOUND => CatalogError::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            match response.json::<ValidationBody>().await {
                Ok(body) => CatalogError::Validation(body.errors),
                Err(error) => {
                    debug!("rejection without field errors: {error}");

                    CatalogError::rejected("product rejected by the server")
                }
            }
        }
        status => {
            let text = response.text().await.unwrap_or_default();

            warn!(%status, "unexpected catalog response");

            CatalogError::Repository(format!("unexpected status {status}: {text}"))
        }
    }
}

async fn session_error(response: Response) -> SessionError {
    match response.status() {
        StatusCode::UNAUTHORIZED => SessionError::Inactive,
        status => {
            let text = response.text().await.unwrap_or_default();

            SessionError::Unavailable(format!("unexpected status {status}: {text}"))
        }
    }
}

fn transport_error(error: &reqwest::Error) -> SessionError {
    SessionError::Unavailable(format!("request failed: {error}"))
}

fn decode_error(error: &reqwest::Error) -> CatalogError {
    CatalogError::Repository(format!("invalid response body: {error}"))
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: ProductFormErrors,
}

#[derive(Debug, Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct IssuedSessionBody {
    token: SessionToken,
    email: String,
    owner_uuid: SellerUuid,
    expires_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    email: String,
    owner_uuid: SellerUuid,
    expires_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct ProductBody {
    uuid: ProductUuid,
    owner_uuid: SellerUuid,
    name: String,
    product_type: ProductType,
    price: u64,
    payment_type: PaymentType,
    status: ProductStatus,
    description: Option<String>,
    image_url: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    commission_rate: Option<Decimal>,
    facebook_pixel: Option<String>,
    google_analytics_pixel: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<ProductBody> for ProductRecord {
    fn from(body: ProductBody) -> Self {
        ProductRecord {
            uuid: body.uuid,
            owner_uuid: body.owner_uuid,
            name: body.name,
            product_type: body.product_type,
            price: body.price,
            payment_type: body.payment_type,
            status: body.status,
            description: body.description,
            image_url: body.image_url,
            commission_rate: body.commission_rate,
            facebook_pixel: body.facebook_pixel,
            google_analytics_pixel: body.google_analytics_pixel,
            created_at: body.created_at,
            updated_at: body.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductsBody {
    products: Vec<ProductBody>,
}

#[async_trait]
impl IdentityProvider for ApiClient {
    #[instrument(skip_all)]
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, SessionError> {
        let response = self
            .http
            .post(self.url("/auth/sign-in"))
            .json(&SignInBody {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|error| transport_error(&error))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(SessionError::InvalidCredentials);
        }

        if !response.status().is_success() {
            return Err(session_error(response).await);
        }

        let body: IssuedSessionBody = response
            .json()
            .await
            .map_err(|error| transport_error(&error))?;

        Ok(Session {
            token: body.token,
            email: body.email,
            owner_uuid: body.owner_uuid,
            expires_at: body.expires_at,
        })
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, session: &Session) -> Result<(), SessionError> {
        let response = self
            .authorized(self.http.post(self.url("/auth/sign-out")), &session.token)
            .send()
            .await
            .map_err(|error| transport_error(&error))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Ok(()),
            _ => Err(session_error(response).await),
        }
    }

    #[instrument(skip_all)]
    async fn get_session(&self, token: &SessionToken) -> Result<Session, SessionError> {
        let response = self
            .authorized(self.http.get(self.url("/auth/session")), token)
            .send()
            .await
            .map_err(|error| transport_error(&error))?;

        if !response.status().is_success() {
            return Err(session_error(response).await);
        }

        let body: SessionBody = response
            .json()
            .await
            .map_err(|error| transport_error(&error))?;

        Ok(Session {
            token: token.clone(),
            email: body.email,
            owner_uuid: body.owner_uuid,
            expires_at: body.expires_at,
        })
    }
}

#[async_trait]
impl CatalogRepository for ApiClient {
    #[instrument(skip_all)]
    async fn list(&self, session: &Session) -> Result<Vec<ProductRecord>, CatalogError> {
        let body: ProductsBody = self
            .send_catalog(self.authorized(self.http.get(self.url("/products")), &session.token))
            .await?
            .json()
            .await
            .map_err(|error| decode_error(&error))?;

        Ok(body.products.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, session))]
    async fn get(&self, session: &Session, id: ProductUuid) -> Result<ProductRecord, CatalogError> {
        let body: ProductBody = self
            .send_catalog(
                self.authorized(self.http.get(self.url(&format!("/products/{id}"))), &session.token),
            )
            .await?
            .json()
            .await
            .map_err(|error| decode_error(&error))?;

        Ok(body.into())
    }

    #[instrument(skip_all)]
    async fn create(
        &self,
        session: &Session,
        payload: NewProduct,
    ) -> Result<ProductRecord, CatalogError> {
        let request = self
            .authorized(self.http.post(self.url("/products")), &session.token)
            .json(&ProductForm::from(&payload));

        let body: ProductBody = self
            .send_catalog(request)
            .await?
            .json()
            .await
            .map_err(|error| decode_error(&error))?;

        Ok(body.into())
    }

    #[instrument(skip(self, session, payload))]
    async fn update(
        &self,
        session: &Session,
        id: ProductUuid,
        payload: ProductUpdate,
    ) -> Result<ProductRecord, CatalogError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/products/{id}"))), &session.token)
            .json(&ProductForm::from(&payload));

        let body: ProductBody = self
            .send_catalog(request)
            .await?
            .json()
            .await
            .map_err(|error| decode_error(&error))?;

        Ok(body.into())
    }

    #[instrument(skip(self, session))]
    async fn delete(&self, session: &Session, id: ProductUuid) -> Result<(), CatalogError> {
        self.send_catalog(
            self.authorized(self.http.delete(self.url(&format!("/products/{id}"))), &session.token),
        )
        .await?;

        Ok(())
    }
}
