//! Product Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use painel_app::domain::products::{
    form::{ProductForm, format_price},
    records::ProductRecord,
};

/// Product form, as typed by the seller.
///
/// Unknown fields, such as an `owner_uuid`, are ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ProductRequest {
    pub name: String,
    /// `curso-online`, `mentoria` or `evento-online`
    pub product_type: String,
    /// Localized price text, e.g. `R$ 1.234,56`
    pub price: String,
    /// `unico` or `recorrente`
    pub payment_type: String,
    /// `ativo` or `inativo`; required on update
    pub status: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Percentage in `[0, 100]`
    pub commission_rate: Option<String>,
    pub facebook_pixel: Option<String>,
    pub google_analytics_pixel: Option<String>,
}

impl From<ProductRequest> for ProductForm {
    fn from(request: ProductRequest) -> Self {
        ProductForm {
            name: request.name,
            product_type: request.product_type,
            price: request.price,
            payment_type: request.payment_type,
            status: request.status,
            description: request.description,
            image_url: request.image_url,
            commission_rate: request.commission_rate,
            facebook_pixel: request.facebook_pixel,
            google_analytics_pixel: request.google_analytics_pixel,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// The seller that owns the product
    pub owner_uuid: Uuid,

    pub name: String,
    pub product_type: String,

    /// The price in centavos
    pub price: u64,

    /// The price in reais, e.g. `100.00`
    pub price_display: String,

    pub payment_type: String,
    pub status: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub commission_rate: Option<String>,
    pub facebook_pixel: Option<String>,
    pub google_analytics_pixel: Option<String>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            owner_uuid: product.owner_uuid.into(),
            price_display: format_price(product.price),
            price: product.price,
            name: product.name,
            product_type: product.product_type.to_string(),
            payment_type: product.payment_type.to_string(),
            status: product.status.to_string(),
            description: product.description,
            image_url: product.image_url,
            commission_rate: product.commission_rate.map(|rate| rate.to_string()),
            facebook_pixel: product.facebook_pixel,
            google_analytics_pixel: product.google_analytics_pixel,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// Products, newest first
    pub products: Vec<ProductResponse>,
}
