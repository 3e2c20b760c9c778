//! Products Data
//!
//! Payloads accepted by the products service. Both are produced by the form
//! validator in [`super::form`] and cannot be assembled outside this crate.

use rust_decimal::Decimal;

use crate::domain::products::records::{PaymentType, ProductStatus, ProductType};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct NewProduct {
    pub name: String,
    pub product_type: ProductType,
    pub price: u64,
    pub payment_type: PaymentType,
    pub status: ProductStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub facebook_pixel: Option<String>,
    pub google_analytics_pixel: Option<String>,
}

/// Product Update Data
///
/// Replaces every mutable field of the stored product.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ProductUpdate {
    pub name: String,
    pub product_type: ProductType,
    pub price: u64,
    pub payment_type: PaymentType,
    pub status: ProductStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub facebook_pixel: Option<String>,
    pub google_analytics_pixel: Option<String>,
}
