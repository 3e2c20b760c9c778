//! Product form validation.
//!
//! Raw form input arrives as text (the price as localized currency, e.g.
//! `"R$ 1.234,56"`). The validator either produces a fully typed payload or
//! every field error it found.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{
    domain::products::{
        data::{NewProduct, ProductUpdate},
        records::{PaymentType, ProductRecord, ProductStatus, ProductType},
    },
    validation::{ValidationErrors, optional_text},
};

const CURRENCY_SYMBOL: &str = "R$";
const MAX_FRACTION_DIGITS: u32 = 2;

/// Raw product form input, exactly as typed by the seller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub product_type: String,
    pub price: String,
    pub payment_type: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub commission_rate: Option<String>,
    pub facebook_pixel: Option<String>,
    pub google_analytics_pixel: Option<String>,
}

impl From<&ProductRecord> for ProductForm {
    fn from(product: &ProductRecord) -> Self {
        Self {
            name: product.name.clone(),
            product_type: product.product_type.as_str().to_string(),
            price: format_price(product.price),
            payment_type: product.payment_type.as_str().to_string(),
            status: Some(product.status.as_str().to_string()),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            commission_rate: product.commission_rate.map(|rate| rate.to_string()),
            facebook_pixel: product.facebook_pixel.clone(),
            google_analytics_pixel: product.google_analytics_pixel.clone(),
        }
    }
}

impl From<&NewProduct> for ProductForm {
    fn from(product: &NewProduct) -> Self {
        Self {
            name: product.name.clone(),
            product_type: product.product_type.as_str().to_string(),
            price: format_price(product.price),
            payment_type: product.payment_type.as_str().to_string(),
            status: Some(product.status.as_str().to_string()),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            commission_rate: product.commission_rate.map(|rate| rate.to_string()),
            facebook_pixel: product.facebook_pixel.clone(),
            google_analytics_pixel: product.google_analytics_pixel.clone(),
        }
    }
}

impl From<&ProductUpdate> for ProductForm {
    fn from(update: &ProductUpdate) -> Self {
        Self {
            name: update.name.clone(),
            product_type: update.product_type.as_str().to_string(),
            price: format_price(update.price),
            payment_type: update.payment_type.as_str().to_string(),
            status: Some(update.status.as_str().to_string()),
            description: update.description.clone(),
            image_url: update.image_url.clone(),
            commission_rate: update.commission_rate.map(|rate| rate.to_string()),
            facebook_pixel: update.facebook_pixel.clone(),
            google_analytics_pixel: update.google_analytics_pixel.clone(),
        }
    }
}

/// Product form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Name,
    ProductType,
    Price,
    PaymentType,
    Status,
    ImageUrl,
    CommissionRate,
    /// The payload as a whole, e.g. when the store rejects it.
    Payload,
}

impl ProductField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ProductType => "product_type",
            Self::Price => "price",
            Self::PaymentType => "payment_type",
            Self::Status => "status",
            Self::ImageUrl => "image_url",
            Self::CommissionRate => "commission_rate",
            Self::Payload => "payload",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product form validation errors.
pub type ProductFormErrors = ValidationErrors<ProductField>;

/// Reasons a price input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is required")]
    Empty,

    #[error("price must be a number")]
    NotNumeric,

    #[error("price cannot be negative")]
    Negative,

    #[error("price cannot have more than two decimal places")]
    TooPrecise,

    #[error("price is too large")]
    TooLarge,
}

/// Reasons a commission rate input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommissionRateError {
    #[error("commission rate must be a number")]
    NotNumeric,

    #[error("commission rate must be between 0 and 100")]
    OutOfRange,

    #[error("commission rate cannot have more than two decimal places")]
    TooPrecise,
}

/// Validate a create form.
///
/// A missing status defaults to `ativo`.
///
/// # Errors
///
/// Returns every field error found in the form.
pub fn validate_new_product(form: &ProductForm) -> Result<NewProduct, ProductFormErrors> {
    let mut errors = ProductFormErrors::new();
    let fields = validate_common(form, &mut errors);

    let status = match form.status.as_deref().map(str::trim) {
        None | Some("") => Some(ProductStatus::default()),
        Some(status) => parse_variant(status, ProductField::Status, &mut errors),
    };

    match (fields, status) {
        (Some(fields), Some(status)) if errors.is_empty() => Ok(NewProduct {
            name: fields.name,
            product_type: fields.product_type,
            price: fields.price,
            payment_type: fields.payment_type,
            status,
            description: fields.description,
            image_url: fields.image_url,
            commission_rate: fields.commission_rate,
            facebook_pixel: fields.facebook_pixel,
            google_analytics_pixel: fields.google_analytics_pixel,
        }),
        _ => Err(errors),
    }
}

/// Validate an edit form. Unlike creation, the status is required.
///
/// # Errors
///
/// Returns every field error found in the form.
pub fn validate_product_update(form: &ProductForm) -> Result<ProductUpdate, ProductFormErrors> {
    let mut errors = ProductFormErrors::new();
    let fields = validate_common(form, &mut errors);

    let status = match form.status.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(ProductField::Status, "status is required");

            None
        }
        Some(status) => parse_variant(status, ProductField::Status, &mut errors),
    };

    match (fields, status) {
        (Some(fields), Some(status)) if errors.is_empty() => Ok(ProductUpdate {
            name: fields.name,
            product_type: fields.product_type,
            price: fields.price,
            payment_type: fields.payment_type,
            status,
            description: fields.description,
            image_url: fields.image_url,
            commission_rate: fields.commission_rate,
            facebook_pixel: fields.facebook_pixel,
            google_analytics_pixel: fields.google_analytics_pixel,
        }),
        _ => Err(errors),
    }
}

struct CommonFields {
    name: String,
    product_type: ProductType,
    price: u64,
    payment_type: PaymentType,
    description: Option<String>,
    image_url: Option<String>,
    commission_rate: Option<Decimal>,
    facebook_pixel: Option<String>,
    google_analytics_pixel: Option<String>,
}

fn validate_common(form: &ProductForm, errors: &mut ProductFormErrors) -> Option<CommonFields> {
    let name = form.name.trim();

    if name.is_empty() {
        errors.push(ProductField::Name, "name is required");
    }

    let product_type = required_variant(&form.product_type, ProductField::ProductType, errors);
    let payment_type = required_variant(&form.payment_type, ProductField::PaymentType, errors);

    let price = parse_price(&form.price)
        .map_err(|error| errors.push(ProductField::Price, error.to_string()))
        .ok();

    let commission_rate = match optional_text(form.commission_rate.as_deref()) {
        None => Ok(None),
        Some(rate) => parse_commission_rate(&rate).map(Some),
    }
    .map_err(|error| errors.push(ProductField::CommissionRate, error.to_string()))
    .ok();

    let image_url = optional_text(form.image_url.as_deref());

    if let Some(url) = &image_url
        && !is_absolute_http_url(url)
    {
        errors.push(ProductField::ImageUrl, "image url must be an http(s) address");
    }

    Some(CommonFields {
        name: name.to_string(),
        product_type: product_type?,
        price: price?,
        payment_type: payment_type?,
        description: optional_text(form.description.as_deref()),
        image_url,
        commission_rate: commission_rate?,
        facebook_pixel: optional_text(form.facebook_pixel.as_deref()),
        google_analytics_pixel: optional_text(form.google_analytics_pixel.as_deref()),
    })
}

fn required_variant<T: FromStr>(
    value: &str,
    field: ProductField,
    errors: &mut ProductFormErrors,
) -> Option<T> {
    if value.trim().is_empty() {
        errors.push(field, format!("{} is required", field.as_str().replace('_', " ")));

        return None;
    }

    parse_variant(value, field, errors)
}

fn parse_variant<T: FromStr>(
    value: &str,
    field: ProductField,
    errors: &mut ProductFormErrors,
) -> Option<T> {
    value
        .parse::<T>()
        .map_err(|_unknown| {
            errors.push(
                field,
                format!("unknown {} \"{value}\"", field.as_str().replace('_', " ")),
            );
        })
        .ok()
}

fn is_absolute_http_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Parse a localized currency amount into centavos.
///
/// Accepts an optional `R$` prefix, `.` thousands separators and a `,`
/// decimal separator (`"R$ 1.234,56"`). Without a comma, a single `.`
/// followed by one or two digits is read as the decimal separator
/// (`"100.00"`).
///
/// # Errors
///
/// Returns a [`PriceError`] describing why the input is not a valid price.
pub fn parse_price(input: &str) -> Result<u64, PriceError> {
    let compact: String = input
        .trim()
        .trim_start_matches(CURRENCY_SYMBOL)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(PriceError::Empty);
    }

    let (negative, digits) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.as_str()),
    };

    let canonical = canonical_decimal(digits).ok_or(PriceError::NotNumeric)?;
    let amount = Decimal::from_str(&canonical).map_err(|_invalid| PriceError::NotNumeric)?;

    if negative && !amount.is_zero() {
        return Err(PriceError::Negative);
    }

    if amount.scale() > MAX_FRACTION_DIGITS {
        return Err(PriceError::TooPrecise);
    }

    // Prices are stored in a BIGINT column.
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .and_then(|minor| u64::try_from(minor).ok())
        .ok_or(PriceError::TooLarge)
}

/// Rewrite localized digits (`1.234,56`) into `1234.56`.
fn canonical_decimal(digits: &str) -> Option<String> {
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let (integer, fraction) = match digits.split_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => match digits.rsplit_once('.') {
            Some((integer, fraction))
                if !fraction.is_empty() && fraction.len() <= 2 && !integer.contains('.') =>
            {
                (integer, Some(fraction))
            }
            _ => (digits, None),
        },
    };

    let integer = strip_thousands(integer)?;

    match fraction {
        None => Some(integer),
        Some(fraction) if !fraction.is_empty() && fraction.chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("{integer}.{fraction}"))
        }
        Some(_) => None,
    }
}

/// Remove `.` thousands separators, requiring groups of exactly three digits.
fn strip_thousands(integer: &str) -> Option<String> {
    let mut groups = integer.split('.');
    let head = groups.next()?;

    if head.is_empty() || !head.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut joined = head.to_string();

    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        joined.push_str(group);
    }

    Some(joined)
}

/// Parse a commission percentage within `[0, 100]`.
///
/// # Errors
///
/// Returns a [`CommissionRateError`] when the value is not a number, is out
/// of range, or has more than two decimal places.
pub fn parse_commission_rate(input: &str) -> Result<Decimal, CommissionRateError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    let rate = Decimal::from_str(&trimmed.replace(',', "."))
        .map_err(|_invalid| CommissionRateError::NotNumeric)?;

    if rate.is_sign_negative() && !rate.is_zero() || rate > Decimal::ONE_HUNDRED {
        return Err(CommissionRateError::OutOfRange);
    }

    if rate.scale() > MAX_FRACTION_DIGITS {
        return Err(CommissionRateError::TooPrecise);
    }

    Ok(rate)
}

/// Format centavos as a plain decimal string (`10050` → `"100.50"`).
#[must_use]
pub fn format_price(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
