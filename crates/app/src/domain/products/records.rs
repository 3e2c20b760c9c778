//! Product Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::sellers::records::SellerUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub owner_uuid: SellerUuid,
    pub name: String,
    pub product_type: ProductType,
    /// Price in centavos.
    pub price: u64,
    pub payment_type: PaymentType,
    pub status: ProductStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub facebook_pixel: Option<String>,
    pub google_analytics_pixel: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Price in reais, with two decimal places.
    #[must_use]
    pub fn price_decimal(&self) -> Decimal {
        Decimal::from(self.price) / Decimal::ONE_HUNDRED
    }
}

/// Raised when a stored or submitted value is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Kind of digital product being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "curso-online")]
    CursoOnline,
    #[serde(rename = "mentoria")]
    Mentoria,
    #[serde(rename = "evento-online")]
    EventoOnline,
}

impl ProductType {
    pub const ALL: [Self; 3] = [Self::CursoOnline, Self::Mentoria, Self::EventoOnline];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CursoOnline => "curso-online",
            Self::Mentoria => "mentoria",
            Self::EventoOnline => "evento-online",
        }
    }
}

/// How buyers are charged for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Unico,
    Recorrente,
}

impl PaymentType {
    pub const ALL: [Self; 2] = [Self::Unico, Self::Recorrente];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unico => "unico",
            Self::Recorrente => "recorrente",
        }
    }
}

/// Whether a product is currently on sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Ativo,
    Inativo,
}

impl ProductStatus {
    pub const ALL: [Self; 2] = [Self::Ativo, Self::Inativo];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ativo => "ativo",
            Self::Inativo => "inativo",
        }
    }
}

fn parse_exact<T: Copy>(
    kind: &'static str,
    variants: &[T],
    as_str: fn(T) -> &'static str,
    value: &str,
) -> Result<T, UnknownVariant> {
    variants
        .iter()
        .copied()
        .find(|variant| as_str(*variant) == value)
        .ok_or_else(|| UnknownVariant {
            kind,
            value: value.to_string(),
        })
}

impl FromStr for ProductType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_exact("product type", &Self::ALL, Self::as_str, value)
    }
}

impl FromStr for PaymentType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_exact("payment type", &Self::ALL, Self::as_str, value)
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_exact("status", &Self::ALL, Self::as_str, value)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_their_wire_values() {
        for product_type in ProductType::ALL {
            assert_eq!(product_type.as_str().parse(), Ok(product_type));
        }

        for payment_type in PaymentType::ALL {
            assert_eq!(payment_type.as_str().parse(), Ok(payment_type));
        }

        for status in ProductStatus::ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }

    #[test]
    fn enums_reject_case_variants() {
        assert!("Curso-Online".parse::<ProductType>().is_err());
        assert!("UNICO".parse::<PaymentType>().is_err());
        assert!(" ativo".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn serde_uses_wire_values() -> Result<(), serde_json::Error> {
        assert_eq!(
            serde_json::to_string(&ProductType::EventoOnline)?,
            "\"evento-online\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentType>("\"recorrente\"")?,
            PaymentType::Recorrente
        );

        Ok(())
    }
}
