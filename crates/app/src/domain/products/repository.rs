//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    products::records::{
        PaymentType, ProductRecord, ProductStatus, ProductType, ProductUuid,
    },
    sellers::records::SellerUuid,
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

/// Column values shared by inserts and full updates.
#[derive(Debug)]
pub(crate) struct ProductColumns<'a> {
    pub name: &'a str,
    pub product_type: ProductType,
    pub price: u64,
    pub payment_type: PaymentType,
    pub status: ProductStatus,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub commission_rate: Option<Decimal>,
    pub facebook_pixel: Option<&'a str>,
    pub google_analytics_pixel: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Products visible in the current owner context, newest first.
    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a product owned by the seller set on the transaction.
    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        columns: ProductColumns<'_>,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = price_to_i64(columns.price)?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(columns.name)
            .bind(columns.product_type.as_str())
            .bind(price)
            .bind(columns.payment_type.as_str())
            .bind(columns.status.as_str())
            .bind(columns.description)
            .bind(columns.image_url)
            .bind(columns.commission_rate)
            .bind(columns.facebook_pixel)
            .bind(columns.google_analytics_pixel)
            .fetch_one(&mut **tx)
            .await
    }

    /// Replace every mutable column of a product.
    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        columns: ProductColumns<'_>,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = price_to_i64(columns.price)?;

        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(columns.name)
            .bind(columns.product_type.as_str())
            .bind(price)
            .bind(columns.payment_type.as_str())
            .bind(columns.status.as_str())
            .bind(columns.description)
            .bind(columns.image_url)
            .bind(columns.commission_rate)
            .bind(columns.facebook_pixel)
            .bind(columns.google_analytics_pixel)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn price_to_i64(price: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(price).map_err(|e| sqlx::Error::ColumnDecode {
        index: "price".to_string(),
        source: Box::new(e),
    })
}

fn decode_variant<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price_i64: i64 = row.try_get("price")?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            owner_uuid: SellerUuid::from_uuid(row.try_get("owner_uuid")?),
            name: row.try_get("name")?,
            product_type: decode_variant(row, "product_type")?,
            price,
            payment_type: decode_variant(row, "payment_type")?,
            status: decode_variant(row, "status")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            commission_rate: row.try_get("commission_rate")?,
            facebook_pixel: row.try_get("facebook_pixel")?,
            google_analytics_pixel: row.try_get("google_analytics_pixel")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
