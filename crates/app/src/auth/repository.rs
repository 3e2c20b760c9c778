//! Auth repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::{
        SessionTokenVersion,
        models::{ActiveSession, NewSession, SellerLogin},
    },
    domain::sellers::records::{SellerRecord, SellerUuid},
};

const CREATE_SELLER_SQL: &str = include_str!("sql/create_seller.sql");
const FIND_SELLER_BY_EMAIL_SQL: &str = include_str!("sql/find_seller_by_email.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const FIND_ACTIVE_SESSION_SQL: &str = include_str!("sql/find_active_session.sql");
const REVOKE_SESSION_SQL: &str = include_str!("sql/revoke_session.sql");

/// Seller row to insert at sign-up.
#[derive(Debug)]
pub(crate) struct NewSellerRow<'a> {
    pub uuid: SellerUuid,
    pub email: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_seller(
        &self,
        seller: NewSellerRow<'_>,
    ) -> Result<SellerRecord, sqlx::Error> {
        query_as::<Postgres, SellerRecord>(CREATE_SELLER_SQL)
            .bind(seller.uuid.into_uuid())
            .bind(seller.email)
            .bind(seller.name)
            .bind(seller.phone)
            .bind(seller.password_hash)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_seller_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SellerLogin>, sqlx::Error> {
        query_as::<Postgres, SellerLogin>(FIND_SELLER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn create_session(&self, session: &NewSession) -> Result<(), sqlx::Error> {
        query(CREATE_SESSION_SQL)
            .bind(session.uuid)
            .bind(session.seller_uuid.into_uuid())
            .bind(session.version.as_i16())
            .bind(&session.token_hash)
            .bind(SqlxTimestamp::from(session.expires_at))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Unrevoked, unexpired session with the given id and version.
    pub(crate) async fn find_active_session(
        &self,
        session: Uuid,
        version: SessionTokenVersion,
    ) -> Result<Option<ActiveSession>, sqlx::Error> {
        query_as::<Postgres, ActiveSession>(FIND_ACTIVE_SESSION_SQL)
            .bind(session)
            .bind(version.as_i16())
            .fetch_optional(&self.pool)
            .await
    }

    /// Revoke a session. Returns `true` if it was still active.
    pub(crate) async fn revoke_session(&self, session: Uuid) -> Result<bool, sqlx::Error> {
        let rows_affected = query(REVOKE_SESSION_SQL)
            .bind(session)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

impl<'r> FromRow<'r, PgRow> for SellerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SellerUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SellerLogin {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SellerUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ActiveSession {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let version = SessionTokenVersion::try_from(row.try_get::<i16, _>("version")?)
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "version".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            seller_uuid: SellerUuid::from_uuid(row.try_get("seller_uuid")?),
            email: row.try_get("email")?,
            version,
            token_hash: row.try_get("token_hash")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
        })
    }
}
