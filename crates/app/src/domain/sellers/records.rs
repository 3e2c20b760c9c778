//! Seller Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Seller UUID
pub type SellerUuid = TypedUuid<SellerRecord>;

/// Seller Record
///
/// A seller owns every product created under their session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerRecord {
    pub uuid: SellerUuid,
    pub email: String,
    pub name: String,
    /// Phone in the `(xx) xxxxx-xxxx` mask.
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
