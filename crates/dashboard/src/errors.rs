//! Catalog errors.

use painel_app::domain::products::form::{ProductField, ProductFormErrors};
use thiserror::Error;

/// Failures surfaced by the catalog repository and controllers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Field-level rejection. Client-side validation failures never reach
    /// the repository.
    #[error("invalid product: {0}")]
    Validation(ProductFormErrors),

    /// No session, or the session is no longer accepted.
    #[error("session expired, sign in again")]
    Auth,

    #[error("product not found")]
    NotFound,

    /// Retryable failure; the view stays usable.
    #[error("catalog request failed: {0}")]
    Repository(String),

    /// The same mutation for the same product is already in flight.
    #[error("an identical change is already in progress")]
    Busy,
}

impl CatalogError {
    /// A store-side rejection that is not tied to a single field.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        let mut errors = ProductFormErrors::new();

        errors.push(ProductField::Payload, message);

        Self::Validation(errors)
    }
}
