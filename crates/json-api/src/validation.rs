//! Field-error responses shared by form-backed endpoints.

use std::fmt::Display;

use painel_app::validation::ValidationErrors;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// One rejected form field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FieldErrorResponse {
    /// Field name, as sent in the request body
    pub field: String,

    /// Why the value was rejected
    pub message: String,
}

/// Unprocessable entity response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidationErrorResponse {
    pub errors: Vec<FieldErrorResponse>,
}

impl<F: Display> From<ValidationErrors<F>> for ValidationErrorResponse {
    fn from(errors: ValidationErrors<F>) -> Self {
        Self {
            errors: errors
                .into_iter()
                .map(|error| FieldErrorResponse {
                    field: error.field.to_string(),
                    message: error.message,
                })
                .collect(),
        }
    }
}

/// Render field errors as a 422 body.
pub(crate) fn render_unprocessable<F: Display>(
    res: &mut Response,
    errors: ValidationErrors<F>,
) -> StatusCode {
    res.render(Json(ValidationErrorResponse::from(errors)));

    StatusCode::UNPROCESSABLE_ENTITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_keeps_field_order() {
        let mut errors = ValidationErrors::new();

        errors.push("name", "name is required");
        errors.push("price", "price must be a number");

        let response = ValidationErrorResponse::from(errors);
        let fields: Vec<_> = response.errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(fields, ["name", "price"]);
    }
}
