//! Create Product Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use painel_app::domain::products::form::{ProductForm, validate_new_product};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
    validation::render_unprocessable,
};

/// Create Product Handler
///
/// The owner is always the signed-in seller.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid product form"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "products.create", skip(json, depot, res), err)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_uuid_or_401()?;
    let form = ProductForm::from(json.into_inner());

    let new_product = match validate_new_product(&form) {
        Ok(new_product) => new_product,
        Err(errors) => return Ok(render_unprocessable(res, errors)),
    };

    let product = state
        .app
        .products
        .create_product(owner, new_product)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?;

    tracing::info!(product_uuid = %product.uuid, "created product");

    res.render(Json(ProductResponse::from(product)));

    Ok(StatusCode::CREATED)
}
