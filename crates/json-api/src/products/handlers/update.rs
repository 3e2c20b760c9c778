//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use painel_app::domain::products::form::{ProductForm, validate_product_update};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
    validation::render_unprocessable,
};

/// Product Update Handler
///
/// Replaces every mutable field of the product.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid product form"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot, res),
    fields(
        owner_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_uuid_or_401()?;
    let product = product.into_inner();
    let form = ProductForm::from(json.into_inner());

    let span = tracing::Span::current();

    span.record("owner_uuid", tracing::field::display(owner));
    span.record("product_uuid", tracing::field::display(product));

    let update = match validate_product_update(&form) {
        Ok(update) => update,
        Err(errors) => return Ok(render_unprocessable(res, errors)),
    };

    let updated = state
        .app
        .products
        .update_product(owner, product.into(), update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, price = updated.price, "updated product");

    res.render(Json(ProductResponse::from(updated)));

    Ok(StatusCode::OK)
}
