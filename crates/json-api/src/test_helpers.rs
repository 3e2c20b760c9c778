//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use painel_app::{
    auth::{Identity, MockAuthService, SessionToken},
    context::AppContext,
    domain::{
        products::{
            MockProductsService,
            records::{PaymentType, ProductRecord, ProductStatus, ProductType, ProductUuid},
        },
        sellers::records::SellerUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_OWNER_UUID: SellerUuid = SellerUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_SESSION_TOKEN: &str = "pn_v1_test";

pub(crate) fn make_identity() -> Identity {
    Identity {
        session_uuid: Uuid::nil(),
        seller_uuid: TEST_OWNER_UUID,
        email: "seller@example.com".to_string(),
        expires_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        owner_uuid: TEST_OWNER_UUID,
        name: "Curso X".to_string(),
        product_type: ProductType::CursoOnline,
        price: 10_000,
        payment_type: PaymentType::Unico,
        status: ProductStatus::Ativo,
        description: None,
        image_url: None,
        commission_rate: None,
        facebook_pixel: None,
        google_analytics_pixel: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

#[salvo::handler]
pub(crate) async fn inject_identity(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(make_identity(), SessionToken::new(TEST_SESSION_TOKEN));
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_sign_up().never();
    auth.expect_sign_in().never();
    auth.expect_sign_out().never();
    auth.expect_get_session().never();

    auth
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

fn state(products: MockProductsService, auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        products: Arc::new(products),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    state(products, strict_auth_mock())
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_products_mock(), auth)
}

fn signed_in_service(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_identity)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    signed_in_service(state_with_products(products), route)
}

pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    signed_in_service(state_with_auth(auth), route)
}
