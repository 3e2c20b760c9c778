//! Sign-up Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use painel_app::{
    auth::{SignUpForm, validate_sign_up},
    domain::sellers::records::SellerRecord,
};

use crate::{auth::into_status_error, extensions::*, state::State, validation::render_unprocessable};

/// Sign-up Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct SignUpRequest {
    pub name: String,
    pub email: String,
    /// Any formatting; digits are re-masked as `(xx) xxxxx-xxxx`
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
}

impl From<SignUpRequest> for SignUpForm {
    fn from(request: SignUpRequest) -> Self {
        SignUpForm {
            name: request.name,
            email: request.email,
            phone: request.phone,
            password: request.password,
            password_confirmation: request.password_confirmation,
        }
    }
}

/// Registered seller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SellerResponse {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
}

impl From<SellerRecord> for SellerResponse {
    fn from(seller: SellerRecord) -> Self {
        SellerResponse {
            uuid: seller.uuid.into(),
            email: seller.email,
            name: seller.name,
            phone: seller.phone,
        }
    }
}

/// Sign-up Handler
#[endpoint(
    tags("auth"),
    summary = "Register a seller",
    responses(
        (status_code = StatusCode::CREATED, description = "Seller registered"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid sign-up form"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignUpRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let form = SignUpForm::from(json.into_inner());

    let sign_up = match validate_sign_up(&form) {
        Ok(sign_up) => sign_up,
        Err(errors) => return Ok(render_unprocessable(res, errors)),
    };

    let seller = state
        .app
        .auth
        .sign_up(sign_up)
        .await
        .map_err(into_status_error)?;

    tracing::info!(seller_uuid = %seller.uuid, "registered seller");

    res.render(Json(SellerResponse::from(seller)));

    Ok(StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use painel_app::auth::{AuthServiceError, MockAuthService};

    use crate::test_helpers::{TEST_OWNER_UUID, auth_service};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("auth/sign-up").post(handler))
    }

    fn body() -> Value {
        json!({
            "name": "Maria",
            "email": " Maria@Example.com ",
            "phone": "11987654321",
            "password": "segredo",
            "password_confirmation": "segredo",
        })
    }

    #[tokio::test]
    async fn test_sign_up_success_returns_201() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_sign_up()
            .once()
            .withf(|sign_up| {
                sign_up.email == "maria@example.com" && sign_up.phone == "(11) 98765-4321"
            })
            .return_once(|sign_up| {
                Ok(SellerRecord {
                    uuid: TEST_OWNER_UUID,
                    email: sign_up.email,
                    name: sign_up.name,
                    phone: sign_up.phone,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/auth/sign-up")
            .json(&body())
            .send(&make_service(auth))
            .await;

        let seller: SellerResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(seller.uuid, TEST_OWNER_UUID.into_uuid());
        assert_eq!(seller.email, "maria@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_returns_409() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_sign_up()
            .once()
            .return_once(|_| Err(AuthServiceError::AlreadyRegistered));

        let res = TestClient::post("http://example.com/auth/sign-up")
            .json(&body())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_mismatched_passwords_returns_422() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_sign_up().never();

        let mut res = TestClient::post("http://example.com/auth/sign-up")
            .json(&json!({
                "name": "Maria",
                "email": "maria@example.com",
                "phone": "11987654321",
                "password": "segredo",
                "password_confirmation": "outro",
            }))
            .send(&make_service(auth))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body["errors"][0]["field"], "password_confirmation");

        Ok(())
    }
}
