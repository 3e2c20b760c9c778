//! App Router

use salvo::Router;

use crate::{auth, healthcheck, products};

/// Every API route. Expects `Arc<State>` to be injected by an outer hoop.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("auth")
                .push(Router::with_path("sign-up").post(auth::handlers::sign_up::handler))
                .push(Router::with_path("sign-in").post(auth::handlers::sign_in::handler))
                .push(
                    Router::new()
                        .hoop(auth::middleware::handler)
                        .push(Router::with_path("sign-out").post(auth::handlers::sign_out::handler))
                        .push(Router::with_path("session").get(auth::handlers::session::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .hoop(auth::middleware::handler)
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}
