//! Request-level logging and request IDs.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use salvo::{
    Request, handler,
    http::{StatusCode, header::HeaderValue},
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};
use uuid::Uuid;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_ID_DEPOT_KEY: &str = "request_id";
const MAX_REQUEST_ID_LEN: usize = 128;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);

pub(crate) fn set_slow_request_threshold(threshold_ms: u64) {
    SLOW_REQUEST_THRESHOLD_MS.store(threshold_ms, Ordering::Relaxed);
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let started = Instant::now();

    let request_id = resolve_request_id(req.header::<String>(REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        request_id = %request_id,
        method = %method,
        path = %path,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let status = res.status_code.unwrap_or(StatusCode::OK);
    let duration_ms = started.elapsed().as_millis();
    let threshold_ms = u128::from(SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed));

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(status = status.as_u16(), "server error response");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), "client error response");
        }

        if duration_ms > threshold_ms {
            warn!(duration_ms, threshold_ms, "slow request detected");
        }
    });
}

/// Reuse a caller-supplied id when it is usable, otherwise mint one.
fn resolve_request_id(incoming: Option<String>) -> String {
    incoming
        .map(|value| value.trim().to_string())
        .filter(|value| {
            !value.is_empty()
                && value.len() <= MAX_REQUEST_ID_LEN
                && HeaderValue::from_str(value).is_ok()
        })
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(request_id, "could not encode request id for response header: {source}");
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::{prelude::*, test::TestClient};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn service() -> Service {
        Service::new(Router::new().hoop(request_logging).get(ok))
    }

    #[test]
    fn incoming_request_id_is_reused() {
        assert_eq!(resolve_request_id(Some(" abc-123 ".to_string())), "abc-123");
    }

    #[test]
    fn blank_or_oversized_request_id_is_replaced() {
        let blank = resolve_request_id(Some("   ".to_string()));
        let oversized = resolve_request_id(Some("a".repeat(MAX_REQUEST_ID_LEN + 1)));

        assert!(Uuid::try_parse(&blank).is_ok(), "expected a generated id");
        assert!(Uuid::try_parse(&oversized).is_ok(), "expected a generated id");
    }

    #[tokio::test]
    async fn response_echoes_the_request_id() {
        let res = TestClient::get("http://example.com/")
            .add_header(REQUEST_ID_HEADER, "req-42", true)
            .send(&service())
            .await;

        let echoed = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        assert_eq!(echoed, Some("req-42"));
    }

    #[tokio::test]
    async fn response_gets_a_generated_request_id() {
        let res = TestClient::get("http://example.com/")
            .send(&service())
            .await;

        let generated = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Uuid::try_parse);

        assert!(
            matches!(generated, Some(Ok(_))),
            "expected a uuid request id, got {generated:?}"
        );
    }
}
