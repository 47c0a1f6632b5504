//! tests/api_tests.rs - HTTP routes and status code mapping

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::IntoResponse,
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::api::{create_router, ApiError};
    use crate::config::Config;
    use crate::db::StoreError;
    use crate::rate_limit::RateLimiter;
    use crate::service::LookupError;
    use crate::state::AppState;
    use crate::tests::mocks::*;
    use crate::validation::ValidationError;

    fn app(store: MemoryStore, upstream: MockUpstream, max_requests: u64) -> Router {
        let counters = Arc::new(CountingCounterStore::new(Duration::from_secs(60)));
        let limiter = RateLimiter::new(counters, max_requests);
        let state = AppState::new(
            Config::default(),
            Arc::new(store),
            limiter,
            Arc::new(upstream),
        );
        create_router(Arc::new(state))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ping() {
        let (status, body) = get(app(MemoryStore::new(), MockUpstream::new(), 10), "/ping").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["environment"], "dev");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_address_lookup_returns_record() {
        let upstream = MockUpstream::new().with_address(Ok(address_payload(Some(500), &[true, false])));
        let uri = format!("/address/{}", SATOSHI_ADDRESS);

        let (status, body) = get(app(MemoryStore::new(), upstream, 10), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], SATOSHI_ADDRESS);
        assert_eq!(body["balance"], 500);
        assert_eq!(body["transaction_count"], 1);
    }

    #[tokio::test]
    async fn test_invalid_address_is_bad_request() {
        let (status, body) = get(app(MemoryStore::new(), MockUpstream::new(), 10), "/address/nope").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid Bitcoin address format"));
    }

    #[tokio::test]
    async fn test_unknown_address_with_upstream_down_is_not_found() {
        let upstream = MockUpstream::new().with_address(Err("down"));
        let uri = format!("/address/{}", SATOSHI_ADDRESS);

        let (status, body) = get(app(MemoryStore::new(), upstream, 10), &uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains(SATOSHI_ADDRESS));
    }

    #[tokio::test]
    async fn test_rate_limited_is_429() {
        let uri = format!("/address/{}", SATOSHI_ADDRESS);

        let (status, body) = get(app(MemoryStore::new(), MockUpstream::new(), 0), &uri).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "too many requests");
    }

    #[tokio::test]
    async fn test_transaction_routes() {
        let store = MemoryStore::new();
        store.seed_transaction(TX_HASH);
        let router = app(store, MockUpstream::new().with_transaction(Err("down")), 10);

        let (status, body) = get(router.clone(), &format!("/transaction/{}", TX_HASH)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hash"], TX_HASH);
        assert_eq!(body["fees"], 1000);

        let (status, _) = get(router.clone(), "/transaction/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(router, &format!("/transaction/{}", "b".repeat(64))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_upstream_rejection_is_bad_request() {
        let upstream = MockUpstream::new()
            .with_transaction(Ok(crate::blockchain::TransactionPayload::rejected("Transaction not found.")));

        let (status, body) = get(
            app(MemoryStore::new(), upstream, 10),
            &format!("/transaction/{}", TX_HASH),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Transaction not found.");
    }

    #[test]
    fn test_lookup_error_status_mapping() {
        let cases = [
            (
                LookupError::InvalidFormat(ValidationError::InvalidHashLength(3)),
                StatusCode::BAD_REQUEST,
            ),
            (LookupError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (LookupError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (LookupError::UpstreamRejected("x".into()), StatusCode::BAD_REQUEST),
            (LookupError::UpstreamUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                LookupError::Storage(StoreError::NotFound("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let api_error = ApiError::from(err);
            assert_eq!(api_error.status(), expected);
            assert_eq!(api_error.into_response().status(), expected);
        }
    }
}
