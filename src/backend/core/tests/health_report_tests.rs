//! End-to-end tests for the health report endpoint.
//!
//! Tests cover:
//! - Empty probe sets
//! - Mixed success, failure, panic and timeout outcomes
//! - Bounded report latency
//! - Wire format of the response body
//! - Concurrent report requests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use healthgate_core::api::build_router;
use healthgate_core::health::ABORTED_MESSAGE;
use healthgate_core::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

// ============================================================================
// Helpers
// ============================================================================

fn router(probes: ProbeSet, deadline: Duration) -> Router {
    let service = HealthService::new(probes).with_check_timeout(deadline);
    build_router(Arc::new(service), "/health")
}

async fn get_health(app: Router) -> (StatusCode, Vec<ProbeResult>) {
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let length: usize = response.headers()[header::CONTENT_LENGTH]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.len(), length);
    (status, serde_json::from_slice(&body).unwrap())
}

fn never_returns() -> Arc<dyn Probe> {
    probe_fn(|| loop {
        std::thread::park();
    })
}

fn find<'a>(results: &'a [ProbeResult], name: &str) -> &'a ProbeResult {
    results
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("missing result for {}", name))
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_without_probes() {
    let (status, results) = get_health(router(ProbeSet::new(), Duration::from_secs(5))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_all_healthy_returns_200() {
    let probes = ProbeSet::new()
        .with_probe("cache", probe_fn(|| Ok(())))
        .with_probe("queue", probe_fn(|| Ok(())));

    let (status, results) = get_health(router(probes, Duration::from_secs(5))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.state, ProbeState::Healthy);
        assert!(result.error.is_none());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mixed_probes_degrade_the_report() {
    let probes = ProbeSet::new()
        .with_probe("a", probe_fn(|| Ok(())))
        .with_probe("b", probe_fn(|| Err(ProbeError::new("db down"))))
        .with_probe("c", never_returns());

    let start = Instant::now();
    let (status, results) = get_health(router(probes, Duration::from_secs(3))).await;
    let elapsed = start.elapsed();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(results.len(), 3);

    let a = find(&results, "a");
    assert_eq!(a.state, ProbeState::Healthy);
    assert!(a.error.is_none());

    let b = find(&results, "b");
    assert_eq!(b.state, ProbeState::Unhealthy);
    assert_eq!(b.error.as_deref(), Some("db down"));

    let c = find(&results, "c");
    assert_eq!(c.state, ProbeState::Unhealthy);
    assert!(c.error.as_deref().unwrap().contains("deadline exceeded"));

    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_secs(4), "report took {:?}", elapsed);
}

#[tokio::test]
async fn test_panicking_probe_is_reported() {
    let probes = ProbeSet::new()
        .with_probe("ok", probe_fn(|| Ok(())))
        .with_probe("boom", probe_fn(|| panic!("boom")));

    let (status, results) = get_health(router(probes, Duration::from_secs(5))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(find(&results, "ok").state, ProbeState::Healthy);

    let boom = find(&results, "boom");
    assert_eq!(boom.state, ProbeState::Unhealthy);
    assert_eq!(boom.error.as_deref(), Some("boom"));
}

#[tokio::test]
async fn test_opaque_panic_keeps_its_slot() {
    let probes = ProbeSet::new()
        .with_probe("ok", probe_fn(|| Ok(())))
        .with_probe("opaque", probe_fn(|| std::panic::panic_any(vec![1_u8, 2, 3])));

    let start = Instant::now();
    let (status, results) = get_health(router(probes, Duration::from_secs(5))).await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(results.len(), 2);
    assert_eq!(
        find(&results, "opaque").error.as_deref(),
        Some(ABORTED_MESSAGE)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_latency_is_max_not_sum() {
    let mut probes = ProbeSet::new();
    for i in 0..5 {
        probes.register(
            format!("slow-{}", i),
            probe_fn(|| {
                std::thread::sleep(Duration::from_millis(300));
                Ok(())
            }),
        );
    }

    let start = Instant::now();
    let (status, results) = get_health(router(probes, Duration::from_secs(2))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.len(), 5);
    assert!(start.elapsed() < Duration::from_millis(1200));
}

#[tokio::test]
async fn test_healthy_entries_omit_error_field() {
    let probes = ProbeSet::new()
        .with_probe("up", probe_fn(|| Ok(())))
        .with_probe("down", probe_fn(|| Err(ProbeError::new("refused"))));
    let app = router(probes, Duration::from_secs(5));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let entries: Vec<Value> = serde_json::from_slice(&body).unwrap();

    for entry in &entries {
        let object = entry.as_object().unwrap();
        assert!(object.contains_key("name"));
        assert!(object.contains_key("time"));
        match object["state"].as_str().unwrap() {
            "healthy" => assert!(!object.contains_key("error")),
            "unhealthy" => assert_eq!(object["error"], "refused"),
            other => panic!("unexpected state {}", other),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_run_probes_independently() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let probes = ProbeSet::new().with_probe(
        "counted",
        probe_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(50));
            Ok(())
        }),
    );
    let app = router(probes, Duration::from_secs(2));

    let requests: Vec<_> = (0..4).map(|_| get_health(app.clone())).collect();
    let responses = futures::future::join_all(requests).await;

    for (status, results) in responses {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results.len(), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_custom_path() {
    let service = Arc::new(HealthService::new(ProbeSet::new()));
    let app = build_router(service, "/healthz");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
