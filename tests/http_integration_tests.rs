//! Integration Tests for HTTP Endpoints
//!
//! Tests the full request/response cycle against a stub tabular backend:
//! the refresh webhook's auth and failure modes, cached reads, and
//! write-triggered invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use tabcache::api::create_router;
use tabcache::cache::{CacheStore, ResourceCatalog, TtlSettings};
use tabcache::client::{RangeRequest, RowSet, SharedTableClient, StaticConnector, TableService};
use tabcache::error::{Result, ServiceError};
use tabcache::gateway::TableGateway;
use tabcache::AppState;

const SECRET: &str = "test-secret";

// == Stub Backend ==

#[derive(Default)]
struct StubBackend {
    rows: Mutex<HashMap<String, Vec<Vec<String>>>>,
    fetches: AtomicUsize,
    fail_reads: AtomicBool,
}

impl StubBackend {
    fn put(&self, resource: &str, rows: Vec<Vec<String>>) {
        self.rows
            .lock()
            .unwrap()
            .insert(resource.to_string(), rows);
    }

    fn snapshot(&self, resource: &str) -> Vec<Vec<String>> {
        self.rows
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TableService for StubBackend {
    async fn fetch_range(&self, resource: &str, range: &str) -> Result<RowSet> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::BackendFetch("backend offline".to_string()));
        }
        Ok(RowSet {
            resource: resource.to_string(),
            range: range.to_string(),
            rows: self.snapshot(resource),
        })
    }

    async fn fetch_batch(&self, requests: &[RangeRequest]) -> Result<Vec<RowSet>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::BackendFetch("backend offline".to_string()));
        }
        Ok(requests
            .iter()
            .map(|r| RowSet {
                resource: r.resource.clone(),
                range: r.range.clone(),
                rows: self.snapshot(&r.resource),
            })
            .collect())
    }

    async fn append_row(&self, resource: &str, values: &[String]) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .push(values.to_vec());
        Ok(())
    }

    async fn update_row(&self, resource: &str, index: usize, values: &[String]) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let table = rows.entry(resource.to_string()).or_default();
        if index >= table.len() {
            return Err(ServiceError::BackendFetch(format!(
                "row {} out of bounds",
                index
            )));
        }
        table[index] = values.to_vec();
        Ok(())
    }

    async fn delete_row(&self, resource: &str, index: usize) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let table = rows.entry(resource.to_string()).or_default();
        if index >= table.len() {
            return Err(ServiceError::BackendFetch(format!(
                "row {} out of bounds",
                index
            )));
        }
        table.remove(index);
        Ok(())
    }
}

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<StubBackend>) {
    let backend = Arc::new(StubBackend::default());
    backend.put("users", vec![vec!["alice".to_string(), "open".to_string()]]);

    let store = CacheStore::new(100);
    let client = SharedTableClient::new(Box::new(StaticConnector::new(backend.clone())));
    let gateway = TableGateway::new(
        store,
        client,
        TtlSettings::default(),
        ResourceCatalog::new(
            vec!["categories".to_string()],
            vec!["users".to_string()],
        ),
    );
    let state = AppState::new(gateway, SECRET);
    (create_router(state), backend)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn refresh_request(auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/refresh")
        .header("content-type", "application/json");
    if let Some(token) = auth {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_rows_request(resource: &str, range: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/tables/{}/rows?range={}", resource, range))
        .body(Body::empty())
        .unwrap()
}

// == Health & Stats Endpoints ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _backend) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_stats_reflect_reads() {
    let (app, _backend) = create_test_app();

    // miss then hit
    app.clone()
        .oneshot(get_rows_request("users", "A:H"))
        .await
        .unwrap();
    app.clone()
        .oneshot(get_rows_request("users", "A:H"))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
}

// == Read Endpoints ==

#[tokio::test]
async fn test_read_rows_success() {
    let (app, _backend) = create_test_app();

    let response = app.oneshot(get_rows_request("users", "A:H")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["resource"], "users");
    assert_eq!(json["range"], "A:H");
    assert_eq!(json["rows"][0][0], "alice");
}

#[tokio::test]
async fn test_read_rows_is_cached() {
    let (app, backend) = create_test_app();

    app.clone()
        .oneshot(get_rows_request("users", "A:H"))
        .await
        .unwrap();
    app.oneshot(get_rows_request("users", "A:H")).await.unwrap();

    assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_read_rows_backend_failure_is_500() {
    let (app, backend) = create_test_app();
    backend.fail_reads.store(true, Ordering::SeqCst);

    let response = app.oneshot(get_rows_request("users", "A:H")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_batch_read_endpoint() {
    let (app, backend) = create_test_app();
    backend.put("tickets", vec![vec!["T-1".to_string()]]);

    let body = r#"{"requests":[{"resource":"users","range":"A:H"},{"resource":"tickets","range":"B:C"}]}"#;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tables/batch")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
}

// == Mutation Endpoints ==

#[tokio::test]
async fn test_append_then_read_sees_new_row() {
    let (app, backend) = create_test_app();

    // warm the canonical entry
    app.clone()
        .oneshot(get_rows_request("users", "A:Z"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tables/users/rows")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"values":["bob","open"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_rows_request("users", "A:Z")).await.unwrap();
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["rows"].as_array().unwrap().len(), 2);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_update_row_endpoint() {
    let (app, _backend) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/tables/users/rows/0")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"values":["alice","closed"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_rows_request("users", "A:Z")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["rows"][0][1], "closed");
}

#[tokio::test]
async fn test_append_empty_values_is_400() {
    let (app, _backend) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tables/users/rows")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"values":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Refresh Webhook ==

#[tokio::test]
async fn test_refresh_missing_token_is_401_and_touches_nothing() {
    let (app, backend) = create_test_app();

    let response = app
        .oneshot(refresh_request(None, r#"{"resource":"users","range":"A:H"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_wrong_token_is_403_and_touches_nothing() {
    let (app, backend) = create_test_app();

    let response = app
        .oneshot(refresh_request(
            Some("not-the-secret"),
            r#"{"resource":"users","range":"A:H"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_missing_range_is_400() {
    let (app, backend) = create_test_app();

    let response = app
        .oneshot(refresh_request(Some(SECRET), r#"{"resource":"users"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_success_replaces_entry() {
    let (app, backend) = create_test_app();

    // warm the entry, then change the backend data behind it
    app.clone()
        .oneshot(get_rows_request("users", "A:H"))
        .await
        .unwrap();
    backend.put(
        "users",
        vec![
            vec!["alice".to_string(), "open".to_string()],
            vec!["bob".to_string(), "open".to_string()],
        ],
    );

    let response = app
        .clone()
        .oneshot(refresh_request(
            Some(SECRET),
            r#"{"resource":"users","range":"A:H"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["row_count"], 2);

    // the read now serves the refreshed entry without another fetch
    let response = app.oneshot(get_rows_request("users", "A:H")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["rows"].as_array().unwrap().len(), 2);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_refresh_backend_failure_is_500_and_keeps_prior_entry() {
    let (app, backend) = create_test_app();

    // warm the entry
    app.clone()
        .oneshot(get_rows_request("users", "A:H"))
        .await
        .unwrap();
    backend.fail_reads.store(true, Ordering::SeqCst);

    let response = app
        .clone()
        .oneshot(refresh_request(
            Some(SECRET),
            r#"{"resource":"users","range":"A:H"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // prior entry still served from cache while the backend is down
    let response = app.oneshot(get_rows_request("users", "A:H")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["rows"][0][0], "alice");
}
