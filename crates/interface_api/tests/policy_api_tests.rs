//! HTTP contract tests
//!
//! Drives the full router, middleware included, through `axum-test`.
//!
//! # Test Organization
//!
//! - `create` - POST /policies
//! - `read` - GET /policies and GET /policies/:id
//! - `export` - POST /policies/export
//! - `failures` - Store faults, cancellation and shutdown
//! - `health` - Liveness and readiness

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use domain_policy::{
    ExportDto, InMemoryPolicyStore, PolicyService, PolicyStore, ReadPolicyDto,
};
use interface_api::{create_router, AppState};
use rust_decimal_macros::dec;
use serde_json::json;
use test_utils::{
    assert_echoes_input, assert_export_row, assert_ids_increasing, CancellingPolicyStore,
    CreatePolicyDtoBuilder, FailingPolicyStore, PolicyBuilder, SeedFixtures, TemporalFixtures,
};
use tokio_util::sync::CancellationToken;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn server_over(store: Arc<dyn PolicyStore>, shutdown: CancellationToken) -> TestServer {
    let state = AppState::new(PolicyService::new(store), shutdown);
    TestServer::new(create_router(state)).unwrap()
}

fn seeded_server() -> TestServer {
    server_over(Arc::new(InMemoryPolicyStore::seeded()), CancellationToken::new())
}

fn empty_server() -> TestServer {
    server_over(Arc::new(InMemoryPolicyStore::new()), CancellationToken::new())
}

// ============================================================================
// CREATE
// ============================================================================

mod create {
    use super::*;

    #[tokio::test]
    async fn test_valid_body_returns_created_policy() {
        let server = seeded_server();
        let input = CreatePolicyDtoBuilder::new().build();

        let response = server.post("/policies").json(&input).await;

        response.assert_status_ok();
        let created: ReadPolicyDto = response.json();
        assert_eq!(created.id, SeedFixtures::next_id());
        assert_echoes_input(&created, &input);
    }

    /// Output uses camelCase and an RFC 3339 start date
    #[tokio::test]
    async fn test_response_shape_is_camel_case() {
        let server = empty_server();

        let response = server
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().with_policy_number("123").build_json())
            .await;

        let body: serde_json::Value = response.json();
        assert_eq!(body["policyNumber"], "123");
        assert_eq!(body["startDate"], "2024-01-01T00:00:00Z");
        assert!(body.get("id").is_some());
        assert!(body.get("premium").is_some());
    }

    /// Bare dates and numeric premiums are accepted on input
    #[tokio::test]
    async fn test_lenient_input_formats() {
        let server = empty_server();

        let response = server
            .post("/policies")
            .json(&json!({ "policyNumber": "456", "premium": 153.5, "startDate": "2024-04-05" }))
            .await;

        response.assert_status_ok();
        let created: ReadPolicyDto = response.json();
        assert_eq!(created.premium, dec!(153.5));
        assert_eq!(created.start_date, TemporalFixtures::april_fifth());
    }

    /// A rejected create is a bare 400 and writes nothing
    #[tokio::test]
    async fn test_missing_policy_number_is_bare_bad_request() {
        let server = seeded_server();

        let response = server
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().without_policy_number().build_json())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().is_empty());

        let all: Vec<ReadPolicyDto> = server.get("/policies").await.json();
        assert_eq!(all.len(), SeedFixtures::POLICY_COUNT);
    }

    #[tokio::test]
    async fn test_empty_policy_number_is_bad_request() {
        let server = empty_server();

        let response = server
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().with_policy_number("").build_json())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrongly_typed_premium_is_bare_bad_request() {
        let server = seeded_server();

        let response = server
            .post("/policies")
            .json(&json!({ "policyNumber": "X1", "premium": "abc" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().is_empty());

        let all: Vec<ReadPolicyDto> = server.get("/policies").await.json();
        assert_eq!(all.len(), SeedFixtures::POLICY_COUNT);
    }

    #[tokio::test]
    async fn test_unparseable_start_date_is_bare_bad_request() {
        let server = empty_server();

        let response = server
            .post("/policies")
            .json(&json!({ "policyNumber": "X1", "premium": 1, "startDate": "garbage" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bare_bad_request() {
        let server = empty_server();

        let response = server
            .post("/policies")
            .text("{\"policyNumber\": ")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_created_policy_is_readable() {
        let server = empty_server();

        let created: ReadPolicyDto = server
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().build())
            .await
            .json();

        let read: ReadPolicyDto = server.get(&format!("/policies/{}", created.id.value())).await.json();
        assert_eq!(read, created);
    }
}

// ============================================================================
// READ
// ============================================================================

mod read {
    use super::*;

    #[tokio::test]
    async fn test_seeded_policy_by_id() {
        let server = seeded_server();

        let response = server.get("/policies/1").await;

        response.assert_status_ok();
        let policy: ReadPolicyDto = response.json();
        assert_eq!(policy.policy_number, "HSCX1001");
        assert_eq!(policy.premium, SeedFixtures::first_premium());
        assert_eq!(policy.start_date, TemporalFixtures::april_first());
    }

    #[tokio::test]
    async fn test_unknown_id_is_bare_not_found() {
        let server = seeded_server();

        let response = server
            .get(&format!("/policies/{}", SeedFixtures::max_id().value() + 1))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let server = seeded_server();
        let response = server.get("/policies/abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_on_empty_store_is_empty_array() {
        let server = empty_server();

        let response = server.get("/policies").await;

        response.assert_status_ok();
        let all: Vec<ReadPolicyDto> = response.json();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_list_returns_seeded_policies_in_id_order() {
        let server = seeded_server();

        let all: Vec<ReadPolicyDto> = server.get("/policies").await.json();

        let numbers: Vec<_> = all.iter().map(|p| p.policy_number.as_str()).collect();
        assert_eq!(numbers, SeedFixtures::policy_numbers());
        assert_ids_increasing(&all);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let server = seeded_server();

        let response = server.get("/policies").await;

        assert!(response.headers().contains_key("x-request-id"));
    }
}

// ============================================================================
// EXPORT
// ============================================================================

mod export {
    use super::*;

    #[tokio::test]
    async fn test_export_includes_lower_bound_with_empty_notes() {
        let server = empty_server();
        let created: ReadPolicyDto = server
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().with_policy_number("123").build())
            .await
            .json();

        let response = server
            .post("/policies/export")
            .add_query_param("startDate", "2024-01-01")
            .add_query_param("endDate", "2024-01-02")
            .await;

        response.assert_status_ok();
        let rows: Vec<ExportDto> = response.json();
        assert_eq!(rows.len(), 1);
        assert_export_row(&rows[0], &created, &[]);
    }

    /// Rows loaded with explicit ids: the upper bound is inclusive and only
    /// the matching policy's notes are attached
    #[tokio::test]
    async fn test_export_includes_upper_bound_of_loaded_rows() {
        let (on_bound, mut notes) = PolicyBuilder::new(40)
            .with_policy_number("EDGE40")
            .with_start_date(TemporalFixtures::day_after_new_year())
            .with_note("first")
            .with_note("second")
            .build(100);
        let (after_bound, later_notes) = PolicyBuilder::new(41)
            .with_start_date(TemporalFixtures::april_first())
            .with_note("outside")
            .build(102);
        notes.extend(later_notes);

        let store = InMemoryPolicyStore::new();
        store.seed(vec![on_bound, after_bound], notes).await.unwrap();
        let server = server_over(Arc::new(store), CancellationToken::new());

        let rows: Vec<ExportDto> = server
            .post("/policies/export")
            .add_query_param("startDate", "2024-01-01")
            .add_query_param("endDate", "2024-01-02")
            .await
            .json();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].policy_number, "EDGE40");
        assert_eq!(rows[0].notes, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_export_of_seeded_april_attaches_notes() {
        let server = seeded_server();

        let rows: Vec<ExportDto> = server
            .post("/policies/export")
            .add_query_param("startDate", TemporalFixtures::april_first().to_rfc3339())
            .add_query_param("endDate", TemporalFixtures::april_fifth().to_rfc3339())
            .await
            .json();

        let numbers: Vec<_> = rows.iter().map(|r| r.policy_number.as_str()).collect();
        assert_eq!(numbers, vec!["HSCX1001", "HSCX1002", "HSCX1005"]);
        assert_eq!(rows[0].notes, vec!["Policy 1 Note 1", "Policy 1 Note 2"]);
    }

    #[tokio::test]
    async fn test_export_uses_camel_case_with_notes_array() {
        let server = seeded_server();

        let body: serde_json::Value = server
            .post("/policies/export")
            .add_query_param("startDate", "2024-05-01")
            .add_query_param("endDate", "2024-05-01")
            .await
            .json();

        assert_eq!(body[0]["policyNumber"], "HSCX1004");
        assert_eq!(body[0]["notes"], json!([]));
        assert!(body[0].get("id").is_none());
    }

    #[tokio::test]
    async fn test_range_with_no_policies_is_empty() {
        let server = seeded_server();
        let (from, to) = TemporalFixtures::distant_past();

        let response = server
            .post("/policies/export")
            .add_query_param("startDate", from.to_rfc3339())
            .add_query_param("endDate", to.to_rfc3339())
            .await;

        response.assert_status_ok();
        let rows: Vec<ExportDto> = response.json();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty_not_an_error() {
        let server = seeded_server();

        let response = server
            .post("/policies/export")
            .add_query_param("startDate", "2024-12-31")
            .add_query_param("endDate", "2024-01-01")
            .await;

        response.assert_status_ok();
        let rows: Vec<ExportDto> = response.json();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_missing_query_parameters_are_rejected() {
        let server = seeded_server();

        let response = server
            .post("/policies/export")
            .add_query_param("startDate", "2024-01-01")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// FAILURES
// ============================================================================

mod failures {
    use super::*;

    fn failing_server() -> TestServer {
        server_over(Arc::new(FailingPolicyStore), CancellationToken::new())
    }

    /// Store faults on create collapse into the bare 400
    #[tokio::test]
    async fn test_create_against_failing_store_is_bad_request() {
        let response = failing_server()
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().build())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reads_against_failing_store_are_server_errors() {
        let server = failing_server();

        for path in ["/policies", "/policies/1"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            let body: serde_json::Value = response.json();
            assert_eq!(body["error"], "internal_error");
        }
    }

    /// Shutdown during a read surfaces as 503 even though the row was fetched
    #[tokio::test]
    async fn test_shutdown_during_read_is_service_unavailable() {
        let shutdown = CancellationToken::new();
        let store = CancellingPolicyStore::new(InMemoryPolicyStore::seeded(), shutdown.clone());
        let server = server_over(Arc::new(store.clone()), shutdown);

        let response = server.get("/policies/1").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "cancelled");
        assert_eq!(store.calls(), 1);
    }

    /// Shutdown during a create rolls the insert back
    #[tokio::test]
    async fn test_shutdown_during_create_rolls_back() {
        let shutdown = CancellationToken::new();
        let inner = InMemoryPolicyStore::seeded();
        let store = CancellingPolicyStore::new(inner.clone(), shutdown.clone());
        let server = server_over(Arc::new(store), shutdown);

        let response = server
            .post("/policies")
            .json(&CreatePolicyDtoBuilder::new().build())
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(inner.policy_count().await, SeedFixtures::POLICY_COUNT);
    }

    /// A server already shutting down answers every operation with 503
    #[tokio::test]
    async fn test_requests_after_shutdown_are_cancelled() {
        let shutdown = CancellationToken::new();
        let server = server_over(Arc::new(InMemoryPolicyStore::seeded()), shutdown.clone());
        shutdown.cancel();

        server.get("/policies").await.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        server
            .post("/policies/export")
            .add_query_param("startDate", "2024-01-01")
            .add_query_param("endDate", "2024-12-31")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}

// ============================================================================
// HEALTH
// ============================================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let body: serde_json::Value = seeded_server().get("/health").await.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_with_memory_store() {
        let response = seeded_server().get("/health/ready").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["store"]["adapter_id"], "in-memory-policy-store");
    }

    #[tokio::test]
    async fn test_readiness_with_failing_store() {
        let response = server_over(Arc::new(FailingPolicyStore), CancellationToken::new())
            .get("/health/ready")
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}
