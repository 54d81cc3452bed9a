//! Tests for the Firestore client and repositories against a mock REST API.

use std::time::Duration;

use serde_json::{json, Value as Json};
use serial_test::serial;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobboard_models::{ApplicationId, ApplicationStatus, JobId, JobPosting, JobQuery, NewApplication};

use crate::applications_repo::ApplicationRepository;
use crate::client::{FirestoreClient, FirestoreConfig};
use crate::error::FirestoreError;
use crate::jobs_repo::JobRepository;
use crate::retry::RetryConfig;
use crate::store::{ApplicationStore, JobStore};

const DOCS: &str = "/v1/projects/demo/databases/(default)/documents";

// =============================================================================
// Test Helpers
// =============================================================================

async fn client_for(server: &MockServer) -> FirestoreClient {
    let mut config = FirestoreConfig::emulator("demo", server.uri());
    config.retry = RetryConfig {
        max_retries: 2,
        base_delay_ms: 1,
        max_delay_ms: 5,
    };
    FirestoreClient::new(config).await.unwrap()
}

fn job_doc(id: &str, location: &str, salary: Option<(i64, i64)>) -> Json {
    let mut fields = json!({
        "title": {"stringValue": format!("Job {}", id)},
        "location": {"stringValue": location},
        "applicationCount": {"integerValue": "2"},
    });
    if let Some((min, max)) = salary {
        fields["salaryRange"] = json!({
            "mapValue": {"fields": {
                "min": {"integerValue": min.to_string()},
                "max": {"integerValue": max.to_string()},
            }}
        });
    }
    json!({
        "name": format!("projects/demo/databases/(default)/documents/jobs/{}", id),
        "fields": fields,
    })
}

// =============================================================================
// Error Type Tests
// =============================================================================

#[test]
fn test_error_from_http_status() {
    assert!(matches!(FirestoreError::from_http_status(429, "slow down"), FirestoreError::RateLimited(_)));
    assert!(matches!(FirestoreError::from_http_status(503, "unavailable"), FirestoreError::ServerError(503, _)));
    assert!(matches!(FirestoreError::from_http_status(400, "bad"), FirestoreError::RequestFailed(_)));
    assert!(matches!(FirestoreError::from_http_status(404, "gone"), FirestoreError::NotFound(_)));
    assert!(matches!(FirestoreError::from_http_status(409, "dup"), FirestoreError::AlreadyExists(_)));
    assert!(matches!(FirestoreError::from_http_status(412, "stale"), FirestoreError::PreconditionFailed(_)));
}

#[test]
fn test_error_retryability() {
    assert!(FirestoreError::from_http_status(429, "").is_retryable());
    assert!(FirestoreError::from_http_status(500, "").is_retryable());
    assert!(FirestoreError::from_http_status(502, "").is_retryable());
    assert!(!FirestoreError::from_http_status(400, "").is_retryable());
    assert!(!FirestoreError::from_http_status(404, "").is_retryable());
    assert!(!FirestoreError::from_http_status(409, "").is_retryable());
}

#[test]
fn test_error_http_status_and_retry_after() {
    assert_eq!(FirestoreError::RateLimited(1000).http_status(), Some(429));
    assert_eq!(FirestoreError::ServerError(502, "bad gateway".into()).http_status(), Some(502));
    assert_eq!(FirestoreError::NotFound("doc".into()).http_status(), Some(404));
    assert_eq!(FirestoreError::RateLimited(5000).retry_after_ms(), Some(5000));
    assert_eq!(FirestoreError::ServerError(500, "error".into()).retry_after_ms(), None);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
#[serial]
fn test_config_validates_empty_project_id() {
    std::env::set_var("GCP_PROJECT_ID", "");
    std::env::remove_var("FIREBASE_PROJECT_ID");
    assert!(FirestoreConfig::from_env().is_err());
}

#[test]
#[serial]
fn test_config_accepts_firebase_project_id() {
    std::env::remove_var("GCP_PROJECT_ID");
    std::env::set_var("FIREBASE_PROJECT_ID", "firebase-project");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.project_id, "firebase-project");
    std::env::remove_var("FIREBASE_PROJECT_ID");
}

#[test]
#[serial]
fn test_config_reads_tuning_and_emulator_vars() {
    std::env::set_var("GCP_PROJECT_ID", "test");
    std::env::set_var("FIRESTORE_CONNECT_TIMEOUT_SECS", "15");
    std::env::set_var("FIRESTORE_RETRY_BASE_MS", "50");
    std::env::set_var("FIRESTORE_RETRY_MAX_MS", "2000");
    std::env::set_var("FIRESTORE_EMULATOR_HOST", "localhost:8080");

    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(15));
    assert_eq!(config.retry.base_delay_ms, 50);
    assert_eq!(config.retry.max_delay_ms, 2000);
    assert_eq!(config.emulator_host.as_deref(), Some("localhost:8080"));

    for key in [
        "FIRESTORE_CONNECT_TIMEOUT_SECS",
        "FIRESTORE_RETRY_BASE_MS",
        "FIRESTORE_RETRY_MAX_MS",
        "FIRESTORE_EMULATOR_HOST",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_config_handles_invalid_env_values() {
    std::env::set_var("GCP_PROJECT_ID", "test");
    std::env::set_var("FIRESTORE_CONNECT_TIMEOUT_SECS", "not-a-number");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
}

// =============================================================================
// REST Tests
// =============================================================================

#[tokio::test]
async fn test_increment_commits_field_transform() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:commit", DOCS)))
        .and(body_partial_json(json!({
            "writes": [{
                "transform": {
                    "document": "projects/demo/databases/(default)/documents/jobs/j1",
                    "fieldTransforms": [{
                        "fieldPath": "applicationCount",
                        "increment": {"integerValue": "1"}
                    }]
                },
                "currentDocument": {"exists": true}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{
                "updateTime": "2026-01-01T00:00:00Z",
                "transformResults": [{"integerValue": "3"}]
            }],
            "commitTime": "2026-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let count = repo.increment_application_count(&JobId::from("j1")).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_increment_missing_job_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:commit", DOCS)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "no entity to update", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let err = repo
        .increment_application_count(&JobId::from("gone"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_filters_location_and_sorts_in_process() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .and(body_partial_json(json!({
            "structuredQuery": {"from": [{"collectionId": "jobs"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": job_doc("low", "Dhaka", Some((30000, 40000))), "readTime": "t"},
            {"document": job_doc("far", "Chittagong", Some((90000, 95000))), "readTime": "t"},
            {"document": job_doc("none", "dhaka north", None), "readTime": "t"},
            {"document": job_doc("high", "Old Dhaka", Some((70000, 80000))), "readTime": "t"},
        ])))
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let jobs = repo
        .list(&JobQuery::all().with_location("DHAKA").sorted_by_salary())
        .await
        .unwrap();

    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "low", "none"]);
    assert_eq!(jobs[0].application_count, 2);
}

#[tokio::test]
async fn test_list_retries_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"readTime": "t"}])))
        .with_priority(2)
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let jobs = repo.list(&JobQuery::all()).await.unwrap();
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn test_create_job_uses_server_assigned_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/jobs", DOCS)))
        .and(body_partial_json(json!({
            "fields": {
                "title": {"stringValue": "Engineer"},
                "applicationCount": {"integerValue": "0"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_doc("auto123", "Dhaka", None)))
        .expect(1)
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let posting = JobPosting {
        title: Some("Engineer".into()),
        ..Default::default()
    };
    let inserted = repo.create(posting).await.unwrap();
    assert_eq!(inserted.inserted_id, "auto123");
    assert!(inserted.acknowledged);
}

#[tokio::test]
async fn test_get_missing_job_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/jobs/missing", DOCS)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    assert!(repo.get(&JobId::from("missing")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_escapes_document_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/jobs/real", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_doc("real", "Dhaka", None)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/jobs/real%3Fx%3D1", DOCS)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let id = JobId::parse("real?x=1").unwrap();
    assert!(repo.get(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_status_keeps_id_out_of_query() {
    let server = MockServer::start().await;
    let encoded = format!("{}/applications/app1%3FupdateMask.fieldPaths%3Djob_id", DOCS);
    Mock::given(method("GET"))
        .and(path(encoded.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/applications/app1?updateMask.fieldPaths=job_id",
            "fields": {
                "job_id": {"stringValue": "j1"},
                "applicant_email": {"stringValue": "a@x.com"},
                "status": {"stringValue": "submitted"}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(encoded))
        .and(query_param("updateMask.fieldPaths", "status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/applications/x",
            "fields": {"status": {"stringValue": "accepted"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = ApplicationRepository::new(client_for(&server).await, "applications");
    let id = ApplicationId::parse("app1?updateMask.fieldPaths=job_id").unwrap();
    let result = repo.update_status(&id, ApplicationStatus::Accepted).await.unwrap();
    assert_eq!(result.modified_count, 1);
}

#[tokio::test]
async fn test_get_many_uses_batch_get() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:batchGet", DOCS)))
        .and(body_partial_json(json!({
            "documents": [
                "projects/demo/databases/(default)/documents/jobs/a",
                "projects/demo/databases/(default)/documents/jobs/b"
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"found": job_doc("a", "Dhaka", None), "readTime": "t"},
            {"missing": "projects/demo/databases/(default)/documents/jobs/b", "readTime": "t"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server).await, "jobs");
    let found = repo
        .get_many(&[JobId::from("b"), JobId::from("a"), JobId::from("a")])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[&JobId::from("a")].title(), Some("Job a"));
}

#[tokio::test]
async fn test_create_application_stores_default_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/applications", DOCS)))
        .and(body_partial_json(json!({
            "fields": {
                "job_id": {"stringValue": "j1"},
                "applicant_email": {"stringValue": "a@x.com"},
                "status": {"stringValue": "submitted"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/applications/app1",
            "fields": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = ApplicationRepository::new(client_for(&server).await, "applications");
    let inserted = repo
        .create(NewApplication::new("j1", "a@x.com"))
        .await
        .unwrap();
    assert_eq!(inserted.inserted_id, "app1");
}

#[tokio::test]
async fn test_list_by_applicant_skips_unknown_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": {
                "name": "projects/demo/databases/(default)/documents/applications/ok",
                "fields": {
                    "job_id": {"stringValue": "j1"},
                    "applicant_email": {"stringValue": "a@x.com"},
                    "status": {"stringValue": "pending"},
                    "resume": {"stringValue": "https://cv.example/a.pdf"}
                }
            }},
            {"document": {
                "name": "projects/demo/databases/(default)/documents/applications/bad",
                "fields": {
                    "job_id": {"stringValue": "j1"},
                    "applicant_email": {"stringValue": "a@x.com"},
                    "status": {"stringValue": "hired"}
                }
            }}
        ])))
        .mount(&server)
        .await;

    let repo = ApplicationRepository::new(client_for(&server).await, "applications");
    let apps = repo.list_by_applicant("a@x.com").await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id.as_str(), "ok");
    assert_eq!(apps[0].status, ApplicationStatus::Submitted);
    assert_eq!(apps[0].extra["resume"], "https://cv.example/a.pdf");
}

#[tokio::test]
async fn test_update_status_patches_only_status() {
    let server = MockServer::start().await;
    let doc_path = format!("{}/applications/app1", DOCS);
    Mock::given(method("GET"))
        .and(path(doc_path.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/applications/app1",
            "fields": {"status": {"stringValue": "submitted"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(doc_path))
        .and(query_param("updateMask.fieldPaths", "status"))
        .and(query_param("currentDocument.exists", "true"))
        .and(body_partial_json(json!({"fields": {"status": {"stringValue": "accepted"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/applications/app1",
            "fields": {"status": {"stringValue": "accepted"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = ApplicationRepository::new(client_for(&server).await, "applications");
    let result = repo
        .update_status(&ApplicationId::from_string("app1"), ApplicationStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 1);
}

#[tokio::test]
async fn test_update_status_missing_application_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/applications/nope", DOCS)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repo = ApplicationRepository::new(client_for(&server).await, "applications");
    let err = repo
        .update_status(&ApplicationId::from_string("nope"), ApplicationStatus::Rejected)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
