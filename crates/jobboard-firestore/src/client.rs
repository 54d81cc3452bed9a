//! Firestore REST API client.
//!
//! Production-grade client with:
//! - Token caching with refresh margin
//! - HTTP client tuning (pooling, timeouts)
//! - Exponential backoff with jitter for reads
//! - Observability (tracing spans, metrics)
//! - Emulator support without OAuth

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info_span, Instrument};

use crate::error::{FirestoreError, FirestoreResult};
use crate::metrics::{names as metric_names, record_request};
use crate::retry::RetryConfig;
use crate::token_cache::TokenCache;
use crate::types::{
    BatchGetDocumentsRequest, BatchGetDocumentsResponse, CommitRequest, CommitResponse, Document,
    DocumentMask, DocumentTransform, FieldTransform, FromFirestoreValue, Precondition,
    RunQueryRequest, RunQueryResponse, StructuredQuery, Value, Write,
};

/// Firestore rejects batchGet requests above this many documents.
const BATCH_GET_LIMIT: usize = 100;

/// Bearer token accepted by the Firestore emulator.
const EMULATOR_TOKEN: &str = "owner";

// =============================================================================
// Configuration
// =============================================================================

/// Firestore client configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project ID
    pub project_id: String,
    /// Database ID (usually "(default)")
    pub database_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Emulator host (`localhost:8080` or a full URL). Disables OAuth.
    pub emulator_host: Option<String>,
}

impl FirestoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> FirestoreResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("FIREBASE_PROJECT_ID"))
            .map_err(|_| {
                FirestoreError::auth_error(
                    "GCP_PROJECT_ID or FIREBASE_PROJECT_ID must be set to access Firestore",
                )
            })?;

        if project_id.is_empty() {
            return Err(FirestoreError::auth_error(
                "GCP_PROJECT_ID or FIREBASE_PROJECT_ID cannot be empty",
            ));
        }

        let connect_timeout_secs: u64 = std::env::var("FIRESTORE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            project_id,
            database_id: std::env::var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|_| "(default)".to_string()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
            emulator_host: std::env::var("FIRESTORE_EMULATOR_HOST")
                .ok()
                .filter(|h| !h.is_empty()),
        })
    }

    /// Config for a local emulator, used by tests and development.
    pub fn emulator(project_id: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: "(default)".to_string(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            retry: RetryConfig::default(),
            emulator_host: Some(host.into()),
        }
    }

    fn endpoint(&self) -> String {
        match &self.emulator_host {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => "https://firestore.googleapis.com".to_string(),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Clone)]
enum Credentials {
    OAuth(Arc<TokenCache>),
    Emulator,
}

/// Firestore REST API client.
#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    config: FirestoreConfig,
    base_url: String,
    credentials: Credentials,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub async fn new(config: FirestoreConfig) -> FirestoreResult<Self> {
        let credentials = if config.emulator_host.is_some() {
            Credentials::Emulator
        } else {
            Credentials::OAuth(Arc::new(TokenCache::new(Self::create_auth_provider()?)))
        };

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("jobboard-firestore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FirestoreError::Network)?;

        let base_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            config.endpoint(),
            config.project_id,
            config.database_id
        );

        Ok(Self {
            http,
            config,
            base_url,
            credentials,
        })
    }

    fn create_auth_provider() -> FirestoreResult<Arc<dyn TokenProvider>> {
        let service_account = CustomServiceAccount::from_env()
            .map_err(|e| FirestoreError::auth_error(format!("Failed to load service account: {}", e)))?;

        match service_account {
            Some(sa) => Ok(Arc::new(sa)),
            None => Err(FirestoreError::auth_error(
                "GOOGLE_APPLICATION_CREDENTIALS not set. \
                 Set it to the path of your service account JSON file, \
                 or set FIRESTORE_EMULATOR_HOST.",
            )),
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> FirestoreResult<Self> {
        let config = FirestoreConfig::from_env()?;
        Self::new(config).await
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    pub fn is_emulator(&self) -> bool {
        matches!(self.credentials, Credentials::Emulator)
    }

    /// Get an access token.
    async fn get_token(&self) -> FirestoreResult<String> {
        match &self.credentials {
            Credentials::OAuth(cache) => cache.get_token().await,
            Credentials::Emulator => Ok(EMULATOR_TOKEN.to_string()),
        }
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
    }

    /// Build document URL. The id is percent-encoded so `?`, `#` and `/`
    /// stay inside the path segment.
    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, urlencoding::encode(doc_id))
    }

    /// Build full document name for batch and commit operations.
    pub fn full_document_name(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{}/{}",
            self.config.project_id, self.config.database_id, collection, doc_id
        )
    }

    /// Send an authorized request. An expired OAuth token is refreshed once.
    async fn send<F>(&self, url: &str, build: F) -> FirestoreResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.get_token().await?;
        let response = build().bearer_auth(&token).send().await?;

        let Credentials::OAuth(cache) = &self.credentials else {
            return Ok(response);
        };
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if !Self::is_access_token_expired(&body) {
            return Err(FirestoreError::from_http_status(
                StatusCode::UNAUTHORIZED.as_u16(),
                format!("{} failed: {}", url, body),
            ));
        }

        cache.invalidate().await;
        let token = self.get_token().await?;
        Ok(build().bearer_auth(&token).send().await?)
    }

    // =========================================================================
    // CRUD Operations
    // =========================================================================

    /// Get a document.
    pub async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> FirestoreResult<Option<Document>> {
        let url = self.document_url(collection, doc_id);

        self.execute_request("get_document", collection, Some(doc_id), async {
            let response = self.send(&url, || self.http.get(&url)).await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    let doc: Document = response.json().await?;
                    Ok(Some(doc))
                }
                StatusCode::NOT_FOUND => Ok(None),
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Create a document. Firestore assigns the ID when `doc_id` is `None`.
    pub async fn create_document(
        &self,
        collection: &str,
        doc_id: Option<&str>,
        fields: HashMap<String, Value>,
    ) -> FirestoreResult<Document> {
        let url = match doc_id {
            Some(id) => format!(
                "{}/{}?documentId={}",
                self.base_url,
                collection,
                urlencoding::encode(id)
            ),
            None => format!("{}/{}", self.base_url, collection),
        };
        let body = Document::new(fields);

        self.execute_request("create_document", collection, doc_id, async {
            let response = self
                .send(&url, || self.http.post(&url).json(&body))
                .await?;
            let status = response.status();

            match status {
                StatusCode::OK | StatusCode::CREATED => {
                    let doc: Document = response.json().await?;
                    Ok(doc)
                }
                StatusCode::CONFLICT => Err(FirestoreError::AlreadyExists(format!(
                    "{}/{}",
                    collection,
                    doc_id.unwrap_or_default()
                ))),
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Update the masked fields of an existing document.
    ///
    /// Fails with `NotFound` instead of creating the document when it does
    /// not exist.
    pub async fn update_existing_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: HashMap<String, Value>,
        update_mask: &[&str],
    ) -> FirestoreResult<Document> {
        let mut params: Vec<String> = update_mask
            .iter()
            .map(|f| format!("updateMask.fieldPaths={}", urlencoding::encode(f)))
            .collect();
        params.push("currentDocument.exists=true".to_string());
        let url = format!("{}?{}", self.document_url(collection, doc_id), params.join("&"));

        let body = Document::new(fields);

        self.execute_request("update_document", collection, Some(doc_id), async {
            let response = self
                .send(&url, || self.http.patch(&url).json(&body))
                .await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    let doc: Document = response.json().await?;
                    Ok(doc)
                }
                StatusCode::NOT_FOUND => {
                    Err(FirestoreError::not_found(format!("{}/{}", collection, doc_id)))
                }
                StatusCode::PRECONDITION_FAILED | StatusCode::BAD_REQUEST => {
                    let body_text = response.text().await.unwrap_or_default();
                    if body_text.contains("FAILED_PRECONDITION") || body_text.contains("NOT_FOUND") {
                        Err(FirestoreError::not_found(format!("{}/{}", collection, doc_id)))
                    } else {
                        Err(FirestoreError::from_http_status(
                            status.as_u16(),
                            format!("{} failed: {}", url, body_text),
                        ))
                    }
                }
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Batch get documents by ID using Firestore documents:batchGet.
    ///
    /// Returns found documents in arbitrary order. Missing documents are
    /// omitted. Requests above the batchGet limit are split.
    pub async fn batch_get_documents(
        &self,
        collection: &str,
        doc_ids: &[&str],
        mask: Option<DocumentMask>,
    ) -> FirestoreResult<Vec<Document>> {
        let mut docs = Vec::with_capacity(doc_ids.len());

        for chunk in doc_ids.chunks(BATCH_GET_LIMIT) {
            let names = chunk
                .iter()
                .map(|id| self.full_document_name(collection, id))
                .collect();
            docs.extend(self.batch_get_chunk(collection, names, mask.clone()).await?);
        }

        Ok(docs)
    }

    async fn batch_get_chunk(
        &self,
        collection: &str,
        full_document_names: Vec<String>,
        mask: Option<DocumentMask>,
    ) -> FirestoreResult<Vec<Document>> {
        let url = format!("{}:batchGet", self.base_url);
        let request = BatchGetDocumentsRequest {
            documents: full_document_names,
            mask,
        };

        self.execute_request("batch_get_documents", collection, None, async {
            let response = self
                .send(&url, || self.http.post(&url).json(&request))
                .await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    let body = response.text().await.unwrap_or_default();
                    // batchGet returns a JSON array of BatchGetDocumentsResponse objects
                    let responses: Vec<BatchGetDocumentsResponse> =
                        serde_json::from_str(&body).map_err(|e| {
                            FirestoreError::invalid_response(format!(
                                "Failed to parse batchGet response: {} (body prefix: {})",
                                e,
                                body_prefix(&body)
                            ))
                        })?;

                    Ok(responses.into_iter().filter_map(|r| r.found).collect())
                }
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    // =========================================================================
    // Atomic Writes
    // =========================================================================

    /// Commit writes atomically.
    pub async fn commit(&self, writes: Vec<Write>) -> FirestoreResult<CommitResponse> {
        let url = format!("{}:commit", self.base_url);
        let request = CommitRequest { writes };

        self.execute_request("commit", "commit", None, async {
            let response = self
                .send(&url, || self.http.post(&url).json(&request))
                .await?;
            let status = response.status();

            match status {
                StatusCode::OK => Ok(response.json().await?),
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Atomically add `by` to an integer field of an existing document and
    /// return the new value. A missing field counts as zero.
    pub async fn increment_field(
        &self,
        collection: &str,
        doc_id: &str,
        field_path: &str,
        by: i64,
    ) -> FirestoreResult<i64> {
        let write = Write {
            transform: Some(DocumentTransform {
                document: self.full_document_name(collection, doc_id),
                field_transforms: vec![FieldTransform::increment(field_path, by)],
            }),
            current_document: Some(Precondition::exists()),
        };

        let response = self.commit(vec![write]).await.map_err(|e| {
            if e.is_not_found() || e.is_precondition_failed() {
                FirestoreError::not_found(format!("{}/{}", collection, doc_id))
            } else {
                e
            }
        })?;

        response
            .write_results
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|r| r.transform_results)
            .and_then(|values| values.first().and_then(i64::from_firestore_value))
            .ok_or_else(|| {
                FirestoreError::invalid_response(format!(
                    "commit returned no transform result for {}/{}.{}",
                    collection, doc_id, field_path
                ))
            })
    }

    /// Execute with retry.
    pub async fn with_retry<T, F, Fut>(&self, operation: &str, op: F) -> FirestoreResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = FirestoreResult<T>>,
    {
        crate::retry::with_retry(&self.config.retry, operation, op).await
    }

    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Run a structured query against a top-level collection.
    pub async fn run_query(&self, query: StructuredQuery) -> FirestoreResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.base_url);
        let collection = query
            .from
            .first()
            .map(|c| c.collection_id.clone())
            .unwrap_or_default();
        let request = RunQueryRequest {
            structured_query: query,
        };

        self.execute_request("run_query", &collection, None, async {
            let response = self
                .send(&url, || self.http.post(&url).json(&request))
                .await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    let body = response.text().await.unwrap_or_default();
                    // runQuery returns a JSON array of RunQueryResponse objects
                    let responses: Vec<RunQueryResponse> =
                        serde_json::from_str(&body).map_err(|e| {
                            FirestoreError::invalid_response(format!(
                                "Failed to parse runQuery response: {} (body prefix: {})",
                                e,
                                body_prefix(&body)
                            ))
                        })?;

                    let docs: Vec<Document> =
                        responses.into_iter().filter_map(|r| r.document).collect();

                    metrics::counter!(
                        metric_names::QUERY_DOCUMENTS_RETURNED_TOTAL,
                        "collection" => collection.clone()
                    )
                    .increment(docs.len() as u64);
                    debug!(collection = %collection, count = docs.len(), "runQuery completed");

                    Ok(docs)
                }
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Cheap read used by readiness probes.
    pub async fn ping(&self, collection: &str) -> FirestoreResult<()> {
        let mut query = StructuredQuery::collection(collection);
        query.limit = Some(1);
        self.run_query(query).await.map(|_| ())
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Execute a request with tracing and metrics.
    async fn execute_request<T, F>(
        &self,
        operation: &str,
        collection: &str,
        doc_id: Option<&str>,
        fut: F,
    ) -> FirestoreResult<T>
    where
        F: std::future::Future<Output = FirestoreResult<T>>,
    {
        let span = if let Some(id) = doc_id {
            info_span!("firestore_request", operation = %operation, collection = %collection, doc_id = %id)
        } else {
            info_span!("firestore_request", operation = %operation, collection = %collection)
        };

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(status: StatusCode, url: &str, response: Response) -> FirestoreError {
        let body = response.text().await.unwrap_or_default();
        FirestoreError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}

fn body_prefix(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_validates_project_id() {
        std::env::remove_var("GCP_PROJECT_ID");
        std::env::remove_var("FIREBASE_PROJECT_ID");
        let result = FirestoreConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_config_default_values() {
        std::env::set_var("GCP_PROJECT_ID", "test-project");
        std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("FIRESTORE_EMULATOR_HOST");
        let config = FirestoreConfig::from_env().unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.database_id, "(default)");
        assert!(config.emulator_host.is_none());
    }

    #[test]
    fn test_endpoint_for_emulator_host() {
        let config = FirestoreConfig::emulator("p", "localhost:8080");
        assert_eq!(config.endpoint(), "http://localhost:8080");

        let config = FirestoreConfig::emulator("p", "http://127.0.0.1:9000/");
        assert_eq!(config.endpoint(), "http://127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_emulator_client_needs_no_credentials() {
        let client = FirestoreClient::new(FirestoreConfig::emulator("demo", "localhost:8080"))
            .await
            .unwrap();
        assert!(client.is_emulator());
        assert_eq!(
            client.full_document_name("jobs", "j1"),
            "projects/demo/databases/(default)/documents/jobs/j1"
        );
        assert_eq!(
            client.document_url("jobs", "j1"),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/jobs/j1"
        );
        assert_eq!(
            client.document_url("jobs", "a?b=1#c"),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/jobs/a%3Fb%3D1%23c"
        );
    }

    #[test]
    fn test_body_prefix_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(body_prefix(&body).len() <= 200);
        assert_eq!(body_prefix("short"), "short");
    }
}
