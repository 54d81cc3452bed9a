//! Job postings stored in a top-level Firestore collection.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tracing::{info, warn};

use jobboard_models::{InsertResult, Job, JobId, JobPosting, JobQuery};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::metrics::record_increment;
use crate::query::{fields, job_list_query};
use crate::store::JobStore;
use crate::types::{from_document, to_fields, Document, ToFirestoreValue};

/// Default collection name for jobs.
pub const JOBS_COLLECTION: &str = "jobs";

/// Repository for job documents.
#[derive(Clone)]
pub struct JobRepository {
    client: FirestoreClient,
    collection: String,
}

impl JobRepository {
    pub fn new(client: FirestoreClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Decode a job, logging and skipping documents that do not fit the model.
fn decode_job(doc: &Document) -> Option<Job> {
    match from_document::<Job>(doc) {
        Ok(job) => Some(job),
        Err(e) => {
            warn!(document = ?doc.name, error = %e, "Skipping malformed job document");
            None
        }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn list(&self, query: &JobQuery) -> FirestoreResult<Vec<Job>> {
        let structured = job_list_query(&self.collection, query);
        let client = &self.client;

        let docs = client
            .with_retry("list_jobs", move || client.run_query(structured.clone()))
            .await?;

        let mut jobs: Vec<Job> = docs
            .iter()
            .filter_map(decode_job)
            .filter(|job| query.matches(job))
            .collect();
        query.sort(&mut jobs);

        Ok(jobs)
    }

    async fn get(&self, id: &JobId) -> FirestoreResult<Option<Job>> {
        let client = &self.client;
        let collection = self.collection.as_str();

        let doc = client
            .with_retry("get_job", move || client.get_document(collection, id.as_str()))
            .await?;

        doc.as_ref().map(from_document::<Job>).transpose()
    }

    async fn get_many(&self, ids: &[JobId]) -> FirestoreResult<HashMap<JobId, Job>> {
        let unique: BTreeSet<&str> = ids.iter().map(JobId::as_str).collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }
        let unique: Vec<&str> = unique.into_iter().collect();

        let client = &self.client;
        let collection = self.collection.as_str();
        let lookup = unique.as_slice();

        let docs = client
            .with_retry("get_jobs", move || {
                client.batch_get_documents(collection, lookup, None)
            })
            .await?;

        Ok(docs
            .iter()
            .filter_map(decode_job)
            .map(|job| (job.id.clone(), job))
            .collect())
    }

    async fn create(&self, mut posting: JobPosting) -> FirestoreResult<InsertResult> {
        posting.strip_reserved();

        let mut fields = to_fields(&posting)?;
        fields.insert(fields::APPLICATION_COUNT.to_string(), 0i64.to_firestore_value());

        let doc = self
            .client
            .create_document(&self.collection, None, fields)
            .await?;
        let id = doc
            .id()
            .ok_or_else(|| FirestoreError::invalid_response("created job has no name"))?;

        info!(job_id = %id, "Created job");
        Ok(InsertResult::new(id))
    }

    async fn increment_application_count(&self, id: &JobId) -> FirestoreResult<u64> {
        let result = self
            .client
            .increment_field(&self.collection, id.as_str(), fields::APPLICATION_COUNT, 1)
            .await;
        record_increment(&self.collection, result.is_ok());

        let count = result?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn health_check(&self) -> FirestoreResult<()> {
        self.client.ping(&self.collection).await
    }
}
