//! Store interfaces for the two job board collections.
//!
//! Handlers and services depend on these traits only. [`crate::JobRepository`]
//! and [`crate::ApplicationRepository`] implement them over Firestore,
//! [`crate::MemoryStore`] implements both in process.

use std::collections::HashMap;

use async_trait::async_trait;
use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, InsertResult, Job, JobId, JobPosting, JobQuery,
    NewApplication, UpdateResult,
};

use crate::error::FirestoreResult;

/// Access to job postings.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Jobs matching `query`, in the order it requests.
    async fn list(&self, query: &JobQuery) -> FirestoreResult<Vec<Job>>;

    async fn get(&self, id: &JobId) -> FirestoreResult<Option<Job>>;

    /// Batch lookup. Unknown ids are absent from the result.
    async fn get_many(&self, ids: &[JobId]) -> FirestoreResult<HashMap<JobId, Job>>;

    /// Insert a posting under a store-assigned id.
    async fn create(&self, posting: JobPosting) -> FirestoreResult<InsertResult>;

    /// Atomically add one to `applicationCount` and return the new value.
    ///
    /// Fails with `NotFound` when the job does not exist.
    async fn increment_application_count(&self, id: &JobId) -> FirestoreResult<u64>;

    /// Check that the backing store answers.
    async fn health_check(&self) -> FirestoreResult<()>;
}

/// Access to job applications.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn list_by_applicant(&self, email: &str) -> FirestoreResult<Vec<Application>>;

    async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>>;

    /// Insert an application under a store-assigned id. A missing status is
    /// stored as `submitted`.
    async fn create(&self, application: NewApplication) -> FirestoreResult<InsertResult>;

    /// Set the status of an existing application.
    ///
    /// Fails with `NotFound` when the application does not exist.
    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> FirestoreResult<UpdateResult>;
}
