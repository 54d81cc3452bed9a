//! Job applications stored in a top-level Firestore collection.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{info, warn};

use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, InsertResult, JobId, NewApplication,
    UpdateResult,
};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::query::{field_equals, fields};
use crate::store::ApplicationStore;
use crate::types::{from_document, to_fields, Document, ToFirestoreValue};

/// Default collection name for applications.
pub const APPLICATIONS_COLLECTION: &str = "applications";

/// Repository for application documents.
#[derive(Clone)]
pub struct ApplicationRepository {
    client: FirestoreClient,
    collection: String,
}

impl ApplicationRepository {
    pub fn new(client: FirestoreClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    async fn query_by(&self, operation: &str, field: &str, value: &str) -> FirestoreResult<Vec<Application>> {
        let structured = field_equals(&self.collection, field, value);
        let client = &self.client;

        let docs = client
            .with_retry(operation, move || client.run_query(structured.clone()))
            .await?;

        Ok(docs.iter().filter_map(decode_application).collect())
    }
}

/// Decode an application. Documents with an unknown status or missing
/// required fields are logged and skipped.
fn decode_application(doc: &Document) -> Option<Application> {
    match from_document::<Application>(doc) {
        Ok(application) => Some(application),
        Err(e) => {
            warn!(document = ?doc.name, error = %e, "Skipping malformed application document");
            None
        }
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn list_by_applicant(&self, email: &str) -> FirestoreResult<Vec<Application>> {
        self.query_by("list_applications_by_applicant", fields::APPLICANT_EMAIL, email)
            .await
    }

    async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>> {
        self.query_by("list_applications_by_job", fields::JOB_ID, job_id.as_str())
            .await
    }

    async fn create(&self, mut application: NewApplication) -> FirestoreResult<InsertResult> {
        application.strip_reserved();
        let status = application.status.take().unwrap_or_default();

        let mut fields = to_fields(&application)?;
        fields.insert(fields::STATUS.to_string(), status.as_str().to_firestore_value());

        let doc = self
            .client
            .create_document(&self.collection, None, fields)
            .await?;
        let id = doc
            .id()
            .ok_or_else(|| FirestoreError::invalid_response("created application has no name"))?;

        info!(application_id = %id, job_id = %application.job_id, "Created application");
        Ok(InsertResult::new(id))
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> FirestoreResult<UpdateResult> {
        let current = self
            .client
            .get_document(&self.collection, id.as_str())
            .await?
            .ok_or_else(|| FirestoreError::not_found(format!("{}/{}", self.collection, id)))?;

        let unchanged = current
            .get::<String>(fields::STATUS)
            .and_then(|s| s.parse::<ApplicationStatus>().ok())
            == Some(status);
        if unchanged {
            return Ok(UpdateResult::single(false));
        }

        let mut update = HashMap::new();
        update.insert(fields::STATUS.to_string(), status.as_str().to_firestore_value());
        self.client
            .update_existing_document(&self.collection, id.as_str(), update, &[fields::STATUS])
            .await?;

        info!(application_id = %id, status = %status, "Updated application status");
        Ok(UpdateResult::single(true))
    }
}
