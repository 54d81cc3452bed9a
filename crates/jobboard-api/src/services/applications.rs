//! Application workflow: enrichment on read, guarded creation with a job
//! counter increment, and status updates.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use jobboard_firestore::{ApplicationStore, JobStore};
use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, EnrichedApplication, InsertResult, JobId,
    NewApplication, UpdateResult,
};

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Coordinates the application and job stores.
#[derive(Clone)]
pub struct ApplicationService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl ApplicationService {
    pub fn new(jobs: Arc<dyn JobStore>, applications: Arc<dyn ApplicationStore>) -> Self {
        Self { jobs, applications }
    }

    /// Applications of one applicant, each joined with the display fields of
    /// its job. Applications whose job no longer exists are returned as is.
    pub async fn list_for_applicant(&self, email: &str) -> ApiResult<Vec<EnrichedApplication>> {
        let applications = self.applications.list_by_applicant(email).await?;

        let job_ids: Vec<JobId> = applications.iter().map(|app| app.job_id.clone()).collect();
        let jobs = self.jobs.get_many(&job_ids).await?;

        Ok(applications
            .into_iter()
            .map(|app| {
                let job = jobs.get(&app.job_id);
                if job.is_none() {
                    warn!(application_id = %app.id, job_id = %app.job_id, "Application references a missing job");
                }
                EnrichedApplication::new(app, job)
            })
            .collect())
    }

    pub async fn list_for_job(&self, job_id: &JobId) -> ApiResult<Vec<Application>> {
        Ok(self.applications.list_by_job(job_id).await?)
    }

    /// Store an application for an existing job and bump the job's
    /// `applicationCount`.
    ///
    /// The job is checked before anything is written. The increment happens
    /// after the insert and is not transactional with it.
    pub async fn submit(&self, mut application: NewApplication) -> ApiResult<InsertResult> {
        application.validate()?;
        application.strip_reserved();

        let job_id = JobId::parse(&application.job_id)?;
        if self.jobs.get(&job_id).await?.is_none() {
            return Err(ApiError::not_found(format!("Job {} not found", job_id)));
        }

        let inserted = self.applications.create(application).await?;
        let count = self.jobs.increment_application_count(&job_id).await?;
        metrics::record_application_created();

        info!(
            application_id = %inserted.inserted_id,
            job_id = %job_id,
            application_count = count,
            "Application submitted"
        );
        Ok(inserted)
    }

    pub async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> ApiResult<UpdateResult> {
        self.applications
            .update_status(id, status)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ApiError::not_found(format!("Application {} not found", id))
                } else {
                    ApiError::from(e)
                }
            })
    }
}
