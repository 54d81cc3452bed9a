//! Job application handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, EnrichedApplication, InsertResult, JobId,
    NewApplication, UpdateResult,
};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicantParams {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// The caller's own applications, joined with job display fields.
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<ApplicantParams>, QueryRejection>,
) -> ApiResult<Json<Vec<EnrichedApplication>>> {
    let Query(params) = params?;
    user.authorize(params.email.as_deref())?;

    let applications = state.service.list_for_applicant(&user.email).await?;
    Ok(Json(applications))
}

/// Applications received by one job.
pub async fn list_job_applications(
    State(state): State<AppState>,
    job_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<Application>>> {
    let Path(job_id) = job_id?;
    let job_id = JobId::parse(&job_id)?;

    let applications = state.service.list_for_job(&job_id).await?;
    Ok(Json(applications))
}

/// Apply to a job. Fails with 404 when the job does not exist.
pub async fn create_application(
    State(state): State<AppState>,
    body: Result<Json<NewApplication>, JsonRejection>,
) -> ApiResult<Json<InsertResult>> {
    let Json(application) = body?;
    let inserted = state.service.submit(application).await?;
    Ok(Json(inserted))
}

/// Move an application to another review status.
pub async fn update_application_status(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<UpdateResult>> {
    let Path(id) = id?;
    let id = ApplicationId::parse(&id)?;
    let Json(update) = body?;

    let status: ApplicationStatus = update.status.parse()?;
    if status.is_final() {
        info!(application_id = %id, status = status.as_str(), "Application decided");
    }

    let result = state.service.update_status(&id, status).await?;
    Ok(Json(result))
}
