//! Job posting handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{debug, info};
use validator::Validate;

use jobboard_models::{InsertResult, Job, JobId, JobPosting};

use crate::error::{ApiError, ApiResult};
use crate::query::JobListParams;
use crate::state::AppState;

/// List jobs, optionally filtered by recruiter, location and salary band.
pub async fn list_jobs(
    State(state): State<AppState>,
    params: Result<Query<JobListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Job>>> {
    let Query(params) = params?;
    let query = params.to_query()?;

    let jobs = state.jobs.list(&query).await?;
    debug!(count = jobs.len(), "Listed jobs");

    Ok(Json(jobs))
}

/// Fetch one job.
pub async fn get_job(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Job>> {
    let Path(id) = id?;
    let id = JobId::parse(&id)?;

    state
        .jobs
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", id)))
}

/// Create a job posting. Unknown fields are stored as submitted.
pub async fn create_job(
    State(state): State<AppState>,
    body: Result<Json<JobPosting>, JsonRejection>,
) -> ApiResult<Json<InsertResult>> {
    let Json(posting) = body?;
    posting.validate()?;
    posting.check_salary_range().map_err(ApiError::validation)?;

    let inserted = state.jobs.create(posting).await?;
    info!(job_id = %inserted.inserted_id, "Job created");

    Ok(Json(inserted))
}
