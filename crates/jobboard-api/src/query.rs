//! `/jobs` query parameters.

use serde::Deserialize;

use jobboard_models::JobQuery;

use crate::error::{ApiError, ApiResult};

/// Raw query string of `GET /jobs`. Every parameter is optional and empty
/// values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    /// Recruiter email, exact match on `hr_email`
    pub email: Option<String>,
    /// `"true"` orders by `salaryRange.min`, highest first
    pub sort: Option<String>,
    /// Substring of `location`, case-insensitive
    pub search: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(name: &str, value: &str) -> ApiResult<i64> {
    value
        .parse()
        .map_err(|_| ApiError::validation(format!("{} must be an integer, got '{}'", name, value)))
}

impl JobListParams {
    /// Build the listing filter.
    ///
    /// The salary band applies only when both `min` and `max` are given.
    /// Either one that is not an integer is rejected.
    pub fn to_query(&self) -> ApiResult<JobQuery> {
        let mut query = JobQuery::all();

        if let Some(email) = present(&self.email) {
            query = query.with_hr_email(email);
        }

        if let Some(search) = present(&self.search) {
            query = query.with_location(search);
        }

        let min = present(&self.min).map(|v| parse_bound("min", v)).transpose()?;
        let max = present(&self.max).map(|v| parse_bound("max", v)).transpose()?;
        if let (Some(min), Some(max)) = (min, max) {
            query = query.with_salary_band(min, max);
        }

        if self.sort.as_deref() == Some("true") {
            query = query.sorted_by_salary();
        }

        Ok(query)
    }
}
