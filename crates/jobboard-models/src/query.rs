//! Job listing filter and ordering.
//!
//! A `JobQuery` is the store-independent form of the `/jobs` query
//! parameters. Stores translate it into their native query language and may
//! use [`JobQuery::matches`] and [`JobQuery::sort`] for the parts they cannot
//! express natively.

use std::cmp::Ordering;

use crate::job::Job;

/// Inclusive salary band. A job matches when its whole range lies inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBand {
    pub min: i64,
    pub max: i64,
}

/// Result ordering for job listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    /// Store order
    #[default]
    Natural,
    /// Highest `salaryRange.min` first; jobs without a range last
    SalaryMinDesc,
}

/// Filter and ordering for job listings. The default matches every job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    /// Exact match on `hr_email`
    pub hr_email: Option<String>,
    /// Case-insensitive substring match on `location`
    pub location_contains: Option<String>,
    pub salary_band: Option<SalaryBand>,
    pub sort: JobSort,
}

impl JobQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_hr_email(mut self, email: impl Into<String>) -> Self {
        self.hr_email = Some(email.into());
        self
    }

    pub fn with_location(mut self, needle: impl Into<String>) -> Self {
        self.location_contains = Some(needle.into());
        self
    }

    pub fn with_salary_band(mut self, min: i64, max: i64) -> Self {
        self.salary_band = Some(SalaryBand { min, max });
        self
    }

    pub fn sorted_by_salary(mut self) -> Self {
        self.sort = JobSort::SalaryMinDesc;
        self
    }

    /// True when no filter is set.
    pub fn is_unfiltered(&self) -> bool {
        self.hr_email.is_none() && self.location_contains.is_none() && self.salary_band.is_none()
    }

    /// Evaluate every filter against a job.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(email) = &self.hr_email {
            if job.posting.hr_email.as_deref() != Some(email.as_str()) {
                return false;
            }
        }

        if let Some(band) = &self.salary_band {
            match job.salary_range() {
                Some(range) if range.within(band.min, band.max) => {}
                _ => return false,
            }
        }

        self.matches_location(job)
    }

    /// Evaluate only the location filter.
    pub fn matches_location(&self, job: &Job) -> bool {
        match &self.location_contains {
            None => true,
            Some(needle) => job
                .location()
                .map(|loc| loc.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }

    /// Apply the requested ordering in place. The sort is stable.
    pub fn sort(&self, jobs: &mut [Job]) {
        if self.sort == JobSort::SalaryMinDesc {
            jobs.sort_by(|a, b| compare_salary_min_desc(a, b));
        }
    }
}

fn compare_salary_min_desc(a: &Job, b: &Job) -> Ordering {
    match (a.salary_range(), b.salary_range()) {
        (Some(ra), Some(rb)) => rb.min.cmp(&ra.min),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
