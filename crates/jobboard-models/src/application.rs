//! Job application models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::job::{Job, JobId};
use crate::utils::{validate_document_id, IdResult};

/// Fields that are either store-owned or filled in by enrichment at read time.
const RESERVED_APPLICATION_FIELDS: &[&str] = &[
    "_id",
    "title",
    "location",
    "company",
    "company_logo",
];

/// Unique identifier for an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Parse an identifier received from a client.
    pub fn parse(s: impl AsRef<str>) -> IdResult<Self> {
        validate_document_id(s.as_ref()).map(|id| Self(id.to_string()))
    }

    /// Create from an existing string without validation.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Received, not yet looked at
    #[default]
    #[serde(alias = "pending")]
    Submitted,
    /// Seen by the recruiter
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// A decision has been made on the application.
    pub fn is_final(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a status string is outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application status '{0}', expected one of: submitted, reviewed, accepted, rejected")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" | "pending" => Ok(Self::Submitted),
            "reviewed" => Ok(Self::Reviewed),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Application as submitted by an applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewApplication {
    #[validate(length(min = 1, message = "job_id is required"))]
    pub job_id: String,

    #[validate(email)]
    pub applicant_email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,

    /// Free-form applicant details (resume link, profiles, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewApplication {
    pub fn new(job_id: impl Into<String>, applicant_email: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            applicant_email: applicant_email.into(),
            status: None,
            extra: Map::new(),
        }
    }

    /// Drop client-supplied values for store-owned and enrichment fields.
    pub fn strip_reserved(&mut self) {
        for key in RESERVED_APPLICATION_FIELDS {
            self.extra.remove(*key);
        }
    }
}

/// A stored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ApplicationId,

    /// Soft reference to a job; not enforced by the store
    pub job_id: JobId,

    pub applicant_email: String,

    #[serde(default)]
    pub status: ApplicationStatus,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display fields copied from a job onto its applications at read time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            title: job.posting.title.clone(),
            location: job.posting.location.clone(),
            company: job.posting.company.clone(),
            company_logo: job.posting.company_logo.clone(),
        }
    }
}

/// An application joined with display fields of the job it references.
///
/// `job` is `None` when the referenced job no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedApplication {
    #[serde(flatten)]
    pub application: Application,

    #[serde(flatten)]
    pub job: Option<JobSummary>,
}

impl EnrichedApplication {
    /// When `job` is present its display fields replace any stored under the
    /// same keys in `application.extra`.
    pub fn new(mut application: Application, job: Option<&Job>) -> Self {
        if job.is_some() {
            for key in RESERVED_APPLICATION_FIELDS {
                application.extra.remove(*key);
            }
        }
        Self {
            application,
            job: job.map(JobSummary::from),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.job.is_some()
    }
}
