//! Job posting models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validator::Validate;

use crate::utils::{validate_document_id, IdResult};

/// Fields owned by the store or by the application workflow.
/// Clients cannot set them through the free-form part of a posting.
const RESERVED_JOB_FIELDS: &[&str] = &["_id", "applicationCount"];

/// Unique identifier for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Parse an identifier received from a client.
    pub fn parse(s: impl AsRef<str>) -> IdResult<Self> {
        validate_document_id(s.as_ref()).map(|id| Self(id.to_string()))
    }

    /// Create from an existing string without validation.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Offered salary band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl SalaryRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            currency: None,
        }
    }

    /// True if this range lies entirely within `[min, max]`.
    pub fn within(&self, min: i64, max: i64) -> bool {
        self.min >= min && self.max <= max
    }
}

/// Descriptive content of a job posting, as submitted by a recruiter.
///
/// Every field is optional. Unknown fields are preserved in `extra` and
/// round-trip through the store unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct JobPosting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,

    /// Contact address of the recruiter who owns the posting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub hr_email: Option<String>,

    #[serde(rename = "salaryRange", default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPosting {
    /// Drop client-supplied values for store-owned fields.
    pub fn strip_reserved(&mut self) {
        for key in RESERVED_JOB_FIELDS {
            self.extra.remove(*key);
        }
    }

    /// Check invariants the derive cannot express.
    pub fn check_salary_range(&self) -> Result<(), String> {
        match &self.salary_range {
            Some(range) if range.min > range.max => Err(format!(
                "salaryRange.min ({}) must not exceed salaryRange.max ({})",
                range.min, range.max
            )),
            _ => Ok(()),
        }
    }
}

/// A stored job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: JobId,

    #[serde(flatten)]
    pub posting: JobPosting,

    /// Number of applications received. Absent in storage means zero.
    #[serde(rename = "applicationCount", default)]
    pub application_count: u64,
}

impl Job {
    pub fn new(id: JobId, posting: JobPosting) -> Self {
        Self {
            id,
            posting,
            application_count: 0,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.posting.title.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.posting.location.as_deref()
    }

    pub fn salary_range(&self) -> Option<&SalaryRange> {
        self.posting.salary_range.as_ref()
    }
}
