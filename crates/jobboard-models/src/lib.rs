//! Shared data models for the job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and their salary ranges
//! - Applications, review statuses and read-time enrichment
//! - Job listing filters
//! - Store write acknowledgements

pub mod application;
pub mod job;
pub mod query;
pub mod utils;
pub mod write_result;

// Re-export common types
pub use application::{
    Application, ApplicationId, ApplicationStatus, EnrichedApplication, JobSummary,
    NewApplication, UnknownStatus,
};
pub use job::{Job, JobId, JobPosting, SalaryRange};
pub use query::{JobQuery, JobSort, SalaryBand};
pub use utils::{document_id_from_name, validate_document_id, IdError, IdResult};
pub use write_result::{InsertResult, UpdateResult};
