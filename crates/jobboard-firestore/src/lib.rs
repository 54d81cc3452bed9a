//! Firestore REST API client and job board stores.
//!
//! This crate provides:
//! - A Firestore REST client with token caching, retries and metrics
//! - Store traits for jobs and applications
//! - Firestore-backed repositories for both collections
//! - An in-memory store with the same behaviour for development and tests

pub mod applications_repo;
pub mod client;
pub mod error;
pub mod jobs_repo;
pub mod memory;
pub mod metrics;
pub mod query;
pub mod retry;
pub mod store;
pub mod token_cache;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use applications_repo::{ApplicationRepository, APPLICATIONS_COLLECTION};
pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use jobs_repo::{JobRepository, JOBS_COLLECTION};
pub use memory::MemoryStore;
pub use retry::RetryConfig;
pub use store::{ApplicationStore, JobStore};
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
