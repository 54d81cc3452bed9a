//! Repository tests against a running Firestore emulator.
//!
//! Run with `FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test -- --ignored`.

use std::sync::Arc;

use jobboard_firestore::{
    ApplicationRepository, ApplicationStore, FirestoreClient, FirestoreConfig, JobRepository,
    JobStore,
};
use jobboard_models::{ApplicationStatus, JobId, JobPosting, JobQuery, NewApplication, SalaryRange};

async fn client() -> FirestoreClient {
    let host = std::env::var("FIRESTORE_EMULATOR_HOST").unwrap_or_else(|_| "localhost:8080".into());
    FirestoreClient::new(FirestoreConfig::emulator("jobboard-test", host))
        .await
        .expect("Failed to create emulator client")
}

/// Collection names unique per run so tests do not see each other's data.
fn collection(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires Firestore emulator"]
async fn test_job_round_trip_and_increment() {
    let jobs = JobRepository::new(client().await, collection("jobs"));

    let posting = JobPosting {
        title: Some("Engineer".into()),
        location: Some("Dhaka".into()),
        salary_range: Some(SalaryRange::new(50000, 70000)),
        ..Default::default()
    };
    let inserted = jobs.create(posting.clone()).await.unwrap();
    let id = JobId::from_string(inserted.inserted_id);

    let job = jobs.get(&id).await.unwrap().expect("job should exist");
    assert_eq!(job.posting, posting);
    assert_eq!(job.application_count, 0);

    assert_eq!(jobs.increment_application_count(&id).await.unwrap(), 1);
    assert_eq!(jobs.increment_application_count(&id).await.unwrap(), 2);

    let listed = jobs
        .list(&JobQuery::all().with_salary_band(40000, 80000))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].application_count, 2);
}

#[tokio::test]
#[ignore = "requires Firestore emulator"]
async fn test_concurrent_increments() {
    let jobs = Arc::new(JobRepository::new(client().await, collection("jobs")));
    let id = JobId::from_string(jobs.create(JobPosting::default()).await.unwrap().inserted_id);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let jobs = Arc::clone(&jobs);
            let id = id.clone();
            tokio::spawn(async move { jobs.increment_application_count(&id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let job = jobs.get(&id).await.unwrap().unwrap();
    assert_eq!(job.application_count, 20);
}

#[tokio::test]
#[ignore = "requires Firestore emulator"]
async fn test_application_status_update() {
    let applications = ApplicationRepository::new(client().await, collection("applications"));

    let inserted = applications
        .create(NewApplication::new("job-1", "a@x.com"))
        .await
        .unwrap();

    let listed = applications.list_by_applicant("a@x.com").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ApplicationStatus::Submitted);

    let id = listed[0].id.clone();
    assert_eq!(id.as_str(), inserted.inserted_id);
    let result = applications
        .update_status(&id, ApplicationStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(result.modified_count, 1);

    let listed = applications.list_by_job(&JobId::from("job-1")).await.unwrap();
    assert_eq!(listed[0].status, ApplicationStatus::Accepted);
}
