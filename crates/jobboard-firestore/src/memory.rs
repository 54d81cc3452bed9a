//! In-process store for local development and tests.
//!
//! Records keep insertion order, which is the natural order of listings.
//! Every write holds the collection's write lock for its whole duration, so
//! counter increments are atomic.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, InsertResult, Job, JobId, JobPosting, JobQuery,
    NewApplication, UpdateResult,
};

use crate::error::{FirestoreError, FirestoreResult};
use crate::store::{ApplicationStore, JobStore};

/// Both collections held in memory.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<Vec<Job>>,
    applications: RwLock<Vec<Application>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list(&self, query: &JobQuery) -> FirestoreResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .await
            .iter()
            .filter(|job| query.matches(job))
            .cloned()
            .collect();
        query.sort(&mut jobs);
        Ok(jobs)
    }

    async fn get(&self, id: &JobId) -> FirestoreResult<Option<Job>> {
        Ok(self.jobs.read().await.iter().find(|job| &job.id == id).cloned())
    }

    async fn get_many(&self, ids: &[JobId]) -> FirestoreResult<HashMap<JobId, Job>> {
        let wanted: HashSet<&JobId> = ids.iter().collect();
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|job| wanted.contains(&job.id))
            .map(|job| (job.id.clone(), job.clone()))
            .collect())
    }

    async fn create(&self, mut posting: JobPosting) -> FirestoreResult<InsertResult> {
        posting.strip_reserved();
        let id = Self::next_id();
        self.jobs
            .write()
            .await
            .push(Job::new(JobId::from_string(id.clone()), posting));
        Ok(InsertResult::new(id))
    }

    async fn increment_application_count(&self, id: &JobId) -> FirestoreResult<u64> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|job| &job.id == id)
            .ok_or_else(|| FirestoreError::not_found(format!("jobs/{}", id)))?;
        job.application_count += 1;
        Ok(job.application_count)
    }

    async fn health_check(&self) -> FirestoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn list_by_applicant(&self, email: &str) -> FirestoreResult<Vec<Application>> {
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .filter(|app| app.applicant_email == email)
            .cloned()
            .collect())
    }

    async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>> {
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .filter(|app| &app.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn create(&self, mut application: NewApplication) -> FirestoreResult<InsertResult> {
        application.strip_reserved();
        let id = Self::next_id();
        let stored = Application {
            id: ApplicationId::from_string(id.clone()),
            job_id: JobId::from_string(application.job_id),
            applicant_email: application.applicant_email,
            status: application.status.unwrap_or_default(),
            extra: application.extra,
        };
        self.applications.write().await.push(stored);
        Ok(InsertResult::new(id))
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> FirestoreResult<UpdateResult> {
        let mut applications = self.applications.write().await;
        let application = applications
            .iter_mut()
            .find(|app| &app.id == id)
            .ok_or_else(|| FirestoreError::not_found(format!("applications/{}", id)))?;

        let modified = application.status != status;
        application.status = status;
        Ok(UpdateResult::single(modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_models::SalaryRange;
    use std::sync::Arc;

    fn posting(title: &str, salary: Option<(i64, i64)>) -> JobPosting {
        JobPosting {
            title: Some(title.to_string()),
            salary_range: salary.map(|(min, max)| SalaryRange::new(min, max)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_posting() {
        let store = MemoryStore::new();
        let inserted = JobStore::create(&store, posting("Engineer", None)).await.unwrap();
        assert!(inserted.acknowledged);

        let job = store
            .get(&JobId::from_string(inserted.inserted_id.clone()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.title(), Some("Engineer"));
        assert_eq!(job.application_count, 0);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_sorts_on_request() {
        let store = MemoryStore::new();
        for (title, salary) in [("a", Some((10, 20))), ("b", None), ("c", Some((30, 40)))] {
            JobStore::create(&store, posting(title, salary)).await.unwrap();
        }

        let natural: Vec<_> = store
            .list(&JobQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.posting.title.unwrap())
            .collect();
        assert_eq!(natural, vec!["a", "b", "c"]);

        let sorted: Vec<_> = store
            .list(&JobQuery::all().sorted_by_salary())
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.posting.title.unwrap())
            .collect();
        assert_eq!(sorted, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown_ids() {
        let store = MemoryStore::new();
        let id = JobStore::create(&store, posting("a", None)).await.unwrap().inserted_id;

        let found = store
            .get_many(&[JobId::from_string(id.clone()), JobId::from("missing")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&JobId::from_string(id)));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let id = JobId::from_string(
            JobStore::create(store.as_ref(), posting("a", None))
                .await
                .unwrap()
                .inserted_id,
        );

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                tokio::spawn(async move { store.increment_application_count(&id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let job = store.get(&id).await.unwrap().unwrap();
        assert_eq!(job.application_count, 50);
    }

    #[tokio::test]
    async fn test_increment_missing_job_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .increment_application_count(&JobId::from("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_application_lifecycle() {
        let store = MemoryStore::new();
        let mut new_app = NewApplication::new("j1", "a@x.com");
        new_app.extra.insert("title".into(), "spoofed".into());
        let id = ApplicationStore::create(&store, new_app).await.unwrap().inserted_id;
        let id = ApplicationId::from_string(id);

        let mine = store.list_by_applicant("a@x.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, ApplicationStatus::Submitted);
        assert!(!mine[0].extra.contains_key("title"));
        assert!(store.list_by_applicant("b@x.com").await.unwrap().is_empty());

        let result = store.update_status(&id, ApplicationStatus::Accepted).await.unwrap();
        assert_eq!(result.modified_count, 1);
        let result = store.update_status(&id, ApplicationStatus::Accepted).await.unwrap();
        assert_eq!(result.modified_count, 0);

        let for_job = store.list_by_job(&JobId::from("j1")).await.unwrap();
        assert_eq!(for_job[0].status, ApplicationStatus::Accepted);
    }

    #[tokio::test]
    async fn test_update_missing_application_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_status(&ApplicationId::from_string("nope"), ApplicationStatus::Rejected)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
