use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::config::{AppConfig, StorageBackend};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::interview::{Interview, InterviewResult, InterviewType, ScheduleInterviewRequest};
use crate::models::interviewer::Interviewer;
use crate::models::organisation::Organisation;
use crate::repository::{
    Document, DocumentStore, MemoryStore, Page, PageRequest, Query, RepositoryError, Stores,
};
use crate::services::interview::InterviewService;
use crate::services::notification::{NotificationError, NotificationGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Sent {
    Scheduled(String),
    InterviewerAssigned(String, String),
    Confirmed(String),
    Cancelled(String, String),
    InterviewerFeedback(String, String),
    CandidateFeedback(String),
    Result(String, InterviewResult),
    NextRound(String),
    Verification(String, Option<String>),
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    pub(super) fn sent(&self) -> Vec<Sent> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }

    fn record(&self, sent: Sent) -> Result<(), NotificationError> {
        self.sent.lock().expect("notifier mutex poisoned").push(sent);
        Ok(())
    }
}

impl NotificationGateway for RecordingNotifier {
    fn notify_interview_scheduled(&self, interview: &Interview) -> Result<(), NotificationError> {
        self.record(Sent::Scheduled(interview.id.clone()))
    }

    fn notify_interviewer_assigned(
        &self,
        interviewer_id: &str,
        interview: &Interview,
    ) -> Result<(), NotificationError> {
        self.record(Sent::InterviewerAssigned(
            interviewer_id.to_string(),
            interview.id.clone(),
        ))
    }

    fn notify_interview_confirmed(&self, interview: &Interview) -> Result<(), NotificationError> {
        self.record(Sent::Confirmed(interview.id.clone()))
    }

    fn notify_interview_cancelled(
        &self,
        interview: &Interview,
        reason: &str,
    ) -> Result<(), NotificationError> {
        self.record(Sent::Cancelled(interview.id.clone(), reason.to_string()))
    }

    fn request_interviewer_feedback(
        &self,
        interviewer_id: &str,
        interview: &Interview,
    ) -> Result<(), NotificationError> {
        self.record(Sent::InterviewerFeedback(
            interviewer_id.to_string(),
            interview.id.clone(),
        ))
    }

    fn request_candidate_feedback(&self, interview: &Interview) -> Result<(), NotificationError> {
        self.record(Sent::CandidateFeedback(interview.id.clone()))
    }

    fn notify_candidate_result(
        &self,
        interview: &Interview,
        result: InterviewResult,
    ) -> Result<(), NotificationError> {
        self.record(Sent::Result(interview.id.clone(), result))
    }

    fn notify_next_round_scheduled(&self, interview: &Interview) -> Result<(), NotificationError> {
        self.record(Sent::NextRound(interview.id.clone()))
    }

    fn notify_verification_status(
        &self,
        organisation: &Organisation,
        reason: Option<&str>,
    ) -> Result<(), NotificationError> {
        self.record(Sent::Verification(
            organisation.id.clone(),
            reason.map(str::to_string),
        ))
    }
}

/// Every notification fails.
pub(super) struct FailingNotifier;

impl FailingNotifier {
    fn fail() -> Result<(), NotificationError> {
        Err(NotificationError("smtp unavailable".to_string()))
    }
}

impl NotificationGateway for FailingNotifier {
    fn notify_interview_scheduled(&self, _: &Interview) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn notify_interviewer_assigned(&self, _: &str, _: &Interview) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn notify_interview_confirmed(&self, _: &Interview) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn notify_interview_cancelled(&self, _: &Interview, _: &str) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn request_interviewer_feedback(&self, _: &str, _: &Interview) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn request_candidate_feedback(&self, _: &Interview) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn notify_candidate_result(
        &self,
        _: &Interview,
        _: InterviewResult,
    ) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn notify_next_round_scheduled(&self, _: &Interview) -> Result<(), NotificationError> {
        Self::fail()
    }
    fn notify_verification_status(
        &self,
        _: &Organisation,
        _: Option<&str>,
    ) -> Result<(), NotificationError> {
        Self::fail()
    }
}

/// Memory store whose `update` always fails; everything else passes through.
pub(super) struct ReadOnlyUpdates<T> {
    pub(super) inner: MemoryStore<T>,
}

impl<T> Default for ReadOnlyUpdates<T> {
    fn default() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for ReadOnlyUpdates<T> {
    async fn insert(&self, document: T) -> Result<T, RepositoryError> {
        self.inner.insert(document).await
    }
    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        self.inner.get(id).await
    }
    async fn update(&self, _document: T) -> Result<T, RepositoryError> {
        Err(RepositoryError::Database("connection reset".to_string()))
    }
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        self.inner.delete(id).await
    }
    async fn find(&self, query: &Query, page: PageRequest) -> Result<Page<T>, RepositoryError> {
        self.inner.find(query, page).await
    }
    async fn find_all(&self, query: &Query) -> Result<Vec<T>, RepositoryError> {
        self.inner.find_all(query).await
    }
    async fn count(&self, query: &Query) -> Result<u64, RepositoryError> {
        self.inner.count(query).await
    }
}

pub(super) fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        storage: StorageBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_minutes: 15,
        refresh_token_days: 7,
        bcrypt_cost: 4,
        cors_allowed_origin: "*".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        reminder_cron: "0 0 9 * * *".to_string(),
        max_request_body_mb: 1,
    })
}

pub(super) fn interview_service(stores: &Stores) -> (InterviewService, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let service = InterviewService::new(stores.clone(), notifier.clone());
    (service, notifier)
}

pub(super) async fn seed_candidate(stores: &Stores, email: &str) -> Candidate {
    let now = Utc::now();
    stores
        .candidates
        .insert(Candidate {
            id: String::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: None,
            position: Some("Backend Engineer".to_string()),
            experience_years: Some(5),
            skills: vec!["rust".to_string()],
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            status: CandidateStatus::Applied,
            organisation_id: Some("org-1".to_string()),
            user_id: None,
            version: 0,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed candidate")
}

pub(super) async fn seed_interviewer(stores: &Stores, email: &str) -> Interviewer {
    let now = Utc::now();
    stores
        .interviewers
        .insert(Interviewer {
            id: String::new(),
            user_id: None,
            organisation_id: Some("org-1".to_string()),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            phone: None,
            department: Some("Platform".to_string()),
            designation: None,
            expertise: vec!["rust".to_string(), "distributed-systems".to_string()],
            years_of_experience: Some(12),
            is_available: true,
            total_interviews: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed interviewer")
}

pub(super) fn schedule_request(
    candidate_id: &str,
    interviewer_ids: &[&str],
) -> ScheduleInterviewRequest {
    ScheduleInterviewRequest {
        organisation_id: "org-1".to_string(),
        candidate_id: candidate_id.to_string(),
        interviewer_ids: interviewer_ids.iter().map(|id| id.to_string()).collect(),
        scheduled_at: Utc::now() + Duration::days(2),
        duration: None,
        interview_type: InterviewType::Video,
        round: 1,
        meeting_link: Some("https://meet.example.com/abc".to_string()),
        location: None,
        notes: None,
    }
}

/// Stores with a scheduled interview between one candidate and one interviewer.
pub(super) async fn scheduled() -> (Stores, InterviewService, Arc<RecordingNotifier>, Interview) {
    let stores = Stores::in_memory();
    let candidate = seed_candidate(&stores, "ada@example.com").await;
    let interviewer = seed_interviewer(&stores, "grace@example.com").await;
    let (service, notifier) = interview_service(&stores);
    let response = service
        .schedule(schedule_request(&candidate.id, &[&interviewer.id]))
        .await
        .expect("schedule");
    let interview = stores
        .interviews
        .get(&response.id)
        .await
        .expect("get")
        .expect("stored");
    (stores, service, notifier, interview)
}
