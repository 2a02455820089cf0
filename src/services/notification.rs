use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::{
    models::{
        interview::{Interview, InterviewResult},
        organisation::Organisation,
    },
    repository::{Query, Stores},
};

#[derive(Debug, thiserror::Error)]
#[error("notification delivery failed: {0}")]
pub struct NotificationError(pub String);

/// Outbound notifications. Callers log failures and carry on; a failed
/// notification never undoes a committed change.
pub trait NotificationGateway: Send + Sync {
    fn notify_interview_scheduled(&self, interview: &Interview) -> Result<(), NotificationError>;

    fn notify_interviewer_assigned(
        &self,
        interviewer_id: &str,
        interview: &Interview,
    ) -> Result<(), NotificationError>;

    fn notify_interview_confirmed(&self, interview: &Interview) -> Result<(), NotificationError>;

    fn notify_interview_cancelled(
        &self,
        interview: &Interview,
        reason: &str,
    ) -> Result<(), NotificationError>;

    fn request_interviewer_feedback(
        &self,
        interviewer_id: &str,
        interview: &Interview,
    ) -> Result<(), NotificationError>;

    fn request_candidate_feedback(&self, interview: &Interview) -> Result<(), NotificationError>;

    fn notify_candidate_result(
        &self,
        interview: &Interview,
        result: InterviewResult,
    ) -> Result<(), NotificationError>;

    fn notify_next_round_scheduled(&self, interview: &Interview) -> Result<(), NotificationError>;

    fn notify_verification_status(
        &self,
        organisation: &Organisation,
        reason: Option<&str>,
    ) -> Result<(), NotificationError>;
}

/// Default gateway: writes every notification to the log instead of sending it.
#[derive(Debug, Default)]
pub struct LoggingNotifier;

impl NotificationGateway for LoggingNotifier {
    fn notify_interview_scheduled(&self, interview: &Interview) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: interview {} scheduled for candidate {} at {}",
            interview.id,
            interview.candidate_id,
            interview.scheduled_at
        );
        Ok(())
    }

    fn notify_interviewer_assigned(
        &self,
        interviewer_id: &str,
        interview: &Interview,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: interviewer {} assigned to interview {} (round {})",
            interviewer_id,
            interview.id,
            interview.round
        );
        Ok(())
    }

    fn notify_interview_confirmed(&self, interview: &Interview) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: candidate {} confirmed interview {}",
            interview.candidate_id,
            interview.id
        );
        Ok(())
    }

    fn notify_interview_cancelled(
        &self,
        interview: &Interview,
        reason: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: interview {} cancelled for candidate {} and {} interviewer(s): {}",
            interview.id,
            interview.candidate_id,
            interview.interviewer_ids.len(),
            reason
        );
        Ok(())
    }

    fn request_interviewer_feedback(
        &self,
        interviewer_id: &str,
        interview: &Interview,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: feedback requested from interviewer {} for interview {}",
            interviewer_id,
            interview.id
        );
        Ok(())
    }

    fn request_candidate_feedback(&self, interview: &Interview) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: feedback requested from candidate {} for interview {}",
            interview.candidate_id,
            interview.id
        );
        Ok(())
    }

    fn notify_candidate_result(
        &self,
        interview: &Interview,
        result: InterviewResult,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: candidate {} result for interview {} is {}",
            interview.candidate_id,
            interview.id,
            result
        );
        Ok(())
    }

    fn notify_next_round_scheduled(&self, interview: &Interview) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: round {} scheduled for candidate {} at {}",
            interview.round,
            interview.candidate_id,
            interview.scheduled_at
        );
        Ok(())
    }

    fn notify_verification_status(
        &self,
        organisation: &Organisation,
        reason: Option<&str>,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            "Notification: organisation {} ({}) is now {:?}{}",
            organisation.name,
            organisation.contact_email,
            organisation.verification_status,
            reason.map(|r| format!(": {}", r)).unwrap_or_default()
        );
        Ok(())
    }
}

/// Logs a failed notification and swallows it.
pub fn log_failure(kind: &str, interview_id: &str, result: Result<(), NotificationError>) {
    if let Err(e) = result {
        tracing::warn!("Failed to send {} notification for {}: {}", kind, interview_id, e);
    }
}

/// Nudges candidates who have not confirmed an interview starting soon.
pub struct ReminderService {
    stores: Stores,
    notifier: Arc<dyn NotificationGateway>,
}

impl ReminderService {
    pub fn new(stores: Stores, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self { stores, notifier }
    }

    /// Returns how many reminders went out.
    pub async fn send_upcoming_reminders(&self, window_hours: i64) -> anyhow::Result<usize> {
        let now = Utc::now();
        let upcoming = self
            .stores
            .interviews
            .find_all(
                &Query::new()
                    .between("scheduled_at", now, now + Duration::hours(window_hours))
                    .eq("candidate_confirmed", false),
            )
            .await?;

        let mut sent = 0;
        for interview in upcoming
            .iter()
            .filter(|interview| interview.status.is_upcoming())
        {
            match self.notifier.notify_interview_scheduled(interview) {
                Ok(()) => sent += 1,
                Err(e) => tracing::error!("Failed to send reminder for {}: {}", interview.id, e),
            }
        }

        tracing::info!(
            "Sent {} interview reminder(s) for the next {} hours",
            sent,
            window_hours
        );
        Ok(sent)
    }

    pub async fn process_daily_reminders(&self) -> anyhow::Result<usize> {
        self.send_upcoming_reminders(24).await
    }
}
