use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::document;
use crate::utils::validation::validate_not_blank;

pub const DEFAULT_INTERVIEW_DURATION: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Scheduled,
    Rescheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "SCHEDULED",
            InterviewStatus::Rescheduled => "RESCHEDULED",
            InterviewStatus::InProgress => "IN_PROGRESS",
            InterviewStatus::Completed => "COMPLETED",
            InterviewStatus::Cancelled => "CANCELLED",
            InterviewStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, InterviewStatus::Completed | InterviewStatus::Cancelled)
    }

    /// Targets reachable from this status, excluding the status itself.
    pub fn allowed_transitions(self) -> &'static [InterviewStatus] {
        use InterviewStatus::*;
        match self {
            Scheduled => &[Rescheduled, InProgress, Completed, Cancelled, NoShow],
            Rescheduled => &[Scheduled, InProgress, Completed, Cancelled, NoShow],
            InProgress => &[Completed, Cancelled],
            NoShow => &[Rescheduled, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    /// Re-applying the current status is always legal.
    pub fn can_transition_to(self, next: InterviewStatus) -> bool {
        self == next || self.allowed_transitions().contains(&next)
    }

    pub fn is_upcoming(self) -> bool {
        matches!(self, InterviewStatus::Scheduled | InterviewStatus::Rescheduled)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewType {
    Phone,
    Video,
    Onsite,
    Technical,
    Hr,
    Behavioral,
    SystemDesign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewResult {
    Selected,
    Rejected,
    NextRound,
}

impl InterviewResult {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewResult::Selected => "SELECTED",
            InterviewResult::Rejected => "REJECTED",
            InterviewResult::NextRound => "NEXT_ROUND",
        }
    }
}

impl fmt::Display for InterviewResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid result '{0}'. Must be SELECTED, REJECTED, or NEXT_ROUND")]
pub struct UnknownResult(pub String);

impl FromStr for InterviewResult {
    type Err = UnknownResult;

    /// Exact literals only; no case folding.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "SELECTED" => Ok(InterviewResult::Selected),
            "REJECTED" => Ok(InterviewResult::Rejected),
            "NEXT_ROUND" => Ok(InterviewResult::NextRound),
            other => Err(UnknownResult(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Interview cannot move from {from} to {to}")]
    IllegalTransition {
        from: InterviewStatus,
        to: InterviewStatus,
    },
    #[error("Interview already has a next round ({0})")]
    NextRoundAlreadyLinked(String),
    #[error("Round {0} is the last round that can be scheduled")]
    RoundLimitReached(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub organisation_id: String,
    pub candidate_id: String,
    pub interviewer_ids: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration: u32,
    pub interview_type: InterviewType,
    pub round: u32,
    pub status: InterviewStatus,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub candidate_confirmed: bool,
    pub candidate_confirmed_at: Option<DateTime<Utc>>,
    pub feedback_requested: bool,
    pub feedback_requested_at: Option<DateTime<Utc>>,
    pub result: Option<InterviewResult>,
    pub next_round_interview_id: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

document!(Interview, "interviews");

/// Everything needed to open a new interview in SCHEDULED.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub organisation_id: String,
    pub candidate_id: String,
    pub interviewer_ids: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration: Option<u32>,
    pub interview_type: InterviewType,
    pub round: u32,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Interview {
    pub fn new(new: NewInterview, now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            organisation_id: new.organisation_id,
            candidate_id: new.candidate_id,
            interviewer_ids: new.interviewer_ids,
            scheduled_at: new.scheduled_at,
            duration: new.duration.unwrap_or(DEFAULT_INTERVIEW_DURATION),
            interview_type: new.interview_type,
            round: new.round,
            status: InterviewStatus::Scheduled,
            meeting_link: new.meeting_link,
            location: new.location,
            notes: new.notes,
            candidate_confirmed: false,
            candidate_confirmed_at: None,
            feedback_requested: false,
            feedback_requested_at: None,
            result: None,
            next_round_interview_id: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the follow-on interview: same candidate and organisation, next round.
    pub fn spawn_next_round(
        &self,
        details: NextRoundDetails,
        now: DateTime<Utc>,
    ) -> Result<Interview, LifecycleError> {
        let round = self
            .round
            .checked_add(1)
            .ok_or(LifecycleError::RoundLimitReached(self.round))?;
        Ok(Interview::new(
            NewInterview {
                organisation_id: self.organisation_id.clone(),
                candidate_id: self.candidate_id.clone(),
                interviewer_ids: details.interviewer_ids,
                scheduled_at: details.scheduled_at,
                duration: details.duration,
                interview_type: details.interview_type,
                round,
                meeting_link: details.meeting_link,
                location: details.location,
                notes: details.notes,
            },
            now,
        ))
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        // Clock skew must never put updated_at before created_at.
        self.updated_at = now.max(self.created_at);
    }

    /// Notes are a log: each entry lands on its own line.
    pub fn append_note(&mut self, label: &str, text: &str) {
        let entry = format!("{}: {}", label, text);
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, entry),
            _ => entry,
        });
    }

    pub fn transition_to(
        &mut self,
        next: InterviewStatus,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(next) {
            return Err(LifecycleError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if let Some(reason) = reason {
            self.append_note("Status update reason", reason);
        }
        self.touch(now);
        Ok(())
    }

    /// Stamps `candidate_confirmed_at` on every call, whatever the answer.
    pub fn confirm(&mut self, confirmed: bool, notes: Option<&str>, now: DateTime<Utc>) {
        self.candidate_confirmed = confirmed;
        self.candidate_confirmed_at = Some(now);
        if let Some(notes) = notes {
            self.append_note("Candidate confirmation notes", notes);
        }
        self.touch(now);
    }

    pub fn record_result(
        &mut self,
        result: InterviewResult,
        comments: Option<&str>,
        now: DateTime<Utc>,
    ) {
        self.result = Some(result);
        self.status = InterviewStatus::Completed;
        if let Some(comments) = comments {
            self.append_note("Result comments", comments);
        }
        self.touch(now);
    }

    pub fn request_feedback(&mut self, now: DateTime<Utc>) {
        self.feedback_requested = true;
        self.feedback_requested_at = Some(now);
        self.touch(now);
    }

    /// A cancelled interview carries no result.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = InterviewStatus::Cancelled;
        self.result = None;
        self.touch(now);
    }

    pub fn ensure_next_round_unlinked(&self) -> Result<(), LifecycleError> {
        match &self.next_round_interview_id {
            Some(existing) => Err(LifecycleError::NextRoundAlreadyLinked(existing.clone())),
            None => Ok(()),
        }
    }

    pub fn link_next_round(
        &mut self,
        next_round_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        self.ensure_next_round_unlinked()?;
        self.next_round_interview_id = Some(next_round_id.to_string());
        self.touch(now);
        Ok(())
    }

    pub fn has_interviewer(&self, interviewer_id: &str) -> bool {
        self.interviewer_ids.iter().any(|id| id == interviewer_id)
    }
}

pub struct NextRoundDetails {
    pub scheduled_at: DateTime<Utc>,
    pub interview_type: InterviewType,
    pub interviewer_ids: Vec<String>,
    pub duration: Option<u32>,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleInterviewRequest {
    #[validate(custom = "validate_not_blank")]
    pub organisation_id: String,
    #[validate(custom = "validate_not_blank")]
    pub candidate_id: String,
    #[validate(length(min = 1, message = "At least one interviewer is required"))]
    pub interviewer_ids: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: Option<u32>,
    pub interview_type: InterviewType,
    #[validate(range(min = 1, message = "Round must be at least 1"))]
    pub round: u32,
    #[validate(url)]
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInterviewRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: Option<u32>,
    pub interview_type: Option<InterviewType>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInterviewStatusRequest {
    pub status: InterviewStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmInterviewRequest {
    pub confirmed: bool,
    pub notes: Option<String>,
}

/// `result` stays a raw string so unknown literals surface as InvalidArgument
/// instead of a body deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkInterviewResultRequest {
    pub result: String,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNextRoundRequest {
    pub scheduled_at: DateTime<Utc>,
    pub interview_type: InterviewType,
    #[validate(length(min = 1, message = "At least one interviewer is required"))]
    pub interviewer_ids: Vec<String>,
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: Option<u32>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewQuery {
    pub status: Option<InterviewStatus>,
    pub candidate_id: Option<String>,
    pub interviewer_id: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewResponse {
    pub id: String,
    pub organisation_id: String,
    pub candidate_id: String,
    pub interviewer_ids: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration: u32,
    pub interview_type: InterviewType,
    pub round: u32,
    pub status: InterviewStatus,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub candidate_confirmed: bool,
    pub candidate_confirmed_at: Option<DateTime<Utc>>,
    pub feedback_requested: bool,
    pub feedback_requested_at: Option<DateTime<Utc>>,
    pub result: Option<InterviewResult>,
    pub next_round_interview_id: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            organisation_id: interview.organisation_id,
            candidate_id: interview.candidate_id,
            interviewer_ids: interview.interviewer_ids,
            scheduled_at: interview.scheduled_at,
            duration: interview.duration,
            interview_type: interview.interview_type,
            round: interview.round,
            status: interview.status,
            meeting_link: interview.meeting_link,
            location: interview.location,
            notes: interview.notes,
            candidate_confirmed: interview.candidate_confirmed,
            candidate_confirmed_at: interview.candidate_confirmed_at,
            feedback_requested: interview.feedback_requested,
            feedback_requested_at: interview.feedback_requested_at,
            result: interview.result,
            next_round_interview_id: interview.next_round_interview_id,
            version: interview.version,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}
