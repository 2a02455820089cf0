//! Interview lifecycle: scheduling, status changes, confirmation, results,
//! follow-up rounds, feedback requests and cancellation.
//!
//! Every mutation is a read-modify-write against the interview store. The
//! store rejects stale versions, so two concurrent writers on the same
//! interview surface as `ServiceError::Conflict` instead of a lost update.

use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use super::notification::{log_failure, NotificationGateway};
use super::{not_found, ServiceResult};
use crate::{
    models::interview::{
        ConfirmInterviewRequest, CreateNextRoundRequest, Interview, InterviewQuery,
        InterviewResponse, InterviewResult, MarkInterviewResultRequest, NewInterview,
        NextRoundDetails, ScheduleInterviewRequest, UpdateInterviewRequest,
        UpdateInterviewStatusRequest,
    },
    repository::{Page, PageRequest, Query, Stores},
    utils::logger::{metadata, LOGGER},
};

const CANCELLATION_REASON: &str = "Interview cancelled";

pub struct InterviewService {
    stores: Stores,
    notifier: Arc<dyn NotificationGateway>,
}

impl InterviewService {
    pub fn new(stores: Stores, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self { stores, notifier }
    }

    async fn load(&self, id: &str) -> ServiceResult<Interview> {
        self.stores
            .interviews
            .get(id)
            .await?
            .ok_or_else(|| not_found("Interview", id))
    }

    /// Drops repeated ids while keeping the caller's order.
    fn dedupe(ids: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
    }

    async fn ensure_interviewers_exist(&self, interviewer_ids: &[String]) -> ServiceResult<()> {
        for interviewer_id in interviewer_ids {
            if self.stores.interviewers.get(interviewer_id).await?.is_none() {
                return Err(not_found("Interviewer", interviewer_id));
            }
        }
        Ok(())
    }

    /// Best effort: a failed increment is logged and the interview stays booked.
    async fn increment_interview_counts(&self, interview: &Interview) {
        for interviewer_id in &interview.interviewer_ids {
            let result = async {
                let mut interviewer = self
                    .stores
                    .interviewers
                    .get(interviewer_id)
                    .await?
                    .ok_or_else(|| not_found("Interviewer", interviewer_id))?;
                interviewer.total_interviews += 1;
                interviewer.updated_at = Utc::now();
                self.stores.interviewers.update(interviewer).await?;
                Ok::<(), super::ServiceError>(())
            }
            .await;

            if let Err(e) = result {
                tracing::warn!(
                    "Failed to increment interview count for interviewer {} (interview {}): {}",
                    interviewer_id,
                    interview.id,
                    e
                );
            }
        }
    }

    pub async fn schedule(&self, request: ScheduleInterviewRequest) -> ServiceResult<InterviewResponse> {
        request.validate()?;

        let interviewer_ids = Self::dedupe(request.interviewer_ids);

        if self.stores.candidates.get(&request.candidate_id).await?.is_none() {
            return Err(not_found("Candidate", &request.candidate_id));
        }
        self.ensure_interviewers_exist(&interviewer_ids).await?;

        let interview = Interview::new(
            NewInterview {
                organisation_id: request.organisation_id,
                candidate_id: request.candidate_id,
                interviewer_ids,
                scheduled_at: request.scheduled_at,
                duration: request.duration,
                interview_type: request.interview_type,
                round: request.round,
                meeting_link: request.meeting_link,
                location: request.location,
                notes: request.notes,
            },
            Utc::now(),
        );
        let interview = self.stores.interviews.insert(interview).await?;

        self.increment_interview_counts(&interview).await;

        LOGGER.log_business_event(
            "interview_scheduled",
            Some(&interview.id),
            metadata([
                ("candidate_id", json!(interview.candidate_id)),
                ("round", json!(interview.round)),
                ("interviewers", json!(interview.interviewer_ids.len())),
            ]),
        );

        Ok(interview.into())
    }

    pub async fn get(&self, id: &str) -> ServiceResult<InterviewResponse> {
        Ok(self.load(id).await?.into())
    }

    /// Filter precedence: date range, status with candidate, status with
    /// interviewer, status, candidate, interviewer, then everything.
    pub async fn list(&self, filter: InterviewQuery) -> ServiceResult<Page<InterviewResponse>> {
        let page = PageRequest::new(filter.page, filter.size);

        let query = match (
            filter.from_date,
            filter.to_date,
            filter.status,
            filter.candidate_id,
            filter.interviewer_id,
        ) {
            (Some(from), Some(to), _, _, _) => Query::new().between("scheduled_at", from, to),
            (_, _, Some(status), Some(candidate_id), _) => Query::new()
                .eq("status", status)
                .eq("candidate_id", candidate_id),
            (_, _, Some(status), None, Some(interviewer_id)) => Query::new()
                .eq("status", status)
                .contains("interviewer_ids", interviewer_id),
            (_, _, Some(status), None, None) => Query::new().eq("status", status),
            (_, _, None, Some(candidate_id), _) => Query::new().eq("candidate_id", candidate_id),
            (_, _, None, None, Some(interviewer_id)) => {
                Query::new().contains("interviewer_ids", interviewer_id)
            }
            _ => Query::new(),
        };

        let page = self.stores.interviews.find(&query, page).await?;
        Ok(page.map(InterviewResponse::from))
    }

    pub async fn update_details(
        &self,
        id: &str,
        request: UpdateInterviewRequest,
    ) -> ServiceResult<InterviewResponse> {
        request.validate()?;

        let mut interview = self.load(id).await?;

        if let Some(scheduled_at) = request.scheduled_at {
            interview.scheduled_at = scheduled_at;
        }
        if let Some(duration) = request.duration {
            interview.duration = duration;
        }
        if let Some(interview_type) = request.interview_type {
            interview.interview_type = interview_type;
        }
        if let Some(meeting_link) = request.meeting_link {
            interview.meeting_link = Some(meeting_link);
        }
        if let Some(location) = request.location {
            interview.location = Some(location);
        }
        if let Some(notes) = request.notes {
            interview.notes = Some(notes);
        }
        interview.touch(Utc::now());

        let interview = self.stores.interviews.update(interview).await?;
        Ok(interview.into())
    }

    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateInterviewStatusRequest,
    ) -> ServiceResult<InterviewResponse> {
        let mut interview = self.load(id).await?;
        let previous = interview.status;

        interview.transition_to(request.status, request.reason.as_deref(), Utc::now())?;
        let interview = self.stores.interviews.update(interview).await?;

        LOGGER.log_business_event(
            "interview_status_changed",
            Some(&interview.id),
            metadata([
                ("from", json!(previous)),
                ("to", json!(interview.status)),
            ]),
        );

        Ok(interview.into())
    }

    pub async fn confirm(
        &self,
        id: &str,
        request: ConfirmInterviewRequest,
    ) -> ServiceResult<InterviewResponse> {
        let mut interview = self.load(id).await?;

        interview.confirm(request.confirmed, request.notes.as_deref(), Utc::now());
        let interview = self.stores.interviews.update(interview).await?;

        if request.confirmed {
            log_failure(
                "confirmation",
                &interview.id,
                self.notifier.notify_interview_confirmed(&interview),
            );
        }

        Ok(interview.into())
    }

    pub async fn mark_result(
        &self,
        id: &str,
        request: MarkInterviewResultRequest,
    ) -> ServiceResult<InterviewResponse> {
        let mut interview = self.load(id).await?;
        let result: InterviewResult = request.result.parse()?;

        interview.record_result(result, request.comments.as_deref(), Utc::now());
        let interview = self.stores.interviews.update(interview).await?;

        log_failure(
            "result",
            &interview.id,
            self.notifier.notify_candidate_result(&interview, result),
        );

        LOGGER.log_business_event(
            "interview_result_recorded",
            Some(&interview.id),
            metadata([("result", json!(result))]),
        );

        Ok(interview.into())
    }

    /// The previous interview's back-reference is written after the new round
    /// exists; if that write fails the new round is removed again.
    pub async fn create_next_round(
        &self,
        previous_id: &str,
        request: CreateNextRoundRequest,
    ) -> ServiceResult<InterviewResponse> {
        request.validate()?;

        let mut previous = self.load(previous_id).await?;
        previous.ensure_next_round_unlinked()?;

        let interviewer_ids = Self::dedupe(request.interviewer_ids);
        self.ensure_interviewers_exist(&interviewer_ids).await?;

        let now = Utc::now();
        let next = previous.spawn_next_round(
            NextRoundDetails {
                scheduled_at: request.scheduled_at,
                interview_type: request.interview_type,
                interviewer_ids,
                duration: request.duration,
                meeting_link: request.meeting_link,
                location: request.location,
                notes: request.notes,
            },
            now,
        )?;
        let next = self.stores.interviews.insert(next).await?;

        let linked = match previous.link_next_round(&next.id, now) {
            Ok(()) => self
                .stores
                .interviews
                .update(previous)
                .await
                .map_err(super::ServiceError::from),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = linked {
            if let Err(cleanup) = self.stores.interviews.delete(&next.id).await {
                tracing::error!(
                    "Failed to remove orphaned next round {} for interview {}: {}",
                    next.id,
                    previous_id,
                    cleanup
                );
            }
            return Err(e);
        }

        log_failure(
            "next round",
            &next.id,
            self.notifier.notify_next_round_scheduled(&next),
        );
        for interviewer_id in &next.interviewer_ids {
            log_failure(
                "interviewer assignment",
                &next.id,
                self.notifier.notify_interviewer_assigned(interviewer_id, &next),
            );
        }

        LOGGER.log_business_event(
            "next_round_created",
            Some(&next.id),
            metadata([
                ("previous_interview_id", json!(previous_id)),
                ("round", json!(next.round)),
            ]),
        );

        Ok(next.into())
    }

    pub async fn request_feedback(&self, id: &str) -> ServiceResult<InterviewResponse> {
        let mut interview = self.load(id).await?;

        interview.request_feedback(Utc::now());
        let interview = self.stores.interviews.update(interview).await?;

        for interviewer_id in &interview.interviewer_ids {
            log_failure(
                "feedback request",
                &interview.id,
                self.notifier.request_interviewer_feedback(interviewer_id, &interview),
            );
        }
        log_failure(
            "candidate feedback request",
            &interview.id,
            self.notifier.request_candidate_feedback(&interview),
        );

        Ok(interview.into())
    }

    /// Unconditional; cancelling twice notifies twice.
    pub async fn cancel(&self, id: &str) -> ServiceResult<InterviewResponse> {
        let mut interview = self.load(id).await?;

        interview.cancel(Utc::now());
        let interview = self.stores.interviews.update(interview).await?;

        log_failure(
            "cancellation",
            &interview.id,
            self.notifier
                .notify_interview_cancelled(&interview, CANCELLATION_REASON),
        );

        LOGGER.log_business_event("interview_cancelled", Some(&interview.id), metadata([]));

        Ok(interview.into())
    }
}
