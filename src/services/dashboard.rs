use chrono::{DateTime, Utc};

use super::{not_found, ServiceResult};
use crate::{
    models::{
        dashboard::{AdminDashboard, CandidateDashboard, InterviewerDashboard, OrganisationDashboard},
        interview::{Interview, InterviewResult, InterviewResponse, InterviewStatus},
        organisation::VerificationStatus,
    },
    repository::{Query, Stores},
};

const NEXT_INTERVIEWS: usize = 5;

pub struct DashboardService {
    stores: Stores,
}

fn is_upcoming(interview: &Interview, now: DateTime<Utc>) -> bool {
    interview.status.is_upcoming() && interview.scheduled_at > now
}

fn count(interviews: &[Interview], predicate: impl Fn(&Interview) -> bool) -> u64 {
    interviews.iter().filter(|i| predicate(i)).count() as u64
}

/// Soonest upcoming interviews first.
fn next_interviews(interviews: &[Interview], now: DateTime<Utc>) -> Vec<InterviewResponse> {
    let mut upcoming: Vec<&Interview> = interviews.iter().filter(|i| is_upcoming(i, now)).collect();
    upcoming.sort_by_key(|i| i.scheduled_at);
    upcoming
        .into_iter()
        .take(NEXT_INTERVIEWS)
        .cloned()
        .map(InterviewResponse::from)
        .collect()
}

impl DashboardService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn admin(&self) -> ServiceResult<AdminDashboard> {
        let now = Utc::now();
        let interviews = &self.stores.interviews;
        let upcoming = interviews
            .count(
                &Query::new()
                    .eq("status", InterviewStatus::Scheduled)
                    .after("scheduled_at", now),
            )
            .await?
            + interviews
                .count(
                    &Query::new()
                        .eq("status", InterviewStatus::Rescheduled)
                        .after("scheduled_at", now),
                )
                .await?;

        Ok(AdminDashboard {
            total_users: self.stores.users.count(&Query::new()).await?,
            total_organisations: self.stores.organisations.count(&Query::new()).await?,
            pending_verifications: self
                .stores
                .organisations
                .count(&Query::new().eq("verification_status", VerificationStatus::Pending))
                .await?,
            total_candidates: self.stores.candidates.count(&Query::new()).await?,
            total_interviewers: self.stores.interviewers.count(&Query::new()).await?,
            total_interviews: interviews.count(&Query::new()).await?,
            upcoming_interviews: upcoming,
            completed_interviews: interviews
                .count(&Query::new().eq("status", InterviewStatus::Completed))
                .await?,
            cancelled_interviews: interviews
                .count(&Query::new().eq("status", InterviewStatus::Cancelled))
                .await?,
        })
    }

    pub async fn organisation(&self, organisation_id: &str) -> ServiceResult<OrganisationDashboard> {
        if self.stores.organisations.get(organisation_id).await?.is_none() {
            return Err(not_found("Organisation", organisation_id));
        }
        let now = Utc::now();
        let interviews = self
            .stores
            .interviews
            .find_all(&Query::new().eq("organisation_id", organisation_id))
            .await?;

        Ok(OrganisationDashboard {
            organisation_id: organisation_id.to_string(),
            total_interviews: interviews.len() as u64,
            upcoming_interviews: count(&interviews, |i| is_upcoming(i, now)),
            completed_interviews: count(&interviews, |i| i.status == InterviewStatus::Completed),
            pending_confirmations: count(&interviews, |i| {
                is_upcoming(i, now) && !i.candidate_confirmed
            }),
            selected_candidates: count(&interviews, |i| {
                i.result == Some(InterviewResult::Selected)
            }),
            next_interviews: next_interviews(&interviews, now),
        })
    }

    pub async fn interviewer(&self, interviewer_id: &str) -> ServiceResult<InterviewerDashboard> {
        if self.stores.interviewers.get(interviewer_id).await?.is_none() {
            return Err(not_found("Interviewer", interviewer_id));
        }
        let now = Utc::now();
        let interviews = self
            .stores
            .interviews
            .find_all(&Query::new().contains("interviewer_ids", interviewer_id))
            .await?;

        let mut pending_feedback = 0;
        for interview in interviews
            .iter()
            .filter(|i| i.status == InterviewStatus::Completed && i.feedback_requested)
        {
            let submitted = self
                .stores
                .feedback
                .exists(
                    &Query::new()
                        .eq("interview_id", &interview.id)
                        .eq("interviewer_id", interviewer_id),
                )
                .await?;
            if !submitted {
                pending_feedback += 1;
            }
        }

        Ok(InterviewerDashboard {
            interviewer_id: interviewer_id.to_string(),
            total_interviews: interviews.len() as u64,
            upcoming_interviews: count(&interviews, |i| is_upcoming(i, now)),
            completed_interviews: count(&interviews, |i| i.status == InterviewStatus::Completed),
            pending_feedback,
            next_interviews: next_interviews(&interviews, now),
        })
    }

    pub async fn candidate(&self, candidate_id: &str) -> ServiceResult<CandidateDashboard> {
        if self.stores.candidates.get(candidate_id).await?.is_none() {
            return Err(not_found("Candidate", candidate_id));
        }
        let now = Utc::now();
        let interviews = self
            .stores
            .interviews
            .find_all(&Query::new().eq("candidate_id", candidate_id))
            .await?;

        Ok(CandidateDashboard {
            candidate_id: candidate_id.to_string(),
            total_interviews: interviews.len() as u64,
            upcoming_interviews: count(&interviews, |i| is_upcoming(i, now)),
            completed_interviews: count(&interviews, |i| i.status == InterviewStatus::Completed),
            awaiting_confirmation: count(&interviews, |i| {
                is_upcoming(i, now) && !i.candidate_confirmed
            }),
            next_interviews: next_interviews(&interviews, now),
        })
    }
}
