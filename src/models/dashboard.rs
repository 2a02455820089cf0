use serde::Serialize;

use super::interview::InterviewResponse;

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub total_users: u64,
    pub total_organisations: u64,
    pub pending_verifications: u64,
    pub total_candidates: u64,
    pub total_interviewers: u64,
    pub total_interviews: u64,
    pub upcoming_interviews: u64,
    pub completed_interviews: u64,
    pub cancelled_interviews: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganisationDashboard {
    pub organisation_id: String,
    pub total_interviews: u64,
    pub upcoming_interviews: u64,
    pub completed_interviews: u64,
    pub pending_confirmations: u64,
    pub selected_candidates: u64,
    pub next_interviews: Vec<InterviewResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewerDashboard {
    pub interviewer_id: String,
    pub total_interviews: u64,
    pub upcoming_interviews: u64,
    pub completed_interviews: u64,
    pub pending_feedback: u64,
    pub next_interviews: Vec<InterviewResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDashboard {
    pub candidate_id: String,
    pub total_interviews: u64,
    pub upcoming_interviews: u64,
    pub completed_interviews: u64,
    pub awaiting_confirmation: u64,
    pub next_interviews: Vec<InterviewResponse>,
}
