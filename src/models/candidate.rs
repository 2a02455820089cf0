use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document;
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    Applied,
    Screening,
    Interviewing,
    Offered,
    Hired,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub experience_years: Option<u32>,
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub status: CandidateStatus,
    pub organisation_id: Option<String>,
    pub user_id: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

document!(Candidate, "candidates");

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCandidateRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
    #[validate(range(max = 60))]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    pub organisation_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCandidateRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
    #[validate(range(max = 60))]
    pub experience_years: Option<u32>,
    pub skills: Option<Vec<String>>,
    #[validate(url)]
    pub resume_url: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    pub status: Option<CandidateStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateQuery {
    pub status: Option<CandidateStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub experience_years: Option<u32>,
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub status: CandidateStatus,
    pub organisation_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateResponse {
    fn from(candidate: Candidate) -> Self {
        Self {
            full_name: candidate.full_name(),
            id: candidate.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            phone: candidate.phone,
            position: candidate.position,
            experience_years: candidate.experience_years,
            skills: candidate.skills,
            resume_url: candidate.resume_url,
            linkedin_url: candidate.linkedin_url,
            github_url: candidate.github_url,
            status: candidate.status,
            organisation_id: candidate.organisation_id,
            created_at: candidate.created_at,
            updated_at: candidate.updated_at,
        }
    }
}
