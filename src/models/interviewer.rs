use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document;
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: String,
    pub user_id: Option<String>,
    pub organisation_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub expertise: Vec<String>,
    pub years_of_experience: Option<u32>,
    pub is_available: bool,
    pub total_interviews: u64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

document!(Interviewer, "interviewers");

impl Interviewer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInterviewerRequest {
    pub user_id: Option<String>,
    pub organisation_id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[validate(range(max = 60))]
    pub years_of_experience: Option<u32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInterviewerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub expertise: Option<Vec<String>>,
    #[validate(range(max = 60))]
    pub years_of_experience: Option<u32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewerQuery {
    pub expertise: Option<String>,
    pub available: Option<bool>,
    pub organisation_id: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewerResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub organisation_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub expertise: Vec<String>,
    pub years_of_experience: Option<u32>,
    pub is_available: bool,
    pub total_interviews: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interviewer> for InterviewerResponse {
    fn from(interviewer: Interviewer) -> Self {
        Self {
            full_name: interviewer.full_name(),
            id: interviewer.id,
            user_id: interviewer.user_id,
            organisation_id: interviewer.organisation_id,
            first_name: interviewer.first_name,
            last_name: interviewer.last_name,
            email: interviewer.email,
            phone: interviewer.phone,
            department: interviewer.department,
            designation: interviewer.designation,
            expertise: interviewer.expertise,
            years_of_experience: interviewer.years_of_experience,
            is_available: interviewer.is_available,
            total_interviews: interviewer.total_interviews,
            created_at: interviewer.created_at,
            updated_at: interviewer.updated_at,
        }
    }
}
