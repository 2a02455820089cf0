use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongHire,
    Hire,
    NoHire,
    StrongNoHire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub interview_id: String,
    pub candidate_id: String,
    pub interviewer_id: Option<String>,
    pub rating: u8,
    pub technical_skills: Option<u8>,
    pub communication_skills: Option<u8>,
    pub problem_solving: Option<u8>,
    pub cultural_fit: Option<u8>,
    pub comments: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub submitted_at: DateTime<Utc>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

document!(Feedback, "feedback");

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    pub interview_id: String,
    pub interviewer_id: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: u8,
    #[validate(range(min = 1, max = 10))]
    pub technical_skills: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub communication_skills: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub problem_solving: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub cultural_fit: Option<u8>,
    #[validate(length(max = 5000))]
    pub comments: Option<String>,
    #[validate(length(max = 2000))]
    pub strengths: Option<String>,
    #[validate(length(max = 2000))]
    pub weaknesses: Option<String>,
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFeedbackRequest {
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub technical_skills: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub communication_skills: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub problem_solving: Option<u8>,
    #[validate(range(min = 1, max = 10))]
    pub cultural_fit: Option<u8>,
    #[validate(length(max = 5000))]
    pub comments: Option<String>,
    #[validate(length(max = 2000))]
    pub strengths: Option<String>,
    #[validate(length(max = 2000))]
    pub weaknesses: Option<String>,
    pub recommendation: Option<Recommendation>,
}

/// At most one filter applies, in the order interview, candidate, interviewer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackQuery {
    pub interview_id: Option<String>,
    pub candidate_id: Option<String>,
    pub interviewer_id: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub interview_id: String,
    pub candidate_id: String,
    pub interviewer_id: Option<String>,
    pub rating: u8,
    pub technical_skills: Option<u8>,
    pub communication_skills: Option<u8>,
    pub problem_solving: Option<u8>,
    pub cultural_fit: Option<u8>,
    pub comments: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id,
            interview_id: feedback.interview_id,
            candidate_id: feedback.candidate_id,
            interviewer_id: feedback.interviewer_id,
            rating: feedback.rating,
            technical_skills: feedback.technical_skills,
            communication_skills: feedback.communication_skills,
            problem_solving: feedback.problem_solving,
            cultural_fit: feedback.cultural_fit,
            comments: feedback.comments,
            strengths: feedback.strengths,
            weaknesses: feedback.weaknesses,
            recommendation: feedback.recommendation,
            submitted_at: feedback.submitted_at,
            updated_at: feedback.updated_at,
        }
    }
}
