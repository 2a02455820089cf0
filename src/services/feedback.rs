use chrono::Utc;
use serde_json::json;
use validator::Validate;

use super::{not_found, ServiceError, ServiceResult};
use crate::{
    models::feedback::{
        Feedback, FeedbackQuery, FeedbackResponse, SubmitFeedbackRequest, UpdateFeedbackRequest,
    },
    repository::{Page, PageRequest, Query, Stores},
    utils::logger::{metadata, LOGGER},
};

pub struct FeedbackService {
    stores: Stores,
}

impl FeedbackService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn load(&self, id: &str) -> ServiceResult<Feedback> {
        self.stores
            .feedback
            .get(id)
            .await?
            .ok_or_else(|| not_found("Feedback", id))
    }

    /// One record per interview and interviewer. The interviewer, when given,
    /// must be on the interview panel.
    pub async fn submit(&self, request: SubmitFeedbackRequest) -> ServiceResult<FeedbackResponse> {
        request.validate()?;

        let interview = self
            .stores
            .interviews
            .get(&request.interview_id)
            .await?
            .ok_or_else(|| not_found("Interview", &request.interview_id))?;

        if let Some(interviewer_id) = &request.interviewer_id {
            if !interview.has_interviewer(interviewer_id) {
                return Err(ServiceError::InvalidArgument(format!(
                    "Interviewer {} is not assigned to interview {}",
                    interviewer_id, interview.id
                )));
            }
        }

        let duplicate = Query::new()
            .eq("interview_id", &interview.id)
            .eq("interviewer_id", &request.interviewer_id);
        if self.stores.feedback.exists(&duplicate).await? {
            return Err(ServiceError::AlreadyExists(format!(
                "Feedback already submitted for interview {}",
                interview.id
            )));
        }

        let now = Utc::now();
        let feedback = Feedback {
            id: String::new(),
            interview_id: interview.id.clone(),
            candidate_id: interview.candidate_id.clone(),
            interviewer_id: request.interviewer_id,
            rating: request.rating,
            technical_skills: request.technical_skills,
            communication_skills: request.communication_skills,
            problem_solving: request.problem_solving,
            cultural_fit: request.cultural_fit,
            comments: request.comments,
            strengths: request.strengths,
            weaknesses: request.weaknesses,
            recommendation: request.recommendation,
            submitted_at: now,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let feedback = self.stores.feedback.insert(feedback).await?;
        LOGGER.log_business_event(
            "feedback_submitted",
            Some(&feedback.id),
            metadata([
                ("interview_id", json!(feedback.interview_id)),
                ("rating", json!(feedback.rating)),
            ]),
        );
        Ok(feedback.into())
    }

    pub async fn get(&self, id: &str) -> ServiceResult<FeedbackResponse> {
        Ok(self.load(id).await?.into())
    }

    pub async fn list(&self, filter: FeedbackQuery) -> ServiceResult<Page<FeedbackResponse>> {
        let query = if let Some(interview_id) = filter.interview_id {
            Query::new().eq("interview_id", interview_id)
        } else if let Some(candidate_id) = filter.candidate_id {
            Query::new().eq("candidate_id", candidate_id)
        } else if let Some(interviewer_id) = filter.interviewer_id {
            Query::new().eq("interviewer_id", interviewer_id)
        } else {
            Query::new()
        };

        let page = self
            .stores
            .feedback
            .find(&query, PageRequest::new(filter.page, filter.size))
            .await?;
        Ok(page.map(FeedbackResponse::from))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateFeedbackRequest,
    ) -> ServiceResult<FeedbackResponse> {
        request.validate()?;
        let mut feedback = self.load(id).await?;

        if let Some(rating) = request.rating {
            feedback.rating = rating;
        }
        if request.technical_skills.is_some() {
            feedback.technical_skills = request.technical_skills;
        }
        if request.communication_skills.is_some() {
            feedback.communication_skills = request.communication_skills;
        }
        if request.problem_solving.is_some() {
            feedback.problem_solving = request.problem_solving;
        }
        if request.cultural_fit.is_some() {
            feedback.cultural_fit = request.cultural_fit;
        }
        if request.comments.is_some() {
            feedback.comments = request.comments;
        }
        if request.strengths.is_some() {
            feedback.strengths = request.strengths;
        }
        if request.weaknesses.is_some() {
            feedback.weaknesses = request.weaknesses;
        }
        if request.recommendation.is_some() {
            feedback.recommendation = request.recommendation;
        }
        feedback.updated_at = Utc::now();

        let feedback = self.stores.feedback.update(feedback).await?;
        Ok(feedback.into())
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.stores.feedback.delete(id).await? {
            return Err(not_found("Feedback", id));
        }
        Ok(())
    }
}
