use chrono::Utc;
use validator::Validate;

use super::{not_found, ServiceError, ServiceResult};
use crate::{
    models::interviewer::{
        CreateInterviewerRequest, Interviewer, InterviewerQuery, InterviewerResponse,
        UpdateInterviewerRequest,
    },
    repository::{Page, PageRequest, Query, Stores},
};

pub struct InterviewerService {
    stores: Stores,
}

impl InterviewerService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn load(&self, id: &str) -> ServiceResult<Interviewer> {
        self.stores
            .interviewers
            .get(id)
            .await?
            .ok_or_else(|| not_found("Interviewer", id))
    }

    pub async fn create(
        &self,
        request: CreateInterviewerRequest,
    ) -> ServiceResult<InterviewerResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        if self
            .stores
            .interviewers
            .exists(&Query::new().eq("email", &email))
            .await?
        {
            return Err(ServiceError::AlreadyExists(format!(
                "Interviewer with email {} already exists",
                email
            )));
        }
        if let Some(user_id) = &request.user_id {
            if self.stores.users.get(user_id).await?.is_none() {
                return Err(not_found("User", user_id));
            }
        }

        let now = Utc::now();
        let interviewer = Interviewer {
            id: String::new(),
            user_id: request.user_id,
            organisation_id: request.organisation_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email,
            phone: request.phone,
            department: request.department,
            designation: request.designation,
            expertise: request.expertise,
            years_of_experience: request.years_of_experience,
            is_available: request.is_available.unwrap_or(true),
            total_interviews: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let interviewer = self.stores.interviewers.insert(interviewer).await?;
        tracing::info!("Created interviewer {}", interviewer.id);
        Ok(interviewer.into())
    }

    pub async fn get(&self, id: &str) -> ServiceResult<InterviewerResponse> {
        Ok(self.load(id).await?.into())
    }

    pub async fn list(&self, filter: InterviewerQuery) -> ServiceResult<Page<InterviewerResponse>> {
        let mut query = Query::new();
        if let Some(expertise) = filter.expertise {
            query = query.contains("expertise", expertise);
        }
        if let Some(available) = filter.available {
            query = query.eq("is_available", available);
        }
        if let Some(organisation_id) = filter.organisation_id {
            query = query.eq("organisation_id", organisation_id);
        }

        let page = self
            .stores
            .interviewers
            .find(&query, PageRequest::new(filter.page, filter.size))
            .await?;
        Ok(page.map(InterviewerResponse::from))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateInterviewerRequest,
    ) -> ServiceResult<InterviewerResponse> {
        request.validate()?;
        let mut interviewer = self.load(id).await?;

        if let Some(first_name) = request.first_name {
            interviewer.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            interviewer.last_name = last_name;
        }
        if request.phone.is_some() {
            interviewer.phone = request.phone;
        }
        if request.department.is_some() {
            interviewer.department = request.department;
        }
        if request.designation.is_some() {
            interviewer.designation = request.designation;
        }
        if let Some(expertise) = request.expertise {
            interviewer.expertise = expertise;
        }
        if request.years_of_experience.is_some() {
            interviewer.years_of_experience = request.years_of_experience;
        }
        if let Some(is_available) = request.is_available {
            interviewer.is_available = is_available;
        }
        interviewer.updated_at = Utc::now();

        let interviewer = self.stores.interviewers.update(interviewer).await?;
        Ok(interviewer.into())
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.stores.interviewers.delete(id).await? {
            return Err(not_found("Interviewer", id));
        }
        tracing::info!("Deleted interviewer {}", id);
        Ok(())
    }
}
