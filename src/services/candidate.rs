use chrono::Utc;
use validator::Validate;

use super::{not_found, ServiceError, ServiceResult};
use crate::{
    models::candidate::{
        Candidate, CandidateQuery, CandidateResponse, CandidateStatus, CreateCandidateRequest,
        UpdateCandidateRequest,
    },
    repository::{Page, PageRequest, Query, Stores},
};

const SEARCH_FIELDS: [&str; 4] = ["first_name", "last_name", "email", "position"];

pub struct CandidateService {
    stores: Stores,
}

impl CandidateService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn load(&self, id: &str) -> ServiceResult<Candidate> {
        self.stores
            .candidates
            .get(id)
            .await?
            .ok_or_else(|| not_found("Candidate", id))
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        if self
            .stores
            .candidates
            .exists(&Query::new().eq("email", email))
            .await?
        {
            return Err(ServiceError::AlreadyExists(format!(
                "Candidate with email {} already exists",
                email
            )));
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateCandidateRequest) -> ServiceResult<CandidateResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();
        self.ensure_email_free(&email).await?;

        let now = Utc::now();
        let candidate = Candidate {
            id: String::new(),
            first_name: request.first_name,
            last_name: request.last_name,
            email,
            phone: request.phone,
            position: request.position,
            experience_years: request.experience_years,
            skills: request.skills,
            resume_url: request.resume_url,
            linkedin_url: request.linkedin_url,
            github_url: request.github_url,
            status: CandidateStatus::Applied,
            organisation_id: request.organisation_id,
            user_id: request.user_id,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let candidate = self.stores.candidates.insert(candidate).await?;
        tracing::info!("Created candidate {}", candidate.id);
        Ok(candidate.into())
    }

    pub async fn get(&self, id: &str) -> ServiceResult<CandidateResponse> {
        Ok(self.load(id).await?.into())
    }

    pub async fn list(&self, filter: CandidateQuery) -> ServiceResult<Page<CandidateResponse>> {
        let mut query = Query::new();
        if let Some(status) = filter.status {
            query = query.eq("status", status);
        }
        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            query = query.matches(SEARCH_FIELDS.to_vec(), search.trim());
        }

        let page = self
            .stores
            .candidates
            .find(&query, PageRequest::new(filter.page, filter.size))
            .await?;
        Ok(page.map(CandidateResponse::from))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateCandidateRequest,
    ) -> ServiceResult<CandidateResponse> {
        request.validate()?;
        let mut candidate = self.load(id).await?;

        if let Some(email) = request.email {
            let email = email.trim().to_lowercase();
            if email != candidate.email {
                self.ensure_email_free(&email).await?;
                candidate.email = email;
            }
        }
        if let Some(first_name) = request.first_name {
            candidate.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            candidate.last_name = last_name;
        }
        if request.phone.is_some() {
            candidate.phone = request.phone;
        }
        if request.position.is_some() {
            candidate.position = request.position;
        }
        if request.experience_years.is_some() {
            candidate.experience_years = request.experience_years;
        }
        if let Some(skills) = request.skills {
            candidate.skills = skills;
        }
        if request.resume_url.is_some() {
            candidate.resume_url = request.resume_url;
        }
        if request.linkedin_url.is_some() {
            candidate.linkedin_url = request.linkedin_url;
        }
        if request.github_url.is_some() {
            candidate.github_url = request.github_url;
        }
        if let Some(status) = request.status {
            candidate.status = status;
        }
        candidate.updated_at = Utc::now();

        let candidate = self.stores.candidates.update(candidate).await?;
        Ok(candidate.into())
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.stores.candidates.delete(id).await? {
            return Err(not_found("Candidate", id));
        }
        tracing::info!("Deleted candidate {}", id);
        Ok(())
    }
}
