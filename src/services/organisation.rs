use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::notification::NotificationGateway;
use super::{not_found, ServiceError, ServiceResult};
use crate::{
    models::organisation::{
        CreateOrganisationRequest, Organisation, OrganisationQuery, OrganisationResponse,
        UpdateOrganisationRequest, VerificationStatus,
    },
    repository::{Page, PageRequest, Query, Stores},
    utils::logger::{metadata, LOGGER},
};

pub struct OrganisationService {
    stores: Stores,
    notifier: Arc<dyn NotificationGateway>,
}

impl OrganisationService {
    pub fn new(stores: Stores, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self { stores, notifier }
    }

    async fn load(&self, id: &str) -> ServiceResult<Organisation> {
        self.stores
            .organisations
            .get(id)
            .await?
            .ok_or_else(|| not_found("Organisation", id))
    }

    async fn ensure_unique(&self, field: &'static str, value: &str, label: &str) -> ServiceResult<()> {
        if self
            .stores
            .organisations
            .exists(&Query::new().eq(field, value))
            .await?
        {
            return Err(ServiceError::AlreadyExists(format!(
                "Organisation with {} {} already exists",
                label, value
            )));
        }
        Ok(())
    }

    /// New organisations start PENDING and inactive until an admin verifies them.
    pub async fn create(
        &self,
        request: CreateOrganisationRequest,
    ) -> ServiceResult<OrganisationResponse> {
        request.validate()?;
        let contact_email = request.contact_email.trim().to_lowercase();
        self.ensure_unique("name", &request.name, "name").await?;
        self.ensure_unique("contact_email", &contact_email, "contact email")
            .await?;

        let now = Utc::now();
        let organisation = Organisation {
            id: String::new(),
            name: request.name,
            registration_number: request.registration_number,
            address: request.address,
            contact_email,
            contact_phone: request.contact_phone,
            website: request.website,
            description: request.description,
            verification_status: VerificationStatus::Pending,
            rejection_reason: None,
            verified_at: None,
            admin_user_id: request.admin_user_id,
            is_active: false,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let organisation = self.stores.organisations.insert(organisation).await?;
        LOGGER.log_business_event(
            "organisation_registered",
            Some(&organisation.id),
            metadata([("name", json!(organisation.name))]),
        );
        Ok(organisation.into())
    }

    pub async fn get(&self, id: &str) -> ServiceResult<OrganisationResponse> {
        Ok(self.load(id).await?.into())
    }

    pub async fn list(
        &self,
        filter: OrganisationQuery,
    ) -> ServiceResult<Page<OrganisationResponse>> {
        let mut query = Query::new();
        if let Some(status) = filter.status {
            query = query.eq("verification_status", status);
        }
        if let Some(active) = filter.active {
            query = query.eq("is_active", active);
        }

        let page = self
            .stores
            .organisations
            .find(&query, PageRequest::new(filter.page, filter.size))
            .await?;
        Ok(page.map(OrganisationResponse::from))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateOrganisationRequest,
    ) -> ServiceResult<OrganisationResponse> {
        request.validate()?;
        let mut organisation = self.load(id).await?;

        if let Some(name) = request.name {
            if name != organisation.name {
                self.ensure_unique("name", &name, "name").await?;
                organisation.name = name;
            }
        }
        if request.address.is_some() {
            organisation.address = request.address;
        }
        if request.contact_phone.is_some() {
            organisation.contact_phone = request.contact_phone;
        }
        if request.website.is_some() {
            organisation.website = request.website;
        }
        if request.description.is_some() {
            organisation.description = request.description;
        }
        organisation.updated_at = Utc::now();

        let organisation = self.stores.organisations.update(organisation).await?;
        Ok(organisation.into())
    }

    pub async fn verify(&self, id: &str) -> ServiceResult<OrganisationResponse> {
        let mut organisation = self.load(id).await?;
        let now = Utc::now();
        organisation.verification_status = VerificationStatus::Verified;
        organisation.is_active = true;
        organisation.rejection_reason = None;
        organisation.verified_at = Some(now);
        organisation.updated_at = now;

        let organisation = self.stores.organisations.update(organisation).await?;
        self.announce(&organisation, None);
        Ok(organisation.into())
    }

    pub async fn reject(&self, id: &str, reason: Option<String>) -> ServiceResult<OrganisationResponse> {
        let mut organisation = self.load(id).await?;
        organisation.verification_status = VerificationStatus::Rejected;
        organisation.is_active = false;
        organisation.rejection_reason = reason;
        organisation.verified_at = None;
        organisation.updated_at = Utc::now();

        let organisation = self.stores.organisations.update(organisation).await?;
        self.announce(&organisation, organisation.rejection_reason.as_deref());
        Ok(organisation.into())
    }

    fn announce(&self, organisation: &Organisation, reason: Option<&str>) {
        if let Err(e) = self.notifier.notify_verification_status(organisation, reason) {
            tracing::warn!(
                "Failed to send verification notification for organisation {}: {}",
                organisation.id,
                e
            );
        }
        LOGGER.log_business_event(
            "organisation_verification_changed",
            Some(&organisation.id),
            metadata([("status", json!(organisation.verification_status))]),
        );
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.stores.organisations.delete(id).await? {
            return Err(not_found("Organisation", id));
        }
        tracing::info!("Deleted organisation {}", id);
        Ok(())
    }
}
