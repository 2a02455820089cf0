use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document;
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(max = 200))]
    pub street: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organisation {
    pub id: String,
    pub name: String,
    pub registration_number: Option<String>,
    pub address: Option<Address>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub verification_status: VerificationStatus,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub admin_user_id: Option<String>,
    pub is_active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

document!(Organisation, "organisations");

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganisationRequest {
    #[validate(length(min = 2, max = 200, message = "Organisation name must be 2-200 characters"))]
    pub name: String,
    #[validate(length(max = 50))]
    pub registration_number: Option<String>,
    #[validate]
    pub address: Option<Address>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    #[validate(custom = "validate_phone")]
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub admin_user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrganisationRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,
    #[validate]
    pub address: Option<Address>,
    #[validate(custom = "validate_phone")]
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectOrganisationRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganisationQuery {
    pub status: Option<VerificationStatus>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganisationResponse {
    pub id: String,
    pub name: String,
    pub registration_number: Option<String>,
    pub address: Option<Address>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub verification_status: VerificationStatus,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub admin_user_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organisation> for OrganisationResponse {
    fn from(org: Organisation) -> Self {
        Self {
            id: org.id,
            name: org.name,
            registration_number: org.registration_number,
            address: org.address,
            contact_email: org.contact_email,
            contact_phone: org.contact_phone,
            website: org.website,
            description: org.description,
            verification_status: org.verification_status,
            rejection_reason: org.rejection_reason,
            verified_at: org.verified_at,
            admin_user_id: org.admin_user_id,
            is_active: org.is_active,
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}
