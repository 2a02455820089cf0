use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::document;
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    OrgAdmin,
    Recruiter,
    Interviewer,
    Candidate,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::OrgAdmin => "ORG_ADMIN",
            UserRole::Recruiter => "RECRUITER",
            UserRole::Interviewer => "INTERVIEWER",
            UserRole::Candidate => "CANDIDATE",
        }
    }

    /// Roles allowed to run the scheduling side of the lifecycle.
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::OrgAdmin | UserRole::Recruiter)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "ADMIN" => Ok(UserRole::Admin),
            "ORG_ADMIN" => Ok(UserRole::OrgAdmin),
            "RECRUITER" => Ok(UserRole::Recruiter),
            "INTERVIEWER" => Ok(UserRole::Interviewer),
            "CANDIDATE" => Ok(UserRole::Candidate),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub roles: BTreeSet<UserRole>,
    pub organisation_id: Option<String>,
    pub is_active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

document!(User, "users");

impl User {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.as_str().to_string()).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    /// Admin only.
    pub roles: Option<BTreeSet<UserRole>>,
    pub organisation_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub roles: BTreeSet<UserRole>,
    pub organisation_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            roles: user.roles,
            organisation_id: user.organisation_id,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_their_wire_names() {
        for role in [
            UserRole::Admin,
            UserRole::OrgAdmin,
            UserRole::Recruiter,
            UserRole::Interviewer,
            UserRole::Candidate,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
            assert_eq!(
                serde_json::to_value(role).unwrap(),
                serde_json::Value::String(role.as_str().to_string())
            );
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn only_scheduling_roles_are_staff() {
        assert!(UserRole::Recruiter.is_staff());
        assert!(UserRole::OrgAdmin.is_staff());
        assert!(!UserRole::Interviewer.is_staff());
        assert!(!UserRole::Candidate.is_staff());
    }
}
