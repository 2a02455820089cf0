pub mod auth;
pub mod candidate;
pub mod dashboard;
pub mod feedback;
pub mod interview;
pub mod interviewer;
pub mod organisation;
pub mod user;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Implements `repository::Document` for a struct with `id`, `version` and
/// `created_at` fields.
macro_rules! document {
    ($ty:ty, $collection:literal) => {
        impl crate::repository::Document for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn version(&self) -> i64 {
                self.version
            }

            fn set_version(&mut self, version: i64) {
                self.version = version;
            }

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }
        }
    };
}

pub(crate) use document;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
