//! Document-store abstraction.
//!
//! Every aggregate is stored as a JSON document under a collection name. The
//! `DocumentStore` trait hides the backend so the services can run against the
//! in-memory store in tests and against Postgres JSONB in production.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::models::{
    auth::RefreshToken, candidate::Candidate, feedback::Feedback, interview::Interview,
    interviewer::Interviewer, organisation::Organisation, user::User,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A persisted aggregate.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn version(&self) -> i64;
    fn set_version(&mut self, version: i64);
    fn created_at(&self) -> DateTime<Utc>;
}

/// A single predicate over a top-level document field.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Field equals the JSON value.
    Eq(&'static str, Value),
    /// Array field contains the JSON value.
    Contains(&'static str, Value),
    /// Case-insensitive substring match on any of the fields.
    Matches(Vec<&'static str>, String),
    /// Timestamp field within `[from, to]`.
    Between(&'static str, DateTime<Utc>, DateTime<Utc>),
    After(&'static str, DateTime<Utc>),
    Before(&'static str, DateTime<Utc>),
}

/// Conjunction of conditions. An empty query matches every document.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub conditions: Vec<Condition>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Serialize) -> Self {
        self.conditions
            .push(Condition::Eq(field, serde_json::to_value(value).unwrap_or(Value::Null)));
        self
    }

    pub fn contains(mut self, field: &'static str, value: impl Serialize) -> Self {
        self.conditions.push(Condition::Contains(
            field,
            serde_json::to_value(value).unwrap_or(Value::Null),
        ));
        self
    }

    pub fn matches(mut self, fields: Vec<&'static str>, text: impl Into<String>) -> Self {
        self.conditions.push(Condition::Matches(fields, text.into()));
        self
    }

    pub fn between(mut self, field: &'static str, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Between(field, from, to));
        self
    }

    pub fn after(mut self, field: &'static str, instant: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::After(field, instant));
        self
    }

    pub fn before(mut self, field: &'static str, instant: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Before(field, instant));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Zero-based page; size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size);
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("document not found")]
    NotFound,
    #[error("document already exists")]
    Duplicate,
    #[error("document was modified concurrently (expected version {expected})")]
    VersionConflict { expected: i64 },
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Duplicate
            }
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Assigns an id when the document has none and starts it at version 1.
    async fn insert(&self, document: T) -> Result<T, RepositoryError>;

    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError>;

    /// Compare-and-swap on `document.version()`; the stored copy gets version + 1.
    async fn update(&self, document: T) -> Result<T, RepositoryError>;

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;

    /// Newest first by `created_at`.
    async fn find(&self, query: &Query, page: PageRequest) -> Result<Page<T>, RepositoryError>;

    async fn find_all(&self, query: &Query) -> Result<Vec<T>, RepositoryError>;

    async fn count(&self, query: &Query) -> Result<u64, RepositoryError>;

    async fn exists(&self, query: &Query) -> Result<bool, RepositoryError> {
        Ok(self.count(query).await? > 0)
    }
}

/// One store per collection, shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub interviews: Arc<dyn DocumentStore<Interview>>,
    pub candidates: Arc<dyn DocumentStore<Candidate>>,
    pub interviewers: Arc<dyn DocumentStore<Interviewer>>,
    pub organisations: Arc<dyn DocumentStore<Organisation>>,
    pub feedback: Arc<dyn DocumentStore<Feedback>>,
    pub users: Arc<dyn DocumentStore<User>>,
    pub refresh_tokens: Arc<dyn DocumentStore<RefreshToken>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            interviews: Arc::new(MemoryStore::new()),
            candidates: Arc::new(MemoryStore::new()),
            interviewers: Arc::new(MemoryStore::new()),
            organisations: Arc::new(MemoryStore::new()),
            feedback: Arc::new(MemoryStore::new()),
            users: Arc::new(MemoryStore::new()),
            refresh_tokens: Arc::new(MemoryStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            interviews: Arc::new(PgDocumentStore::new(pool.clone())),
            candidates: Arc::new(PgDocumentStore::new(pool.clone())),
            interviewers: Arc::new(PgDocumentStore::new(pool.clone())),
            organisations: Arc::new(PgDocumentStore::new(pool.clone())),
            feedback: Arc::new(PgDocumentStore::new(pool.clone())),
            users: Arc::new(PgDocumentStore::new(pool.clone())),
            refresh_tokens: Arc::new(PgDocumentStore::new(pool)),
        }
    }
}
