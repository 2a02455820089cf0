//! In-memory implementation of `DocumentStore`.
//!
//! Documents live in a `HashMap` behind a `RwLock` and are lost on restart.
//! Queries are evaluated against the serialized JSON form so they behave like
//! the Postgres JSONB backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Condition, Document, DocumentStore, Page, PageRequest, Query, RepositoryError};

pub struct MemoryStore<T> {
    documents: RwLock<HashMap<String, T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> MemoryStore<T> {
    async fn matching(&self, query: &Query) -> Result<Vec<T>, RepositoryError> {
        let documents = self.documents.read().await;
        let mut matched = Vec::new();
        for document in documents.values() {
            let json = serde_json::to_value(document)?;
            if query.conditions.iter().all(|condition| evaluate(condition, &json)) {
                matched.push(document.clone());
            }
        }
        matched.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(matched)
    }
}

fn timestamp(json: &Value, field: &str) -> Option<DateTime<Utc>> {
    json.get(field)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn evaluate(condition: &Condition, json: &Value) -> bool {
    match condition {
        Condition::Eq(field, expected) => json.get(*field).unwrap_or(&Value::Null) == expected,
        Condition::Contains(field, expected) => json
            .get(*field)
            .and_then(Value::as_array)
            .map(|items| items.contains(expected))
            .unwrap_or(false),
        Condition::Matches(fields, text) => {
            let needle = text.to_lowercase();
            fields.iter().any(|field| {
                json.get(*field)
                    .and_then(Value::as_str)
                    .map(|value| value.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
        Condition::Between(field, from, to) => timestamp(json, field)
            .map(|at| at >= *from && at <= *to)
            .unwrap_or(false),
        Condition::After(field, instant) => timestamp(json, field)
            .map(|at| at > *instant)
            .unwrap_or(false),
        Condition::Before(field, instant) => timestamp(json, field)
            .map(|at| at < *instant)
            .unwrap_or(false),
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MemoryStore<T> {
    async fn insert(&self, mut document: T) -> Result<T, RepositoryError> {
        if document.id().is_empty() {
            document.set_id(Uuid::new_v4().to_string());
        }
        document.set_version(1);

        let mut documents = self.documents.write().await;
        if documents.contains_key(document.id()) {
            return Err(RepositoryError::Duplicate);
        }
        documents.insert(document.id().to_string(), document.clone());
        Ok(document)
    }

    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn update(&self, mut document: T) -> Result<T, RepositoryError> {
        let mut documents = self.documents.write().await;
        let stored = documents
            .get(document.id())
            .ok_or(RepositoryError::NotFound)?;

        let expected = document.version();
        if stored.version() != expected {
            return Err(RepositoryError::VersionConflict { expected });
        }

        document.set_version(expected + 1);
        documents.insert(document.id().to_string(), document.clone());
        Ok(document)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.documents.write().await.remove(id).is_some())
    }

    async fn find(&self, query: &Query, page: PageRequest) -> Result<Page<T>, RepositoryError> {
        let matched = self.matching(query).await?;
        let total = matched.len() as u64;
        let content = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok(Page::new(content, page, total))
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<T>, RepositoryError> {
        self.matching(query).await
    }

    async fn count(&self, query: &Query) -> Result<u64, RepositoryError> {
        Ok(self.matching(query).await?.len() as u64)
    }
}
