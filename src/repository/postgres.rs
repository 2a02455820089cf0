//! Postgres JSONB implementation of `DocumentStore`.
//!
//! All collections share the `documents` table created by the migrations in
//! `migrations/`. Field names in conditions come from code, never from input.

use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Condition, Document, DocumentStore, Page, PageRequest, Query, RepositoryError};
use crate::utils::logger::LOGGER;

pub struct PgDocumentStore<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgDocumentStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filter<T: Document>(builder: &mut QueryBuilder<'_, Postgres>, query: &Query) {
    builder.push(" WHERE collection = ");
    builder.push_bind(T::COLLECTION);

    for condition in &query.conditions {
        builder.push(" AND ");
        match condition {
            Condition::Eq(field, value) => {
                builder.push(format!("doc -> '{}' = ", field));
                builder.push_bind(value.clone());
            }
            Condition::Contains(field, value) => {
                builder.push(format!("doc -> '{}' @> ", field));
                builder.push_bind(Value::Array(vec![value.clone()]));
            }
            Condition::Matches(fields, text) => {
                let pattern = escape_like(text);
                builder.push("(");
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(format!("doc ->> '{}' ILIKE ", field));
                    builder.push_bind(pattern.clone());
                }
                if fields.is_empty() {
                    builder.push("FALSE");
                }
                builder.push(")");
            }
            Condition::Between(field, from, to) => {
                builder.push(format!("(doc ->> '{}')::timestamptz BETWEEN ", field));
                builder.push_bind(*from);
                builder.push(" AND ");
                builder.push_bind(*to);
            }
            Condition::After(field, instant) => {
                builder.push(format!("(doc ->> '{}')::timestamptz > ", field));
                builder.push_bind(*instant);
            }
            Condition::Before(field, instant) => {
                builder.push(format!("(doc ->> '{}')::timestamptz < ", field));
                builder.push_bind(*instant);
            }
        }
    }
}

fn decode<T: Document>(rows: Vec<Value>) -> Result<Vec<T>, RepositoryError> {
    rows.into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(RepositoryError::from))
        .collect()
}

impl<T: Document> PgDocumentStore<T> {
    async fn select(
        &self,
        query: &Query,
        page: Option<PageRequest>,
    ) -> Result<Vec<T>, RepositoryError> {
        let start = Instant::now();
        let mut builder = QueryBuilder::new("SELECT doc FROM documents");
        push_filter::<T>(&mut builder, query);
        builder.push(" ORDER BY (doc ->> 'created_at')::timestamptz DESC, id");
        if let Some(page) = page {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(page.size));
            builder.push(" OFFSET ");
            builder.push_bind(page.offset() as i64);
        }

        let rows: Vec<Value> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;

        LOGGER.log_database_query(builder.sql(), start.elapsed().as_millis(), Some(rows.len()));
        decode(rows)
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for PgDocumentStore<T> {
    async fn insert(&self, mut document: T) -> Result<T, RepositoryError> {
        if document.id().is_empty() {
            document.set_id(Uuid::new_v4().to_string());
        }
        document.set_version(1);

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, version, doc)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(T::COLLECTION)
        .bind(document.id())
        .bind(document.version())
        .bind(serde_json::to_value(&document)?)
        .execute(&self.pool)
        .await?;

        Ok(document)
    }

    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        let row: Option<Value> =
            sqlx::query_scalar("SELECT doc FROM documents WHERE collection = $1 AND id = $2")
                .bind(T::COLLECTION)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|doc| serde_json::from_value(doc).map_err(RepositoryError::from))
            .transpose()
    }

    async fn update(&self, mut document: T) -> Result<T, RepositoryError> {
        let expected = document.version();
        document.set_version(expected + 1);

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET doc = $1, version = $2, updated_at = NOW()
            WHERE collection = $3 AND id = $4 AND version = $5
            "#,
        )
        .bind(serde_json::to_value(&document)?)
        .bind(document.version())
        .bind(T::COLLECTION)
        .bind(document.id())
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar(
                "SELECT version FROM documents WHERE collection = $1 AND id = $2",
            )
            .bind(T::COLLECTION)
            .bind(document.id())
            .fetch_optional(&self.pool)
            .await?;

            return Err(match exists {
                Some(_) => RepositoryError::VersionConflict { expected },
                None => RepositoryError::NotFound,
            });
        }

        Ok(document)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, query: &Query, page: PageRequest) -> Result<Page<T>, RepositoryError> {
        let total = self.count(query).await?;
        let content = self.select(query, Some(page)).await?;
        Ok(Page::new(content, page, total))
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<T>, RepositoryError> {
        self.select(query, None).await
    }

    async fn count(&self, query: &Query) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM documents");
        push_filter::<T>(&mut builder, query);
        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(escape_like("ada"), "%ada%");
        assert_eq!(escape_like("50%_off"), "%50\\%\\_off%");
    }
}
