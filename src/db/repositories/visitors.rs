use crate::{
    db::models::{NewVisitor, Visitor, VisitorStatus},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Visitor registry repository
#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Arc<PgPool>,
}

impl VisitorsRepository {
    /// Create a new visitors repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Register a visitor
    pub async fn create(&self, visitor: &NewVisitor) -> Result<Visitor> {
        let result = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitor_registry (
                id, full_name, phone, host_name, purpose, expected_start,
                expected_end, badge_code, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'expected', $9)
            RETURNING id, full_name, phone, host_name, purpose, expected_start,
                      expected_end, badge_code, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&visitor.full_name)
        .bind(&visitor.phone)
        .bind(&visitor.host_name)
        .bind(&visitor.purpose)
        .bind(visitor.expected_start)
        .bind(visitor.expected_end)
        .bind(&visitor.badge_code)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to register visitor: {}", e)))?;

        Ok(result)
    }

    /// List visitors, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<VisitorStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Visitor>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, Visitor>(
            r#"
            SELECT id, full_name, phone, host_name, purpose, expected_start,
                   expected_end, badge_code, status, created_at
            FROM visitor_registry
            WHERE ($1::visitor_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list visitors: {}", e)))?;

        Ok(result)
    }

    /// Move a visitor between expected/on-site/departed
    pub async fn update_status(&self, id: &Uuid, status: VisitorStatus) -> Result<Option<Visitor>> {
        let result = sqlx::query_as::<_, Visitor>(
            r#"
            UPDATE visitor_registry
            SET status = $1
            WHERE id = $2
            RETURNING id, full_name, phone, host_name, purpose, expected_start,
                      expected_end, badge_code, status, created_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update visitor status: {}", e)))?;

        Ok(result)
    }
}
