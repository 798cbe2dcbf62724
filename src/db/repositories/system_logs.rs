use crate::{db::models::SystemLog, error::Error};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// System audit log repository
#[derive(Clone)]
pub struct SystemLogsRepository {
    pool: Arc<PgPool>,
}

impl SystemLogsRepository {
    /// Create a new system logs repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Write an audit row
    pub async fn create(
        &self,
        category: &str,
        action: &str,
        actor: Option<&str>,
        detail: Option<serde_json::Value>,
    ) -> Result<SystemLog> {
        let result = sqlx::query_as::<_, SystemLog>(
            r#"
            INSERT INTO system_logs (id, category, action, actor, detail, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, category, action, actor, detail, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category)
        .bind(action)
        .bind(actor)
        .bind(detail)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to write system log: {}", e)))?;

        Ok(result)
    }
}
