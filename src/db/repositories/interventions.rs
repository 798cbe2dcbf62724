use crate::{db::models::InterventionLog, error::Error};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Intervention logs repository
#[derive(Clone)]
pub struct InterventionsRepository {
    pool: Arc<PgPool>,
}

impl InterventionsRepository {
    /// Create a new interventions repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Log a voice broadcast
    pub async fn create(
        &self,
        anomaly_id: Option<Uuid>,
        speaker_zone: &str,
        message: &str,
        initiated_by: &Uuid,
    ) -> Result<InterventionLog> {
        let result = sqlx::query_as::<_, InterventionLog>(
            r#"
            INSERT INTO intervention_logs (
                id, anomaly_id, speaker_zone, message, initiated_by,
                delivered, broadcast_at
            )
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING id, anomaly_id, speaker_zone, message, initiated_by,
                      delivered, broadcast_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(anomaly_id)
        .bind(speaker_zone)
        .bind(message)
        .bind(initiated_by)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to log intervention: {}", e)))?;

        Ok(result)
    }

    /// Most recent broadcasts
    pub async fn get_recent(&self, limit: Option<i64>) -> Result<Vec<InterventionLog>> {
        let limit = limit.unwrap_or(50);

        let result = sqlx::query_as::<_, InterventionLog>(
            r#"
            SELECT id, anomaly_id, speaker_zone, message, initiated_by,
                   delivered, broadcast_at
            FROM intervention_logs
            ORDER BY broadcast_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get recent interventions: {}", e)))?;

        Ok(result)
    }
}
