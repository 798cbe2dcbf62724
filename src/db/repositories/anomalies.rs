use crate::{
    db::models::{Anomaly, AnomalyStatus, NewAnomaly, Severity},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const ANOMALY_COLUMNS: &str = "id, person_id, severity, status, location, expected_location, \
     description, detected_at, intervention_count, last_intervention_at, \
     resolved_by, resolved_at, created_at";

/// Anomalies repository
#[derive(Clone)]
pub struct AnomaliesRepository {
    pool: Arc<PgPool>,
}

impl AnomaliesRepository {
    /// Create a new anomalies repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new anomaly
    pub async fn create(&self, anomaly: &NewAnomaly) -> Result<Anomaly> {
        let result = sqlx::query_as::<_, Anomaly>(&format!(
            r#"
            INSERT INTO anomalies (
                id, person_id, severity, status, location, expected_location,
                description, detected_at, created_at
            )
            VALUES ($1, $2, $3, 'active', $4, $5, $6, $7, $8)
            RETURNING {ANOMALY_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(anomaly.person_id)
        .bind(anomaly.severity)
        .bind(&anomaly.location)
        .bind(&anomaly.expected_location)
        .bind(&anomaly.description)
        .bind(anomaly.detected_at.unwrap_or_else(Utc::now))
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create anomaly: {}", e)))?;

        Ok(result)
    }

    /// Get anomaly by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Anomaly>> {
        let result = sqlx::query_as::<_, Anomaly>(&format!(
            r#"
            SELECT {ANOMALY_COLUMNS}
            FROM anomalies
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get anomaly by ID: {}", e)))?;

        Ok(result)
    }

    /// Get all active anomalies, most severe first within recency
    pub async fn get_active(&self, limit: Option<i64>) -> Result<Vec<Anomaly>> {
        let limit = limit.unwrap_or(200);

        let result = sqlx::query_as::<_, Anomaly>(&format!(
            r#"
            SELECT {ANOMALY_COLUMNS}
            FROM anomalies
            WHERE status = 'active'
            ORDER BY severity, detected_at DESC
            LIMIT $1
            "#,
        ))
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get active anomalies: {}", e)))?;

        Ok(result)
    }

    /// Search anomalies with optional status/severity filters
    pub async fn search(
        &self,
        status: Option<AnomalyStatus>,
        severity: Option<Severity>,
        limit: Option<i64>,
    ) -> Result<Vec<Anomaly>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, Anomaly>(&format!(
            r#"
            SELECT {ANOMALY_COLUMNS}
            FROM anomalies
            WHERE ($1::anomaly_status IS NULL OR status = $1)
              AND ($2::severity IS NULL OR severity = $2)
            ORDER BY detected_at DESC
            LIMIT $3
            "#,
        ))
        .bind(status)
        .bind(severity)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to search anomalies: {}", e)))?;

        Ok(result)
    }

    /// Transition an anomaly out of the active state
    pub async fn set_status(
        &self,
        id: &Uuid,
        status: AnomalyStatus,
        resolved_by: Option<&Uuid>,
    ) -> Result<Option<Anomaly>> {
        let result = sqlx::query_as::<_, Anomaly>(&format!(
            r#"
            UPDATE anomalies
            SET status = $1, resolved_by = $2, resolved_at = $3
            WHERE id = $4
            RETURNING {ANOMALY_COLUMNS}
            "#,
        ))
        .bind(status)
        .bind(resolved_by)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update anomaly status: {}", e)))?;

        if result.is_some() {
            info!("Anomaly {} moved to {:?}", id, status);
        }

        Ok(result)
    }

    /// Bump the intervention counter after a voice broadcast was logged
    pub async fn record_intervention(&self, id: &Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE anomalies
            SET intervention_count = intervention_count + 1, last_intervention_at = $1
            WHERE id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to record intervention: {}", e)))?;

        Ok(())
    }
}
