use crate::{
    db::models::{ApprovalStatus, GateRequest, NewGateRequest},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Gate requests repository
#[derive(Clone)]
pub struct GateRequestsRepository {
    pool: Arc<PgPool>,
}

impl GateRequestsRepository {
    /// Create a new gate requests repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a pending gate request
    pub async fn create(&self, request: &NewGateRequest) -> Result<GateRequest> {
        let result = sqlx::query_as::<_, GateRequest>(
            r#"
            INSERT INTO gate_requests (
                id, person_id, person_name, direction, requested_at,
                approval_status, note
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING id, person_id, person_name, direction, requested_at,
                      approval_status, approved_by, approved_at, note
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.person_id)
        .bind(&request.person_name)
        .bind(request.direction)
        .bind(Utc::now())
        .bind(&request.note)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create gate request: {}", e)))?;

        Ok(result)
    }

    /// Get gate request by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<GateRequest>> {
        let result = sqlx::query_as::<_, GateRequest>(
            r#"
            SELECT id, person_id, person_name, direction, requested_at,
                   approval_status, approved_by, approved_at, note
            FROM gate_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get gate request by ID: {}", e)))?;

        Ok(result)
    }

    /// Get pending gate requests, oldest first
    pub async fn get_pending(&self, limit: Option<i64>) -> Result<Vec<GateRequest>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, GateRequest>(
            r#"
            SELECT id, person_id, person_name, direction, requested_at,
                   approval_status, approved_by, approved_at, note
            FROM gate_requests
            WHERE approval_status = 'pending'
            ORDER BY requested_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get pending gate requests: {}", e)))?;

        Ok(result)
    }

    /// Decide a pending request. The `approval_status = 'pending'` guard makes
    /// the transition idempotent: once a request is terminal, further calls
    /// match zero rows and `approved_at` is never touched again.
    pub async fn decide(
        &self,
        id: &Uuid,
        status: ApprovalStatus,
        approver: &Uuid,
        note: Option<&str>,
    ) -> Result<Option<GateRequest>> {
        let result = sqlx::query_as::<_, GateRequest>(
            r#"
            UPDATE gate_requests
            SET approval_status = $1, approved_by = $2, approved_at = $3,
                note = COALESCE($4, note)
            WHERE id = $5 AND approval_status = 'pending'
            RETURNING id, person_id, person_name, direction, requested_at,
                      approval_status, approved_by, approved_at, note
            "#,
        )
        .bind(status)
        .bind(approver)
        .bind(Utc::now())
        .bind(note)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to decide gate request: {}", e)))?;

        Ok(result)
    }
}
