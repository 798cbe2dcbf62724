use crate::{
    db::models::{ApprovalStatus, LeaveRequest},
    error::Error,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Leave requests repository
#[derive(Clone)]
pub struct LeaveRequestsRepository {
    pool: Arc<PgPool>,
}

impl LeaveRequestsRepository {
    /// Create a new leave requests repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Persist a submitted leave request with its precomputed duration
    pub async fn create(
        &self,
        requester_id: Option<Uuid>,
        requester_name: &str,
        reason: Option<&str>,
        start_datetime: DateTime<Utc>,
        end_datetime: DateTime<Utc>,
        duration_hours: f64,
    ) -> Result<LeaveRequest> {
        let result = sqlx::query_as::<_, LeaveRequest>(
            r#"
            INSERT INTO leave_requests (
                id, requester_id, requester_name, reason, start_datetime,
                end_datetime, duration_hours, approval_status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            RETURNING id, requester_id, requester_name, reason, start_datetime,
                      end_datetime, duration_hours, approval_status, approved_by,
                      decided_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(requester_id)
        .bind(requester_name)
        .bind(reason)
        .bind(start_datetime)
        .bind(end_datetime)
        .bind(duration_hours)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create leave request: {}", e)))?;

        Ok(result)
    }

    /// Get leave request by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<LeaveRequest>> {
        let result = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, requester_id, requester_name, reason, start_datetime,
                   end_datetime, duration_hours, approval_status, approved_by,
                   decided_at, created_at
            FROM leave_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get leave request by ID: {}", e)))?;

        Ok(result)
    }

    /// List leave requests, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<ApprovalStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<LeaveRequest>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, requester_id, requester_name, reason, start_datetime,
                   end_datetime, duration_hours, approval_status, approved_by,
                   decided_at, created_at
            FROM leave_requests
            WHERE ($1::approval_status IS NULL OR approval_status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list leave requests: {}", e)))?;

        Ok(result)
    }

    /// Decide a pending leave request; terminal requests are left untouched.
    pub async fn decide(
        &self,
        id: &Uuid,
        status: ApprovalStatus,
        approver: &Uuid,
    ) -> Result<Option<LeaveRequest>> {
        let result = sqlx::query_as::<_, LeaveRequest>(
            r#"
            UPDATE leave_requests
            SET approval_status = $1, approved_by = $2, decided_at = $3
            WHERE id = $4 AND approval_status = 'pending'
            RETURNING id, requester_id, requester_name, reason, start_datetime,
                      end_datetime, duration_hours, approval_status, approved_by,
                      decided_at, created_at
            "#,
        )
        .bind(status)
        .bind(approver)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to decide leave request: {}", e)))?;

        Ok(result)
    }
}
