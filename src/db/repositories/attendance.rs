use crate::{
    db::models::{AttendanceEvent, NewAttendanceEvent},
    error::Error,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Attendance events repository. Rows are immutable once created; status is
/// derived by readers, never edited here.
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: Arc<PgPool>,
}

impl AttendanceRepository {
    /// Create a new attendance repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Record a new attendance event
    pub async fn create(&self, event: &NewAttendanceEvent) -> Result<AttendanceEvent> {
        let result = sqlx::query_as::<_, AttendanceEvent>(
            r#"
            INSERT INTO attendance_events (
                id, person_id, person_name, event_type, occurred_at,
                camera_id, location, confidence, confirmed, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, person_id, person_name, event_type, occurred_at,
                      camera_id, location, confidence, confirmed, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.person_id)
        .bind(&event.person_name)
        .bind(event.event_type)
        .bind(event.occurred_at)
        .bind(event.camera_id)
        .bind(&event.location)
        .bind(event.confidence)
        .bind(event.confirmed)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create attendance event: {}", e)))?;

        Ok(result)
    }

    /// Get the most recent movement events
    pub async fn get_recent(&self, limit: Option<i64>) -> Result<Vec<AttendanceEvent>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, AttendanceEvent>(
            r#"
            SELECT id, person_id, person_name, event_type, occurred_at,
                   camera_id, location, confidence, confirmed, created_at
            FROM attendance_events
            ORDER BY occurred_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get recent attendance events: {}", e)))?;

        Ok(result)
    }

    /// Get events for a person in a time range
    pub async fn get_by_person(
        &self,
        person_id: &Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<AttendanceEvent>> {
        let result = sqlx::query_as::<_, AttendanceEvent>(
            r#"
            SELECT id, person_id, person_name, event_type, occurred_at,
                   camera_id, location, confidence, confirmed, created_at
            FROM attendance_events
            WHERE person_id = $1 AND occurred_at >= $2 AND occurred_at <= $3
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(person_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get events for person: {}", e)))?;

        Ok(result)
    }
}
