use crate::{
    db::models::{NewPersonRecord, PersonRecord, PresenceStatus},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Person registry repository (`user_registry`)
#[derive(Clone)]
pub struct PersonsRepository {
    pool: Arc<PgPool>,
}

impl PersonsRepository {
    /// Create a new persons repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a registry entry
    pub async fn create(&self, person: &NewPersonRecord) -> Result<PersonRecord> {
        let result = sqlx::query_as::<_, PersonRecord>(
            r#"
            INSERT INTO user_registry (
                id, person_code, full_name, class_name, role, presence,
                photo_url, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'unknown', $6, TRUE, $7, $8)
            RETURNING id, person_code, full_name, class_name, role, presence,
                      risk_score, risk_notes, photo_url, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&person.person_code)
        .bind(&person.full_name)
        .bind(&person.class_name)
        .bind(person.role)
        .bind(&person.photo_url)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create registry entry: {}", e)))?;

        Ok(result)
    }

    /// Get all active registry entries
    pub async fn get_all_active(&self) -> Result<Vec<PersonRecord>> {
        let result = sqlx::query_as::<_, PersonRecord>(
            r#"
            SELECT id, person_code, full_name, class_name, role, presence,
                   risk_score, risk_notes, photo_url, is_active,
                   created_at, updated_at
            FROM user_registry
            WHERE is_active
            ORDER BY full_name
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get registry entries: {}", e)))?;

        Ok(result)
    }

    /// Update a person's presence
    pub async fn update_presence(&self, id: &Uuid, presence: PresenceStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_registry
            SET presence = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(presence)
        .bind(Utc::now())
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update presence: {}", e)))?;

        Ok(())
    }
}
