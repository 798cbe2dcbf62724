use crate::{
    db::models::{NewStudent, Student, StudentPhoto, UpdateStudent},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Students repository
#[derive(Clone)]
pub struct StudentsRepository {
    pool: Arc<PgPool>,
}

impl StudentsRepository {
    /// Create a new students repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new student
    pub async fn create(&self, student: &NewStudent) -> Result<Student> {
        info!("Creating student: {}", student.student_code);

        let result = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (
                id, student_code, full_name, class_name, photo_url,
                guardian_name, guardian_phone, registered, is_active,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, TRUE, $8, $9)
            RETURNING id, student_code, full_name, class_name, photo_url,
                      guardian_name, guardian_phone, registered, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&student.student_code)
        .bind(&student.full_name)
        .bind(&student.class_name)
        .bind(&student.photo_url)
        .bind(&student.guardian_name)
        .bind(&student.guardian_phone)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create student: {}", e)))?;

        Ok(result)
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Student>> {
        let result = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_code, full_name, class_name, photo_url,
                   guardian_name, guardian_phone, registered, is_active,
                   created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get student by ID: {}", e)))?;

        Ok(result)
    }

    /// Get student by code
    pub async fn get_by_code(&self, student_code: &str) -> Result<Option<Student>> {
        let result = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_code, full_name, class_name, photo_url,
                   guardian_name, guardian_phone, registered, is_active,
                   created_at, updated_at
            FROM students
            WHERE student_code = $1
            "#,
        )
        .bind(student_code)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get student by code: {}", e)))?;

        Ok(result)
    }

    /// Get all active students
    pub async fn get_all(&self) -> Result<Vec<Student>> {
        let result = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_code, full_name, class_name, photo_url,
                   guardian_name, guardian_phone, registered, is_active,
                   created_at, updated_at
            FROM students
            WHERE is_active
            ORDER BY full_name
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get all students: {}", e)))?;

        Ok(result)
    }

    /// Update student fields; absent payload fields keep their stored values.
    pub async fn update(&self, update: &UpdateStudent) -> Result<Option<Student>> {
        let result = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET full_name = COALESCE($1, full_name),
                class_name = COALESCE($2, class_name),
                photo_url = COALESCE($3, photo_url),
                guardian_name = COALESCE($4, guardian_name),
                guardian_phone = COALESCE($5, guardian_phone),
                updated_at = $6
            WHERE id = $7 AND is_active
            RETURNING id, student_code, full_name, class_name, photo_url,
                      guardian_name, guardian_phone, registered, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&update.full_name)
        .bind(&update.class_name)
        .bind(&update.photo_url)
        .bind(&update.guardian_name)
        .bind(&update.guardian_phone)
        .bind(Utc::now())
        .bind(update.id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update student: {}", e)))?;

        Ok(result)
    }

    /// Soft-delete a student
    pub async fn soft_delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET is_active = FALSE, updated_at = $1
            WHERE id = $2 AND is_active
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete student: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// Students not yet enrolled into the recognition registry
    pub async fn get_unregistered(&self) -> Result<Vec<Student>> {
        let result = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_code, full_name, class_name, photo_url,
                   guardian_name, guardian_phone, registered, is_active,
                   created_at, updated_at
            FROM students
            WHERE is_active AND NOT registered
            ORDER BY created_at
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get unregistered students: {}", e)))?;

        Ok(result)
    }

    /// Mark a student as enrolled
    pub async fn mark_registered(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET registered = TRUE, updated_at = $1
            WHERE id = $2 AND is_active
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to mark student registered: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// Active students with no counterpart row in `user_registry`
    pub async fn get_missing_from_registry(&self) -> Result<Vec<Student>> {
        let result = sqlx::query_as::<_, Student>(
            r#"
            SELECT s.id, s.student_code, s.full_name, s.class_name, s.photo_url,
                   s.guardian_name, s.guardian_phone, s.registered, s.is_active,
                   s.created_at, s.updated_at
            FROM students s
            LEFT JOIN user_registry u ON u.person_code = s.student_code
            WHERE s.is_active AND u.id IS NULL
            ORDER BY s.student_code
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get students missing from registry: {}", e)))?;

        Ok(result)
    }

    /// Photo references for the bulk image export
    pub async fn get_photo_urls(&self) -> Result<Vec<StudentPhoto>> {
        let result = sqlx::query_as::<_, StudentPhoto>(
            r#"
            SELECT student_code, full_name, photo_url
            FROM students
            WHERE is_active AND photo_url IS NOT NULL
            ORDER BY student_code
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get student photo URLs: {}", e)))?;

        Ok(result)
    }
}
