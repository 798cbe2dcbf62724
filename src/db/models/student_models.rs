use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enrollment record (`students`)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: Uuid,
    pub student_code: String,
    pub full_name: String,
    pub class_name: Option<String>,
    pub photo_url: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    /// Whether the student has been enrolled into the recognition registry
    pub registered: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub student_code: String,
    pub full_name: String,
    pub class_name: Option<String>,
    pub photo_url: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

/// Payload for updating a student; absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudent {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub class_name: Option<String>,
    pub photo_url: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

/// Minimal projection used by the bulk image export
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentPhoto {
    pub student_code: String,
    pub full_name: String,
    pub photo_url: String,
}
