use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Person identity row (`user_registry`)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonRecord {
    pub id: Uuid,
    pub person_code: String,
    pub full_name: String,
    pub class_name: Option<String>,
    pub role: PersonRole,
    pub presence: PresenceStatus,
    pub risk_score: Option<i32>,
    pub risk_notes: Option<String>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "person_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Student,
    Staff,
    Visitor,
}

/// Where a person currently is, as far as the detection pipeline knows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "presence_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    OnCampus,
    OffCampus,
    Unknown,
}

/// Payload for creating a registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPersonRecord {
    pub person_code: String,
    pub full_name: String,
    pub class_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: PersonRole,
    pub photo_url: Option<String>,
}

fn default_role() -> PersonRole {
    PersonRole::Student
}
