use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entry/exit or period-attendance row; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceEvent {
    pub id: Uuid,
    pub person_id: Option<Uuid>,
    pub person_name: Option<String>,
    pub event_type: AttendanceEventType,
    pub occurred_at: DateTime<Utc>,
    pub camera_id: Option<Uuid>,
    pub location: Option<String>,
    pub confidence: Option<f32>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "attendance_event_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceEventType {
    Entry,
    Exit,
    Period,
}

/// Payload for recording an attendance event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttendanceEvent {
    pub person_id: Option<Uuid>,
    pub person_name: Option<String>,
    pub event_type: AttendanceEventType,
    pub occurred_at: DateTime<Utc>,
    pub camera_id: Option<Uuid>,
    pub location: Option<String>,
    pub confidence: Option<f32>,
    #[serde(default)]
    pub confirmed: bool,
}
