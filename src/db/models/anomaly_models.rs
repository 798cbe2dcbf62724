use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Detected behavioral/location deviation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Anomaly {
    pub id: Uuid,
    pub person_id: Option<Uuid>,
    pub severity: Severity,
    pub status: AnomalyStatus,
    pub location: Option<String>,
    pub expected_location: Option<String>,
    pub description: String,
    pub detected_at: DateTime<Utc>,
    pub intervention_count: i32,
    pub last_intervention_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Anomaly severity tier; `Watchlist` is informational monitoring only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Watchlist,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "anomaly_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnomalyStatus {
    Active,
    Resolved,
    Escalated,
}

/// Payload for creating an anomaly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnomaly {
    pub person_id: Option<Uuid>,
    pub severity: Severity,
    pub location: Option<String>,
    pub expected_location: Option<String>,
    pub description: String,
    pub detected_at: Option<DateTime<Utc>>,
}
