use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visitor registration (`visitor_registry`)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Visitor {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub host_name: Option<String>,
    pub purpose: Option<String>,
    pub expected_start: Option<DateTime<Utc>>,
    pub expected_end: Option<DateTime<Utc>>,
    pub badge_code: Option<String>,
    pub status: VisitorStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "visitor_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VisitorStatus {
    Expected,
    OnSite,
    Departed,
}

/// Payload for registering a visitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVisitor {
    pub full_name: String,
    pub phone: Option<String>,
    pub host_name: Option<String>,
    pub purpose: Option<String>,
    pub expected_start: Option<DateTime<Utc>>,
    pub expected_end: Option<DateTime<Utc>>,
    pub badge_code: Option<String>,
}
