use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Best-effort audit row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemLog {
    pub id: Uuid,
    pub category: String,
    pub action: String,
    pub actor: Option<String>,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
