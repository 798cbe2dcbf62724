use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of a voice intervention broadcast to a speaker zone
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InterventionLog {
    pub id: Uuid,
    pub anomaly_id: Option<Uuid>,
    pub speaker_zone: String,
    pub message: String,
    pub initiated_by: Uuid,
    pub delivered: bool,
    pub broadcast_at: DateTime<Utc>,
}

/// Payload for broadcasting a voice intervention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceBroadcast {
    pub anomaly_id: Option<Uuid>,
    pub speaker_zone: String,
    pub message: String,
}
