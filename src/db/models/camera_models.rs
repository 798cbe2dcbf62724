use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration of a physical capture device. The online flag and heartbeat
/// timestamp are reported by the device pipeline through the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CameraMetadata {
    pub id: Uuid,
    pub device_id: String,
    pub display_name: String,
    pub location: Option<String>,
    pub rtsp_url: Option<String>,
    pub online: bool,
    pub last_heartbeat_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCamera {
    pub device_id: String,
    pub display_name: String,
    pub location: Option<String>,
    pub rtsp_url: Option<String>,
}
