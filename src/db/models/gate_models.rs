use super::leave_models::ApprovalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pending entry/exit authorization awaiting a guard or admin decision.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GateRequest {
    pub id: Uuid,
    pub person_id: Option<Uuid>,
    pub person_name: String,
    pub direction: GateDirection,
    pub requested_at: DateTime<Utc>,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "gate_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GateDirection {
    Entry,
    Exit,
}

/// Payload for creating a gate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGateRequest {
    pub person_id: Option<Uuid>,
    pub person_name: String,
    pub direction: GateDirection,
    pub note: Option<String>,
}

/// Payload for approving or denying a gate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDecision {
    pub request_id: Uuid,
    pub approve: bool,
    pub note: Option<String>,
}
