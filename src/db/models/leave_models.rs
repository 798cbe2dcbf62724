use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Leave/absence request; mutated once by an approve/reject decision.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub requester_id: Option<Uuid>,
    pub requester_name: String,
    pub reason: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub duration_hours: f64,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Approval workflow state; terminal after the first decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "approval_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Payload for submitting a leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    pub requester_id: Option<Uuid>,
    pub requester_name: String,
    pub reason: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
}

/// Payload for deciding a leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDecision {
    pub request_id: Uuid,
    pub approve: bool,
}
