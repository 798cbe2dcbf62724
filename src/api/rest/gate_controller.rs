use crate::api::rest::{ActionResponse, ApiError, ApiResult, AppState, DataBody};
use crate::db::models::{ApprovalStatus, GateDecision, GateRequest, NewGateRequest};
use crate::db::repositories::gate_requests::GateRequestsRepository;
use crate::security::Claims;
use crate::services::insights::{self, EmptyState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub limit: Option<i64>,
}

/// GET /api/gate
pub async fn pending_requests(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<PendingQuery>,
) -> ApiResult<Json<DataBody<Vec<GateRequest>>>> {
    let repo = GateRequestsRepository::new(Arc::clone(&state.db_pool));
    let requests = repo.get_pending(query.limit).await?;

    Ok(Json(DataBody::list(
        requests,
        insights::empty_state(EmptyState::Requests),
    )))
}

/// POST /api/gate
pub async fn create_request(
    State(state): State<AppState>,
    _claims: Claims,
    Json(request): Json<NewGateRequest>,
) -> ApiResult<(StatusCode, Json<DataBody<GateRequest>>)> {
    let repo = GateRequestsRepository::new(Arc::clone(&state.db_pool));
    let created = repo.create(&request).await?;

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

/// POST /api/gate/approve
///
/// Approval is idempotent: deciding an already-decided request changes
/// nothing and reports the stored decision back.
pub async fn approve_request(
    State(state): State<AppState>,
    claims: Claims,
    Json(decision): Json<GateDecision>,
) -> ApiResult<Json<ActionResponse<GateRequest>>> {
    let repo = GateRequestsRepository::new(Arc::clone(&state.db_pool));
    let approver = claims.user_id()?;

    let status = if decision.approve {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Rejected
    };

    match repo
        .decide(&decision.request_id, status, &approver, decision.note.as_deref())
        .await?
    {
        Some(request) => {
            let verb = if decision.approve { "approved" } else { "rejected" };
            Ok(Json(ActionResponse::ok(
                format!("Gate request {}", verb),
                request,
            )))
        }
        None => {
            // Zero rows matched the pending guard: either unknown, or
            // already decided. Report the stored row untouched.
            let existing = repo
                .get_by_id(&decision.request_id)
                .await?
                .ok_or_else(|| {
                    ApiError::not_found(format!("Gate request not found: {}", decision.request_id))
                })?;

            Ok(Json(ActionResponse::noop(
                "Gate request already decided",
                existing,
            )))
        }
    }
}
