use crate::api::rest::{ActionResponse, ApiError, ApiResult, AppState, DataBody};
use crate::db::models::{ApprovalStatus, LeaveDecision, LeaveRequest, NewLeaveRequest};
use crate::db::repositories::leave_requests::LeaveRequestsRepository;
use crate::error::Error;
use crate::security::Claims;
use crate::services::insights::{self, EmptyState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LeaveQuery {
    pub status: Option<ApprovalStatus>,
    pub limit: Option<i64>,
}

/// GET /api/leave
pub async fn list_requests(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<LeaveQuery>,
) -> ApiResult<Json<DataBody<Vec<LeaveRequest>>>> {
    let repo = LeaveRequestsRepository::new(Arc::clone(&state.db_pool));
    let requests = repo.list(query.status, query.limit).await?;

    Ok(Json(DataBody::list(
        requests,
        insights::empty_state(EmptyState::Requests),
    )))
}

/// Duration of a leave window in hours
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

/// A leave window must end strictly after it starts.
pub fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), Error> {
    if end <= start {
        return Err(Error::Validation(
            "end_datetime must be after start_datetime".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/leave
pub async fn submit_request(
    State(state): State<AppState>,
    _claims: Claims,
    Json(request): Json<NewLeaveRequest>,
) -> ApiResult<(StatusCode, Json<DataBody<LeaveRequest>>)> {
    validate_window(request.start_datetime, request.end_datetime)?;
    if request.requester_name.trim().is_empty() {
        return Err(Error::Validation("requester_name must not be empty".to_string()).into());
    }

    let hours = duration_hours(request.start_datetime, request.end_datetime);

    let repo = LeaveRequestsRepository::new(Arc::clone(&state.db_pool));
    let created = repo
        .create(
            request.requester_id,
            &request.requester_name,
            request.reason.as_deref(),
            request.start_datetime,
            request.end_datetime,
            hours,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

/// POST /api/leave/decide
pub async fn decide_request(
    State(state): State<AppState>,
    claims: Claims,
    Json(decision): Json<LeaveDecision>,
) -> ApiResult<Json<ActionResponse<LeaveRequest>>> {
    let repo = LeaveRequestsRepository::new(Arc::clone(&state.db_pool));
    let approver = claims.user_id()?;

    let status = if decision.approve {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Rejected
    };

    match repo.decide(&decision.request_id, status, &approver).await? {
        Some(request) => {
            let verb = if decision.approve { "approved" } else { "rejected" };
            Ok(Json(ActionResponse::ok(
                format!("Leave request {}", verb),
                request,
            )))
        }
        None => {
            let existing = repo.get_by_id(&decision.request_id).await?.ok_or_else(|| {
                ApiError::not_found(format!("Leave request not found: {}", decision.request_id))
            })?;

            Ok(Json(ActionResponse::noop(
                "Leave request already decided",
                existing,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn four_hour_window_is_four_hours() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(duration_hours(start, end), 4.0);
    }

    #[test]
    fn partial_hours_are_fractional() {
        let start = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();

        assert_eq!(duration_hours(start, end), 1.5);
    }

    #[test]
    fn window_spanning_days_accumulates() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap();

        assert_eq!(duration_hours(start, end), 12.0);
    }

    #[test]
    fn inverted_window_is_rejected_with_400() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        let err = validate_window(start, end).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let api_err: ApiError = err.into();
        assert_eq!(api_err.status, 400);
    }

    #[test]
    fn zero_length_window_is_rejected() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        assert!(validate_window(at, at).is_err());
    }

    #[test]
    fn valid_window_passes_validation() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        assert!(validate_window(start, end).is_ok());
    }
}
