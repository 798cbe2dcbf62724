use crate::api::rest::{ApiError, ApiResult, AppState, DataBody};
use crate::db::models::{Anomaly, AnomalyStatus, NewAnomaly, Severity};
use crate::db::repositories::anomalies::AnomaliesRepository;
use crate::security::Claims;
use crate::services::insights::{self, EmptyState, SeverityBuckets};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AnomalyQuery {
    pub status: Option<AnomalyStatus>,
    pub severity: Option<Severity>,
    pub limit: Option<i64>,
}

/// GET /api/anomalies
pub async fn list_anomalies(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<AnomalyQuery>,
) -> ApiResult<Json<DataBody<Vec<Anomaly>>>> {
    let repo = AnomaliesRepository::new(Arc::clone(&state.db_pool));
    let anomalies = repo
        .search(query.status, query.severity, query.limit)
        .await?;

    Ok(Json(DataBody::list(
        anomalies,
        insights::empty_state(EmptyState::Anomalies),
    )))
}

/// POST /api/anomalies
pub async fn create_anomaly(
    State(state): State<AppState>,
    _claims: Claims,
    Json(anomaly): Json<NewAnomaly>,
) -> ApiResult<(StatusCode, Json<DataBody<Anomaly>>)> {
    if anomaly.description.trim().is_empty() {
        return Err(crate::error::Error::Validation(
            "description must not be empty".to_string(),
        )
        .into());
    }

    let repo = AnomaliesRepository::new(Arc::clone(&state.db_pool));
    let created = repo.create(&anomaly).await?;

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

/// GET /api/anomalies/:id
pub async fn get_anomaly(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DataBody<Anomaly>>> {
    let repo = AnomaliesRepository::new(Arc::clone(&state.db_pool));
    let anomaly = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Anomaly not found: {}", id)))?;

    Ok(Json(DataBody::new(anomaly)))
}

/// Action-queue payload: the active set partitioned by severity, with the
/// alert count the header card shows.
#[derive(Debug, Serialize)]
pub struct ActiveAnomalies {
    pub buckets: SeverityBuckets,
    pub active_alerts: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

/// GET /api/anomalies/active
pub async fn active_anomalies(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<ActiveAnomalies>>> {
    let repo = AnomaliesRepository::new(Arc::clone(&state.db_pool));
    let anomalies = repo.get_active(None).await?;

    let buckets = insights::partition_by_severity(&anomalies);
    let payload = ActiveAnomalies {
        active_alerts: buckets.active_alert_count(),
        total: buckets.total(),
        empty_state: anomalies
            .is_empty()
            .then(|| insights::empty_state(EmptyState::Anomalies)),
        buckets,
    };

    Ok(Json(DataBody::new(payload)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: AnomalyStatus,
}

/// PUT /api/anomalies/:id/status
pub async fn set_anomaly_status(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<DataBody<Anomaly>>> {
    let repo = AnomaliesRepository::new(Arc::clone(&state.db_pool));
    let resolver = claims.user_id()?;

    let updated = repo
        .set_status(&id, update.status, Some(&resolver))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Anomaly not found: {}", id)))?;

    Ok(Json(DataBody::new(updated)))
}
