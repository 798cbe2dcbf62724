use crate::api::rest::{ActionResponse, ApiResult, AppState, DataBody};
use crate::db::models::{InterventionLog, VoiceBroadcast};
use crate::db::repositories::interventions::InterventionsRepository;
use crate::security::Claims;
use crate::services::interventions::InterventionService;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct InterventionQuery {
    pub limit: Option<i64>,
}

/// GET /api/interventions, the broadcast history panel
pub async fn list_broadcasts(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<InterventionQuery>,
) -> ApiResult<Json<DataBody<Vec<InterventionLog>>>> {
    let repo = InterventionsRepository::new(Arc::clone(&state.db_pool));
    let broadcasts = repo.get_recent(query.limit).await?;

    Ok(Json(DataBody::new(broadcasts)))
}

/// POST /api/interventions/voice/broadcast
pub async fn broadcast_voice(
    State(state): State<AppState>,
    claims: Claims,
    Json(broadcast): Json<VoiceBroadcast>,
) -> ApiResult<(StatusCode, Json<ActionResponse<InterventionLog>>)> {
    let service = InterventionService::new(Arc::clone(&state.db_pool));
    let initiated_by = claims.user_id()?;

    let log = service.broadcast(&broadcast, &initiated_by).await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok(
            format!("Broadcast sent to zone {}", log.speaker_zone),
            log,
        )),
    ))
}
