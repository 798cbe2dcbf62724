use crate::api::rest::{ApiError, ApiResult, AppState, DataBody};
use crate::db::models::{NewVisitor, Visitor, VisitorStatus};
use crate::db::repositories::visitors::VisitorsRepository;
use crate::error::Error;
use crate::security::Claims;
use crate::services::insights::{self, EmptyState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct VisitorQuery {
    pub status: Option<VisitorStatus>,
    pub limit: Option<i64>,
}

/// GET /api/visitors
pub async fn list_visitors(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<VisitorQuery>,
) -> ApiResult<Json<DataBody<Vec<Visitor>>>> {
    let repo = VisitorsRepository::new(Arc::clone(&state.db_pool));
    let visitors = repo.list(query.status, query.limit).await?;

    Ok(Json(DataBody::list(
        visitors,
        insights::empty_state(EmptyState::Visitors),
    )))
}

/// POST /api/visitors
pub async fn register_visitor(
    State(state): State<AppState>,
    _claims: Claims,
    Json(visitor): Json<NewVisitor>,
) -> ApiResult<(StatusCode, Json<DataBody<Visitor>>)> {
    if visitor.full_name.trim().is_empty() {
        return Err(Error::Validation("full_name must not be empty".to_string()).into());
    }

    let repo = VisitorsRepository::new(Arc::clone(&state.db_pool));
    let created = repo.create(&visitor).await?;

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

#[derive(Debug, Deserialize)]
pub struct VisitorStatusUpdate {
    pub status: VisitorStatus,
}

/// PUT /api/visitors/:id/status, the front-desk check-in/check-out action
pub async fn set_visitor_status(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<Uuid>,
    Json(update): Json<VisitorStatusUpdate>,
) -> ApiResult<Json<DataBody<Visitor>>> {
    let repo = VisitorsRepository::new(Arc::clone(&state.db_pool));
    let updated = repo
        .update_status(&id, update.status)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Visitor not found: {}", id)))?;

    Ok(Json(DataBody::new(updated)))
}
