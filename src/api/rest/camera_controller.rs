use crate::api::rest::{ApiError, ApiResult, AppState, DataBody};
use crate::db::models::{CameraMetadata, RegisterCamera};
use crate::db::repositories::cameras::CamerasRepository;
use crate::error::Error;
use crate::security::Claims;
use crate::services::insights::{self, EmptyState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// GET /api/cameras
pub async fn list_cameras(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<Vec<CameraMetadata>>>> {
    let repo = CamerasRepository::new(Arc::clone(&state.db_pool));
    let cameras = repo.get_all().await?;

    Ok(Json(DataBody::list(
        cameras,
        insights::empty_state(EmptyState::Cameras),
    )))
}

/// POST /api/cameras registers a capture device. `rtsp_url` is optional;
/// when present it must parse as a URL.
pub async fn register_camera(
    State(state): State<AppState>,
    _claims: Claims,
    Json(camera): Json<RegisterCamera>,
) -> ApiResult<(StatusCode, Json<DataBody<CameraMetadata>>)> {
    if camera.device_id.trim().is_empty() {
        return Err(Error::Validation("device_id must not be empty".to_string()).into());
    }
    if let Some(rtsp_url) = &camera.rtsp_url {
        url::Url::parse(rtsp_url)
            .map_err(|e| Error::Validation(format!("Invalid rtsp_url: {}", e)))?;
    }

    let repo = CamerasRepository::new(Arc::clone(&state.db_pool));
    if repo.get_by_device_id(&camera.device_id).await?.is_some() {
        return Err(Error::AlreadyExists(format!(
            "Camera already registered: {}",
            camera.device_id
        ))
        .into());
    }

    let created = repo.create(&camera).await?;

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

#[derive(Debug, Deserialize)]
pub struct CameraStatusUpdate {
    pub online: bool,
}

/// PUT /api/cameras/:id/status, the device pipeline's online/offline report
pub async fn set_camera_status(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<Uuid>,
    Json(update): Json<CameraStatusUpdate>,
) -> ApiResult<Json<DataBody<CameraMetadata>>> {
    let repo = CamerasRepository::new(Arc::clone(&state.db_pool));
    let updated = repo
        .set_status(&id, update.online)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Camera not found: {}", id)))?;

    Ok(Json(DataBody::new(updated)))
}
