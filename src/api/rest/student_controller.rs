use crate::api::rest::{ActionResponse, ApiError, ApiResult, AppState, DataBody};
use crate::db::models::{NewStudent, Student, UpdateStudent};
use crate::db::repositories::students::StudentsRepository;
use crate::error::Error;
use crate::security::Claims;
use crate::services::export;
use crate::services::insights::{self, EmptyState};
use crate::services::registry::{RegistryService, SyncOutcome};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<Vec<Student>>>> {
    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    let students = repo.get_all().await?;

    Ok(Json(DataBody::list(
        students,
        insights::empty_state(EmptyState::Students),
    )))
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    _claims: Claims,
    Json(student): Json<NewStudent>,
) -> ApiResult<(StatusCode, Json<DataBody<Student>>)> {
    if student.student_code.trim().is_empty() {
        return Err(Error::Validation("student_code must not be empty".to_string()).into());
    }

    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    if repo.get_by_code(&student.student_code).await?.is_some() {
        return Err(Error::AlreadyExists(format!(
            "Student already exists: {}",
            student.student_code
        ))
        .into());
    }

    let created = repo.create(&student).await?;

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

/// PUT /api/students
pub async fn update_student(
    State(state): State<AppState>,
    _claims: Claims,
    Json(update): Json<UpdateStudent>,
) -> ApiResult<Json<DataBody<Student>>> {
    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    let updated = repo
        .update(&update)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Student not found: {}", update.id)))?;

    Ok(Json(DataBody::new(updated)))
}

#[derive(Debug, Deserialize)]
pub struct StudentRef {
    pub id: Uuid,
}

/// DELETE /api/students (soft delete)
pub async fn delete_student(
    State(state): State<AppState>,
    _claims: Claims,
    Json(student): Json<StudentRef>,
) -> ApiResult<Json<ActionResponse<Uuid>>> {
    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    let deleted = repo.soft_delete(&student.id).await?;

    if !deleted {
        return Err(ApiError::not_found(format!(
            "Student not found: {}",
            student.id
        )));
    }

    Ok(Json(ActionResponse::ok("Student deactivated", student.id)))
}

/// GET /api/students/sync-registry lists students missing a registry
/// counterpart.
pub async fn sync_registry_report(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<Vec<Student>>>> {
    let service = RegistryService::new(Arc::clone(&state.db_pool));
    let missing = service.missing_from_registry().await?;

    Ok(Json(DataBody::list(
        missing,
        insights::empty_state(EmptyState::Students),
    )))
}

/// POST /api/students/sync-registry inserts registry rows for the missing.
pub async fn sync_registry(
    State(state): State<AppState>,
    claims: Claims,
) -> ApiResult<Json<ActionResponse<SyncOutcome>>> {
    let service = RegistryService::new(Arc::clone(&state.db_pool));
    let outcome = service.sync_registry(&claims.name).await?;

    Ok(Json(ActionResponse::ok(
        format!("Synced {} students into registry", outcome.synced),
        outcome,
    )))
}

/// GET /api/students/unregistered
pub async fn unregistered_students(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<Vec<Student>>>> {
    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    let students = repo.get_unregistered().await?;

    Ok(Json(DataBody::list(
        students,
        insights::empty_state(EmptyState::Students),
    )))
}

/// POST /api/students/unregistered marks one student enrolled.
pub async fn mark_registered(
    State(state): State<AppState>,
    _claims: Claims,
    Json(student): Json<StudentRef>,
) -> ApiResult<Json<ActionResponse<Uuid>>> {
    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    let marked = repo.mark_registered(&student.id).await?;

    if !marked {
        return Err(ApiError::not_found(format!(
            "Student not found: {}",
            student.id
        )));
    }

    Ok(Json(ActionResponse::ok("Student marked registered", student.id)))
}

/// GET /api/students/bulk-download-images returns a zip attachment of every
/// student photo that could be fetched; unreachable photos are skipped.
pub async fn bulk_download_images(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<impl IntoResponse> {
    let repo = StudentsRepository::new(Arc::clone(&state.db_pool));
    let photos = repo.get_photo_urls().await?;

    let archive = export::build_image_archive(&photos, state.image_fetcher.as_ref()).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"student_images.zip\"".to_string(),
        ),
    ];

    Ok((headers, archive.bytes))
}
