use crate::api::rest::{ActionResponse, ApiResult, AppState, DataBody};
use crate::db::models::{
    AttendanceEvent, AttendanceEventType, NewAttendanceEvent, PresenceStatus, Student,
};
use crate::db::repositories::attendance::AttendanceRepository;
use crate::db::repositories::persons::PersonsRepository;
use crate::security::Claims;
use crate::services::insights::{self, EmptyState};
use crate::services::registry::{AutoRegistration, RegistryService};
use axum::{extract::State, http::StatusCode, Json};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// POST /api/attendance/auto-register
pub async fn auto_register(
    State(state): State<AppState>,
    claims: Claims,
    Json(registration): Json<AutoRegistration>,
) -> ApiResult<(StatusCode, Json<ActionResponse<Student>>)> {
    let service = RegistryService::new(Arc::clone(&state.db_pool));
    let student = service.auto_register(&registration, &claims.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Student auto-registered", student)),
    ))
}

/// Movements page payload: the raw events plus the per-location occupancy
/// grouping the view renders.
#[derive(Debug, Serialize)]
pub struct MovementsBody {
    pub events: Vec<AttendanceEvent>,
    pub occupancy: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

/// GET /api/attendance/movements, served from the invalidation-driven feed
pub async fn movements(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<MovementsBody>>> {
    let events = state.movements.snapshot().await?;
    let occupancy = insights::occupancy_by_location(&events);

    let body = MovementsBody {
        empty_state: events
            .is_empty()
            .then(|| insights::empty_state(EmptyState::Movements)),
        occupancy,
        events,
    };

    Ok(Json(DataBody::new(body)))
}

/// POST /api/attendance for manual event entry. Entry/exit events also move
/// the person's registry presence; that follow-up write is best-effort and
/// never undoes the recorded event.
pub async fn create_event(
    State(state): State<AppState>,
    _claims: Claims,
    Json(event): Json<NewAttendanceEvent>,
) -> ApiResult<(StatusCode, Json<DataBody<AttendanceEvent>>)> {
    let repo = AttendanceRepository::new(Arc::clone(&state.db_pool));
    let created = repo.create(&event).await?;

    if let Some(person_id) = created.person_id {
        let presence = match created.event_type {
            AttendanceEventType::Entry => Some(PresenceStatus::OnCampus),
            AttendanceEventType::Exit => Some(PresenceStatus::OffCampus),
            AttendanceEventType::Period => None,
        };
        if let Some(presence) = presence {
            let persons = PersonsRepository::new(Arc::clone(&state.db_pool));
            if let Err(e) = persons.update_presence(&person_id, presence).await {
                warn!("Failed to update presence for {}: {}", person_id, e);
            }
        }
    }

    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}
