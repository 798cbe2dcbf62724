use crate::api::rest::{ApiResult, AppState, DataBody};
use crate::db::models::{PersonRecord, PersonRole};
use crate::db::repositories::attendance::AttendanceRepository;
use crate::db::repositories::persons::PersonsRepository;
use crate::security::Claims;
use crate::services::insights::{self, AbsenteeismRecord, PresenceCounts};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Attendance window the absenteeism figures cover
const ABSENTEEISM_WINDOW_DAYS: u32 = 30;

/// Dashboard header payload: everyone in the registry, the presence tallies
/// the cards show, and the chronic-absentee list for the window.
#[derive(Debug, Serialize)]
pub struct RegistryOverview {
    pub persons: Vec<PersonRecord>,
    pub presence: PresenceCounts,
    pub chronic_absentees: Vec<AbsenteeismRecord>,
}

/// GET /api/registry/overview
pub async fn overview(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DataBody<RegistryOverview>>> {
    let repo = PersonsRepository::new(Arc::clone(&state.db_pool));
    let persons = repo.get_all_active().await?;

    let presence = insights::presence_counts(&persons);

    let attendance = AttendanceRepository::new(Arc::clone(&state.db_pool));
    let window_end = Utc::now();
    let window_start = window_end - Duration::days(ABSENTEEISM_WINDOW_DAYS as i64);

    let mut records = Vec::new();
    for person in persons.iter().filter(|p| p.role == PersonRole::Student) {
        let events = attendance
            .get_by_person(&person.id, window_start, window_end)
            .await?;
        records.push(insights::absenteeism_record(
            person,
            &events,
            ABSENTEEISM_WINDOW_DAYS,
        ));
    }
    let chronic_absentees = insights::chronic_absentees(&records);

    Ok(Json(DataBody::new(RegistryOverview {
        persons,
        presence,
        chronic_absentees,
    })))
}
