use crate::config::ApiConfig;
use crate::error::Error;
use crate::security::SecurityService;
use crate::services::export::ImageFetcher;
use crate::services::movements::MovementFeed;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::Serialize;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

pub mod anomaly_controller;
pub mod attendance_controller;
pub mod camera_controller;
pub mod gate_controller;
pub mod intervention_controller;
pub mod leave_controller;
pub mod registry_controller;
pub mod student_controller;
pub mod visitor_controller;

/// Shared application state, built once in `main` and injected into every
/// handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub security: Arc<SecurityService>,
    pub movements: Arc<MovementFeed>,
    pub image_fetcher: Arc<dyn ImageFetcher>,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// JSON error envelope: `{"error": message}` with the mapped status code.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    pub status: u16,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError {
            error: message.into(),
            status: StatusCode::NOT_FOUND.as_u16(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyExists(_) => StatusCode::CONFLICT,
            Error::Validation(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            error: err.to_string(),
            status: status.as_u16(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.clone().into();
        }

        ApiError {
            error: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

/// Read envelope: `{"data": ..., "empty_state": "..."}`. The empty-state
/// string is present only when the result set is empty, so views render the
/// documented copy instead of an error.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

impl<T> DataBody<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            empty_state: None,
        }
    }
}

impl<T> DataBody<Vec<T>> {
    pub fn list(data: Vec<T>, empty_state: &'static str) -> Self {
        let empty_state = data.is_empty().then_some(empty_state);
        Self { data, empty_state }
    }
}

/// Mutation envelope: `{"success": bool, "message": ..., "data": ...}`
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn noop(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(config: &ApiConfig, state: AppState) -> Self {
        Self {
            config: config.clone(),
            state,
        }
    }

    pub fn router(state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .max_age(Duration::from_secs(3600));

        Router::new()
            .route("/api/health", get(health))
            // Anomaly routes
            .route(
                "/api/anomalies",
                get(anomaly_controller::list_anomalies).post(anomaly_controller::create_anomaly),
            )
            .route(
                "/api/anomalies/active",
                get(anomaly_controller::active_anomalies),
            )
            .route("/api/anomalies/:id", get(anomaly_controller::get_anomaly))
            .route(
                "/api/anomalies/:id/status",
                axum::routing::put(anomaly_controller::set_anomaly_status),
            )
            // Gate routes
            .route(
                "/api/gate",
                get(gate_controller::pending_requests).post(gate_controller::create_request),
            )
            .route("/api/gate/approve", post(gate_controller::approve_request))
            // Intervention routes
            .route(
                "/api/interventions",
                get(intervention_controller::list_broadcasts),
            )
            .route(
                "/api/interventions/voice/broadcast",
                post(intervention_controller::broadcast_voice),
            )
            // Leave routes
            .route(
                "/api/leave",
                get(leave_controller::list_requests).post(leave_controller::submit_request),
            )
            .route("/api/leave/decide", post(leave_controller::decide_request))
            // Attendance routes
            .route(
                "/api/attendance",
                post(attendance_controller::create_event),
            )
            .route(
                "/api/attendance/auto-register",
                post(attendance_controller::auto_register),
            )
            .route(
                "/api/attendance/movements",
                get(attendance_controller::movements),
            )
            // Student routes
            .route(
                "/api/students",
                get(student_controller::list_students)
                    .post(student_controller::create_student)
                    .put(student_controller::update_student)
                    .delete(student_controller::delete_student),
            )
            .route(
                "/api/students/sync-registry",
                get(student_controller::sync_registry_report)
                    .post(student_controller::sync_registry),
            )
            .route(
                "/api/students/unregistered",
                get(student_controller::unregistered_students)
                    .post(student_controller::mark_registered),
            )
            .route(
                "/api/students/bulk-download-images",
                get(student_controller::bulk_download_images),
            )
            // Registry routes
            .route(
                "/api/registry/overview",
                get(registry_controller::overview),
            )
            // Camera routes
            .route(
                "/api/cameras",
                get(camera_controller::list_cameras).post(camera_controller::register_camera),
            )
            .route(
                "/api/cameras/:id/status",
                axum::routing::put(camera_controller::set_camera_status),
            )
            // Visitor routes
            .route(
                "/api/visitors",
                get(visitor_controller::list_visitors).post(visitor_controller::register_visitor),
            )
            .route(
                "/api/visitors/:id/status",
                axum::routing::put(visitor_controller::set_visitor_status),
            )
            .with_state(state)
            .layer(cors)
    }

    pub async fn run(&self) -> Result<()> {
        let app = Self::router(self.state.clone());

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    database: bool,
}

/// Liveness plus a database round-trip; unauthenticated.
async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    let database = crate::db::health_check(&state.db_pool).await;

    Json(HealthBody {
        status: "ok",
        database,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_expected_status_codes() {
        let cases = [
            (Error::Authentication("no session".into()), 401),
            (Error::Authorization("forbidden".into()), 403),
            (Error::NotFound("missing".into()), 404),
            (Error::AlreadyExists("dup".into()), 409),
            (Error::Validation("bad".into()), 400),
            (Error::Database("down".into()), 500),
            (Error::Export("fetch".into()), 500),
        ];

        for (err, expected) in cases {
            let api_err: ApiError = err.into();
            assert_eq!(api_err.status, expected);
        }
    }

    #[test]
    fn anyhow_wrapped_error_keeps_its_status() {
        let err: anyhow::Error = Error::NotFound("camera".into()).into();
        let api_err: ApiError = err.into();
        assert_eq!(api_err.status, 404);
    }

    #[test]
    fn error_body_serializes_to_error_field_only() {
        let api_err = ApiError {
            error: "boom".to_string(),
            status: 500,
        };
        let body = serde_json::to_value(&api_err).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn data_body_carries_empty_state_only_when_empty() {
        let empty: DataBody<Vec<u8>> = DataBody::list(vec![], "No requests found");
        assert_eq!(empty.empty_state, Some("No requests found"));

        let full = DataBody::list(vec![1u8], "No requests found");
        assert_eq!(full.empty_state, None);
    }
}
