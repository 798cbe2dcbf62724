use crate::{
    db::models::{CameraMetadata, RegisterCamera},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Camera metadata repository. The online flag and heartbeat are reported by
/// the device pipeline through the status endpoint.
#[derive(Clone)]
pub struct CamerasRepository {
    pool: Arc<PgPool>,
}

impl CamerasRepository {
    /// Create a new cameras repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Register a new camera
    pub async fn create(&self, camera: &RegisterCamera) -> Result<CameraMetadata> {
        info!("Registering camera: {}", camera.device_id);

        let result = sqlx::query_as::<_, CameraMetadata>(
            r#"
            INSERT INTO camera_metadata (
                id, device_id, display_name, location, rtsp_url,
                online, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING id, device_id, display_name, location, rtsp_url,
                      online, last_heartbeat_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&camera.device_id)
        .bind(&camera.display_name)
        .bind(&camera.location)
        .bind(&camera.rtsp_url)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to register camera: {}", e)))?;

        Ok(result)
    }

    /// Get camera by device ID
    pub async fn get_by_device_id(&self, device_id: &str) -> Result<Option<CameraMetadata>> {
        let result = sqlx::query_as::<_, CameraMetadata>(
            r#"
            SELECT id, device_id, display_name, location, rtsp_url,
                   online, last_heartbeat_at, created_at, updated_at
            FROM camera_metadata
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get camera by device ID: {}", e)))?;

        Ok(result)
    }

    /// Get all cameras
    pub async fn get_all(&self) -> Result<Vec<CameraMetadata>> {
        let result = sqlx::query_as::<_, CameraMetadata>(
            r#"
            SELECT id, device_id, display_name, location, rtsp_url,
                   online, last_heartbeat_at, created_at, updated_at
            FROM camera_metadata
            ORDER BY display_name
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get all cameras: {}", e)))?;

        Ok(result)
    }

    /// Set the online flag. Coming online also stamps the heartbeat; going
    /// offline leaves the last heartbeat in place.
    pub async fn set_status(&self, id: &Uuid, online: bool) -> Result<Option<CameraMetadata>> {
        let result = sqlx::query_as::<_, CameraMetadata>(
            r#"
            UPDATE camera_metadata
            SET online = $1,
                last_heartbeat_at = CASE WHEN $1 THEN $2 ELSE last_heartbeat_at END,
                updated_at = $2
            WHERE id = $3
            RETURNING id, device_id, display_name, location, rtsp_url,
                      online, last_heartbeat_at, created_at, updated_at
            "#,
        )
        .bind(online)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update camera status: {}", e)))?;

        Ok(result)
    }
}
