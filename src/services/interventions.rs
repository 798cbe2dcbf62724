//! Voice intervention broadcasting. The primary write is the intervention
//! log row; updating the referenced anomaly's intervention fields is a
//! best-effort second write.

use crate::db::models::{InterventionLog, VoiceBroadcast};
use crate::db::repositories::{
    anomalies::AnomaliesRepository, interventions::InterventionsRepository,
};
use crate::error::Error;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct InterventionService {
    interventions: InterventionsRepository,
    anomalies: AnomaliesRepository,
}

impl InterventionService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            interventions: InterventionsRepository::new(Arc::clone(&pool)),
            anomalies: AnomaliesRepository::new(pool),
        }
    }

    /// Broadcast a voice intervention to a speaker zone and log it. When the
    /// broadcast references an anomaly, its intervention counter is bumped
    /// best-effort after the log row is committed.
    pub async fn broadcast(
        &self,
        broadcast: &VoiceBroadcast,
        initiated_by: &Uuid,
    ) -> Result<InterventionLog> {
        if broadcast.speaker_zone.trim().is_empty() {
            return Err(Error::Validation("speaker_zone must not be empty".to_string()).into());
        }
        if broadcast.message.trim().is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()).into());
        }

        let log = self
            .interventions
            .create(
                broadcast.anomaly_id,
                &broadcast.speaker_zone,
                &broadcast.message,
                initiated_by,
            )
            .await?;

        info!(
            "Voice intervention broadcast to zone {} (log {})",
            log.speaker_zone, log.id
        );

        if let Some(anomaly_id) = broadcast.anomaly_id {
            if let Err(e) = self.anomalies.record_intervention(&anomaly_id).await {
                warn!(
                    "Failed to update intervention fields on anomaly {}: {}",
                    anomaly_id, e
                );
            }
        }

        Ok(log)
    }
}
