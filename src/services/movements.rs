//! Movement feed with event-driven cache invalidation. A Postgres LISTEN
//! task marks the cached snapshot dirty on every attendance notification;
//! readers refetch on demand instead of reloading on every event, so
//! redundant or out-of-order notifications cost at most one extra fetch.

use crate::db::models::AttendanceEvent;
use crate::db::repositories::attendance::AttendanceRepository;
use anyhow::Result;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

const ATTENDANCE_CHANNEL: &str = "attendance_changed";

pub struct MovementFeed {
    repository: AttendanceRepository,
    cache: RwLock<Vec<AttendanceEvent>>,
    dirty: AtomicBool,
    limit: i64,
}

impl MovementFeed {
    pub fn new(pool: Arc<PgPool>, limit: i64) -> Self {
        Self {
            repository: AttendanceRepository::new(pool),
            cache: RwLock::new(Vec::new()),
            // First read always fetches
            dirty: AtomicBool::new(true),
            limit,
        }
    }

    /// Mark the cached snapshot stale; the next `snapshot` call refetches.
    pub fn invalidate(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Current movement snapshot, refetched only when an invalidation has
    /// arrived since the last fetch.
    pub async fn snapshot(&self) -> Result<Vec<AttendanceEvent>> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(self.cache.read().await.clone());
        }

        match self.repository.get_recent(Some(self.limit)).await {
            Ok(events) => {
                let mut cache = self.cache.write().await;
                *cache = events.clone();
                Ok(events)
            }
            Err(e) => {
                // Leave the feed dirty so the next reader retries the fetch
                self.dirty.store(true, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Subscribe to attendance notifications and run the invalidation loop
    /// until the connection drops.
    pub async fn run_listener(self: Arc<Self>, pool: Arc<PgPool>) -> Result<()> {
        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(ATTENDANCE_CHANNEL).await?;

        info!("Movement feed listening on {}", ATTENDANCE_CHANNEL);

        loop {
            match listener.recv().await {
                Ok(notification) => {
                    debug!("Attendance change notification: {}", notification.payload());
                    self.invalidate();
                }
                Err(e) => {
                    error!("Movement feed listener error: {}", e);
                    // Anything missed while disconnected shows up on refetch
                    self.invalidate();
                    return Err(e.into());
                }
            }
        }
    }
}
