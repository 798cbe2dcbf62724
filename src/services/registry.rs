//! Student/registry synchronization and camera-triggered auto-registration.
//! Audit rows are best-effort: a failed `system_logs` write is logged and
//! never rolls back the primary write.

use crate::db::models::{NewPersonRecord, NewStudent, PersonRole, Student};
use crate::db::repositories::{
    persons::PersonsRepository, students::StudentsRepository, system_logs::SystemLogsRepository,
};
use crate::error::Error;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

/// Auto-registration payload produced by the detection pipeline when a face
/// is seen that matches no enrolled student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoRegistration {
    pub student_code: String,
    pub full_name: String,
    pub class_name: Option<String>,
    pub photo_url: Option<String>,
    pub detected_by_camera: Option<String>,
}

/// Outcome of a registry sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub synced: usize,
    pub failed: usize,
}

pub struct RegistryService {
    students: StudentsRepository,
    persons: PersonsRepository,
    logs: SystemLogsRepository,
}

impl RegistryService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            students: StudentsRepository::new(Arc::clone(&pool)),
            persons: PersonsRepository::new(Arc::clone(&pool)),
            logs: SystemLogsRepository::new(pool),
        }
    }

    /// Create a student from a camera detection, then write a best-effort
    /// audit row.
    pub async fn auto_register(&self, registration: &AutoRegistration, actor: &str) -> Result<Student> {
        if let Some(existing) = self.students.get_by_code(&registration.student_code).await? {
            return Err(Error::AlreadyExists(format!(
                "Student already exists: {}",
                existing.student_code
            ))
            .into());
        }

        let student = self
            .students
            .create(&NewStudent {
                student_code: registration.student_code.clone(),
                full_name: registration.full_name.clone(),
                class_name: registration.class_name.clone(),
                photo_url: registration.photo_url.clone(),
                guardian_name: None,
                guardian_phone: None,
            })
            .await?;

        info!("Auto-registered student {}", student.student_code);

        let detail = serde_json::json!({
            "student_code": student.student_code,
            "camera": registration.detected_by_camera,
        });
        if let Err(e) = self
            .logs
            .create("attendance", "auto_register", Some(actor), Some(detail))
            .await
        {
            warn!("Failed to write auto-register audit row: {}", e);
        }

        Ok(student)
    }

    /// Students that have no counterpart in `user_registry`
    pub async fn missing_from_registry(&self) -> Result<Vec<Student>> {
        self.students.get_missing_from_registry().await
    }

    /// Insert a registry row for every student missing one. A single failed
    /// insert is counted and skipped so one bad row cannot stall the sync.
    pub async fn sync_registry(&self, actor: &str) -> Result<SyncOutcome> {
        let missing = self.students.get_missing_from_registry().await?;

        let mut synced = 0usize;
        let mut failed = 0usize;

        for student in &missing {
            let entry = NewPersonRecord {
                person_code: student.student_code.clone(),
                full_name: student.full_name.clone(),
                class_name: student.class_name.clone(),
                role: PersonRole::Student,
                photo_url: student.photo_url.clone(),
            };
            match self.persons.create(&entry).await {
                Ok(_) => synced += 1,
                Err(e) => {
                    warn!("Failed to sync {} into registry: {}", student.student_code, e);
                    failed += 1;
                }
            }
        }

        info!("Registry sync complete: {} synced, {} failed", synced, failed);

        let detail = serde_json::json!({ "synced": synced, "failed": failed });
        if let Err(e) = self
            .logs
            .create("registry", "sync", Some(actor), Some(detail))
            .await
        {
            warn!("Failed to write registry sync audit row: {}", e);
        }

        Ok(SyncOutcome { synced, failed })
    }
}
