use anyhow::{Context, Result};
use sqlx::{Executor, PgPool};
use tracing::info;

/// Migration files embedded at build time and applied in order.
const MIGRATIONS: &[(&str, &str)] = &[
    ("001_types.sql", include_str!("sql/001_types.sql")),
    ("002_tables.sql", include_str!("sql/002_tables.sql")),
    ("003_indexes.sql", include_str!("sql/003_indexes.sql")),
    ("004_triggers.sql", include_str!("sql/004_triggers.sql")),
];

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (name, sql) in MIGRATIONS {
        pool.execute(*sql)
            .await
            .with_context(|| format!("failed to apply migration {}", name))?;
        info!("Applied migration: {}", name);
    }

    Ok(())
}
