//! Database schema definitions

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use tracing::info;

use crate::error::GenmaveError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

#[derive(QueryableByName)]
struct VersionRow {
    #[diesel(sql_type = Integer)]
    version: i32,
}

/// Initialize the database schema
pub fn init_schema(conn: &mut SqliteConnection) -> Result<(), GenmaveError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new database schema v{}", SCHEMA_VERSION);
        conn.batch_execute(TABLES_SCHEMA)
            .map_err(|e| GenmaveError::Internal(format!("Failed to create tables: {}", e)))?;
        conn.batch_execute(INDEXES_SCHEMA)
            .map_err(|e| GenmaveError::Internal(format!("Failed to create indexes: {}", e)))?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(GenmaveError::Internal(format!(
            "Database schema v{} is newer than this build (v{})",
            current_version, SCHEMA_VERSION
        )));
    } else {
        info!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &mut SqliteConnection) -> Result<i32, GenmaveError> {
    conn.batch_execute("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .map_err(|e| GenmaveError::Internal(format!("Failed to create schema_version table: {}", e)))?;

    let row = diesel::sql_query("SELECT version FROM schema_version LIMIT 1")
        .get_result::<VersionRow>(conn)
        .optional()?;

    Ok(row.map(|r| r.version).unwrap_or(0))
}

fn set_schema_version(conn: &mut SqliteConnection, version: i32) -> Result<(), GenmaveError> {
    diesel::sql_query("DELETE FROM schema_version").execute(conn)?;
    diesel::sql_query("INSERT INTO schema_version (version) VALUES (?)")
        .bind::<Integer, _>(version)
        .execute(conn)?;
    Ok(())
}

const TABLES_SCHEMA: &str = r#"
-- Raw survey submissions, answers as JSON keyed by question id
CREATE TABLE IF NOT EXISTS survey_results (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    answers TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- One assessment per survey submission
CREATE TABLE IF NOT EXISTS compass_data (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    survey_id TEXT NOT NULL UNIQUE,
    clarity_score INTEGER NOT NULL CHECK (clarity_score BETWEEN 0 AND 100),
    narrative_text TEXT NOT NULL,
    energy_pattern TEXT NOT NULL,
    learning_style TEXT NOT NULL,
    recommended_skills TEXT NOT NULL DEFAULT '[]',
    growth_edges TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    FOREIGN KEY (survey_id) REFERENCES survey_results(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS skill_progress (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    skill_id TEXT NOT NULL,
    current_day INTEGER NOT NULL DEFAULT 1 CHECK (current_day BETWEEN 1 AND 7),
    completed_days TEXT NOT NULL DEFAULT '[]',
    reflections TEXT NOT NULL DEFAULT '{}',
    status TEXT NOT NULL DEFAULT 'active'
        CHECK (status IN ('active', 'completed', 'abandoned')),
    completed_at TEXT,
    survey_response TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS journal_entries (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_settings (
    user_id TEXT PRIMARY KEY NOT NULL,
    email_notifications INTEGER NOT NULL DEFAULT 1,
    reflection_reminders INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT NOT NULL
);
"#;

const INDEXES_SCHEMA: &str = r#"
CREATE INDEX IF NOT EXISTS idx_survey_results_user ON survey_results(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_compass_data_user ON compass_data(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_skill_progress_user ON skill_progress(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_journal_entries_user ON journal_entries(user_id, created_at);

-- At most one active challenge per user
CREATE UNIQUE INDEX IF NOT EXISTS idx_skill_progress_one_active
    ON skill_progress(user_id) WHERE status = 'active';
"#;
