//! Journal entry CRUD, owner-scoped

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use super::diesel_schema::journal_entries;
use super::models::{JournalEntry, NewJournalEntry};
use crate::error::GenmaveError;

// ============================================================================
// Read Operations
// ============================================================================

pub fn get(conn: &mut SqliteConnection, user_id: &str, id: &str) -> Result<Option<JournalEntry>, GenmaveError> {
    Ok(journal_entries::table
        .filter(journal_entries::user_id.eq(user_id))
        .filter(journal_entries::id.eq(id))
        .select(JournalEntry::as_select())
        .first(conn)
        .optional()?)
}

/// Newest first
pub fn list(conn: &mut SqliteConnection, user_id: &str, limit: i64) -> Result<Vec<JournalEntry>, GenmaveError> {
    Ok(journal_entries::table
        .filter(journal_entries::user_id.eq(user_id))
        .order(journal_entries::created_at.desc())
        .then_order_by(sql::<BigInt>("rowid").desc())
        .limit(limit)
        .select(JournalEntry::as_select())
        .load(conn)?)
}

/// Creation timestamps of every entry, for streaks and active days
pub fn timestamps(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<String>, GenmaveError> {
    Ok(journal_entries::table
        .filter(journal_entries::user_id.eq(user_id))
        .select(journal_entries::created_at)
        .load(conn)?)
}

pub fn count(conn: &mut SqliteConnection, user_id: &str) -> Result<i64, GenmaveError> {
    Ok(journal_entries::table
        .filter(journal_entries::user_id.eq(user_id))
        .count()
        .get_result(conn)?)
}

// ============================================================================
// Write Operations
// ============================================================================

pub fn create(
    conn: &mut SqliteConnection,
    id: &str,
    user_id: &str,
    content: &str,
    now: &str,
) -> Result<JournalEntry, GenmaveError> {
    diesel::insert_into(journal_entries::table)
        .values(&NewJournalEntry {
            id,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        })
        .execute(conn)?;

    Ok(JournalEntry {
        id: id.to_string(),
        user_id: user_id.to_string(),
        content: content.to_string(),
        created_at: now.to_string(),
        updated_at: now.to_string(),
    })
}

/// Replace the content; `None` if the entry does not belong to the user
pub fn update(
    conn: &mut SqliteConnection,
    user_id: &str,
    id: &str,
    content: &str,
    now: &str,
) -> Result<Option<JournalEntry>, GenmaveError> {
    let updated = diesel::update(
        journal_entries::table
            .filter(journal_entries::user_id.eq(user_id))
            .filter(journal_entries::id.eq(id)),
    )
    .set((
        journal_entries::content.eq(content),
        journal_entries::updated_at.eq(now),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Ok(None);
    }
    get(conn, user_id, id)
}

/// `true` if a row was deleted
pub fn delete(conn: &mut SqliteConnection, user_id: &str, id: &str) -> Result<bool, GenmaveError> {
    let deleted = diesel::delete(
        journal_entries::table
            .filter(journal_entries::user_id.eq(user_id))
            .filter(journal_entries::id.eq(id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_crud_is_owner_scoped() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            create(conn, "j1", "u1", "hari pertama", "2026-03-01T08:00:00Z")?;
            create(conn, "j2", "u1", "hari kedua", "2026-03-02T08:00:00Z")?;
            create(conn, "j3", "u2", "punya orang lain", "2026-03-02T09:00:00Z")?;

            let entries = list(conn, "u1", 20)?;
            assert_eq!(entries.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["j2", "j1"]);
            assert_eq!(list(conn, "u1", 1)?.len(), 1);

            assert!(update(conn, "u2", "j1", "hijack", "2026-03-03T00:00:00Z")?.is_none());
            let edited = update(conn, "u1", "j1", "diedit", "2026-03-03T00:00:00Z")?.unwrap();
            assert_eq!(edited.content, "diedit");
            assert_eq!(edited.created_at, "2026-03-01T08:00:00Z");

            assert!(!delete(conn, "u2", "j2")?);
            assert!(delete(conn, "u1", "j2")?);
            assert_eq!(count(conn, "u1")?, 1);
            assert_eq!(timestamps(conn, "u2")?, vec!["2026-03-02T09:00:00Z".to_string()]);
            Ok(())
        })
        .unwrap();
    }
}
