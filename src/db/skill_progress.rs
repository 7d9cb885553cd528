//! Challenge progress records
//!
//! Mutations run as read-modify-write inside an immediate transaction so the
//! state machine in `crate::challenge` always sees the committed record.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use tracing::debug;

use super::diesel_schema::skill_progress;
use super::models::{SkillProgressChanges, SkillProgressRow};
use crate::challenge::{ChallengeProgress, ChallengeStatus};
use crate::error::GenmaveError;

/// Result of starting a track
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub started: ChallengeProgress,
    pub abandoned: Option<ChallengeProgress>,
}

// ============================================================================
// Read Operations
// ============================================================================

pub fn get(conn: &mut SqliteConnection, user_id: &str, id: &str) -> Result<Option<ChallengeProgress>, GenmaveError> {
    let row: Option<SkillProgressRow> = skill_progress::table
        .filter(skill_progress::user_id.eq(user_id))
        .filter(skill_progress::id.eq(id))
        .select(SkillProgressRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ChallengeProgress::try_from).transpose()
}

/// The user's single active record, if any
pub fn active_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<ChallengeProgress>, GenmaveError> {
    let row: Option<SkillProgressRow> = skill_progress::table
        .filter(skill_progress::user_id.eq(user_id))
        .filter(skill_progress::status.eq(ChallengeStatus::Active.as_str()))
        .select(SkillProgressRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ChallengeProgress::try_from).transpose()
}

/// All of a user's records, newest first
pub fn list_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<ChallengeProgress>, GenmaveError> {
    skill_progress::table
        .filter(skill_progress::user_id.eq(user_id))
        .order(skill_progress::created_at.desc())
        .then_order_by(sql::<BigInt>("rowid").desc())
        .select(SkillProgressRow::as_select())
        .load::<SkillProgressRow>(conn)?
        .into_iter()
        .map(ChallengeProgress::try_from)
        .collect()
}

pub fn count_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<i64, GenmaveError> {
    Ok(skill_progress::table
        .filter(skill_progress::user_id.eq(user_id))
        .count()
        .get_result(conn)?)
}

/// Number of different tracks the user has ever started
pub fn distinct_tracks(conn: &mut SqliteConnection, user_id: &str) -> Result<i64, GenmaveError> {
    Ok(skill_progress::table
        .filter(skill_progress::user_id.eq(user_id))
        .select(diesel::dsl::count_distinct(skill_progress::skill_id))
        .first(conn)?)
}

// ============================================================================
// Write Operations
// ============================================================================

fn insert(conn: &mut SqliteConnection, progress: &ChallengeProgress) -> Result<(), GenmaveError> {
    diesel::insert_into(skill_progress::table)
        .values(&SkillProgressChanges::from_progress(progress)?)
        .execute(conn)?;
    Ok(())
}

fn update(conn: &mut SqliteConnection, progress: &ChallengeProgress) -> Result<(), GenmaveError> {
    let changes = SkillProgressChanges::from_progress(progress)?;
    let updated = diesel::update(
        skill_progress::table
            .filter(skill_progress::id.eq(&progress.id))
            .filter(skill_progress::user_id.eq(&progress.user_id)),
    )
    .set(&changes)
    .execute(conn)?;

    if updated == 0 {
        return Err(GenmaveError::NotFound(format!("challenge progress {}", progress.id)));
    }
    Ok(())
}

/// Abandon the user's active record, if any, and insert `fresh`, atomically.
pub fn start(
    conn: &mut SqliteConnection,
    fresh: ChallengeProgress,
    now: &str,
) -> Result<StartOutcome, GenmaveError> {
    conn.immediate_transaction(|conn| {
        let abandoned = match active_for_user(conn, &fresh.user_id)? {
            Some(mut prior) => {
                prior.quit(now)?;
                update(conn, &prior)?;
                debug!(user_id = %fresh.user_id, id = %prior.id, "Abandoned prior active challenge");
                Some(prior)
            }
            None => None,
        };

        insert(conn, &fresh)?;
        Ok(StartOutcome {
            started: fresh,
            abandoned,
        })
    })
}

/// Load a record, apply `f` and persist the result if `f` succeeds.
///
/// Returns `Ok(None)` if the record does not exist for this user. A rejected
/// transition writes nothing.
pub fn modify<F, R>(
    conn: &mut SqliteConnection,
    user_id: &str,
    id: &str,
    f: F,
) -> Result<Option<(ChallengeProgress, R)>, GenmaveError>
where
    F: FnOnce(&mut ChallengeProgress) -> Result<R, GenmaveError>,
{
    conn.immediate_transaction(|conn| {
        let Some(mut progress) = get(conn, user_id, id)? else {
            return Ok(None);
        };
        let out = f(&mut progress)?;
        update(conn, &progress)?;
        Ok(Some((progress, out)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeError;
    use crate::db::Database;

    const NOW: &str = "2026-03-01T08:00:00Z";

    fn fresh(id: &str, track: &str) -> ChallengeProgress {
        ChallengeProgress::start(id.into(), "u1", track, NOW).unwrap()
    }

    #[test]
    fn test_start_abandons_prior_active() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            start(conn, fresh("p1", "uiux-design"), NOW)?;
            modify(conn, "u1", "p1", |p| Ok(p.complete_day(1, "hari pertama", NOW)?))?;

            let outcome = start(conn, fresh("p2", "web-development"), NOW)?;
            let abandoned = outcome.abandoned.unwrap();
            assert_eq!(abandoned.id, "p1");

            let p1 = get(conn, "u1", "p1")?.unwrap();
            assert_eq!(p1.status, ChallengeStatus::Abandoned);
            assert_eq!(p1.reflection(1), Some("hari pertama"));
            assert_eq!(p1.current_day, 2);

            let active: Vec<_> = list_for_user(conn, "u1")?
                .into_iter()
                .filter(|p| p.is_active())
                .collect();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].id, "p2");
            assert_eq!(distinct_tracks(conn, "u1")?, 2);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_second_active_row_is_rejected_by_index() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            insert(conn, &fresh("p1", "uiux-design"))?;
            assert!(insert(conn, &fresh("p2", "uiux-design")).is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_rejected_transition_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            start(conn, fresh("p1", "content-writing"), NOW)?;
            let err = modify(conn, "u1", "p1", |p| Ok(p.complete_day(1, "  ", NOW)?)).unwrap_err();
            assert!(matches!(err, GenmaveError::Challenge(ChallengeError::EmptyReflection)));

            let p1 = get(conn, "u1", "p1")?.unwrap();
            assert!(p1.completed_days.is_empty());
            assert_eq!(p1.current_day, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_records_are_scoped_by_user() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            start(conn, fresh("p1", "uiux-design"), NOW)?;
            assert!(get(conn, "u2", "p1")?.is_none());
            assert!(modify(conn, "u2", "p1", |p| Ok(p.quit(NOW)?))?.is_none());
            assert!(active_for_user(conn, "u1")?.is_some());
            Ok(())
        })
        .unwrap();
    }
}
