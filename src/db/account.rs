//! Account erasure

use diesel::prelude::*;
use serde::Serialize;
use ts_rs::TS;

use super::diesel_schema::{compass_data, journal_entries, skill_progress, survey_results, user_settings};
use crate::error::GenmaveError;

/// Rows removed per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct ErasureReport {
    pub compass_data: usize,
    pub survey_results: usize,
    pub skill_progress: usize,
    pub journal_entries: usize,
    pub user_settings: usize,
}

impl ErasureReport {
    pub fn total(&self) -> usize {
        self.compass_data + self.survey_results + self.skill_progress + self.journal_entries + self.user_settings
    }
}

/// Delete everything the user owns in one transaction
pub fn erase_user(conn: &mut SqliteConnection, user_id: &str) -> Result<ErasureReport, GenmaveError> {
    conn.immediate_transaction(|conn| {
        Ok(ErasureReport {
            compass_data: diesel::delete(compass_data::table.filter(compass_data::user_id.eq(user_id)))
                .execute(conn)?,
            survey_results: diesel::delete(survey_results::table.filter(survey_results::user_id.eq(user_id)))
                .execute(conn)?,
            skill_progress: diesel::delete(skill_progress::table.filter(skill_progress::user_id.eq(user_id)))
                .execute(conn)?,
            journal_entries: diesel::delete(journal_entries::table.filter(journal_entries::user_id.eq(user_id)))
                .execute(conn)?,
            user_settings: diesel::delete(user_settings::table.filter(user_settings::user_id.eq(user_id)))
                .execute(conn)?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeProgress;
    use crate::db::models::UserSettings;
    use crate::db::{journal_entries as journal, skill_progress as progress, surveys, user_settings as settings, Database};
    use crate::scoring::compute_assessment;
    use crate::survey::tests::full_answers;

    const NOW: &str = "2026-03-01T08:00:00Z";

    #[test]
    fn test_erase_only_touches_owner() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let answers = full_answers();
            let assessment = compute_assessment(&answers);
            for user in ["u1", "u2"] {
                surveys::insert_submission(conn, user, &answers, &assessment, NOW)?;
                let p = ChallengeProgress::start(format!("p-{}", user), user, "uiux-design", NOW)?;
                progress::start(conn, p, NOW)?;
                journal::create(conn, &format!("j-{}", user), user, "catatan", NOW)?;
                settings::upsert(conn, &UserSettings::defaults_for(user))?;
            }

            let report = erase_user(conn, "u1")?;
            assert_eq!(report.compass_data, 1);
            assert_eq!(report.survey_results, 1);
            assert_eq!(report.total(), 5);

            assert!(surveys::latest_compass(conn, "u1")?.is_none());
            assert!(surveys::latest_compass(conn, "u2")?.is_some());
            assert_eq!(journal::count(conn, "u2")?, 1);

            assert_eq!(erase_user(conn, "u1")?, ErasureReport::default());
            Ok(())
        })
        .unwrap();
    }
}
