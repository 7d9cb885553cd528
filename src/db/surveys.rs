//! Survey submissions and their assessments

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use super::diesel_schema::{compass_data, survey_results};
use super::models::{new_id, CompassRecord, CompassRow, CompassSummary, NewCompass, NewSurveyResult};
use crate::error::GenmaveError;
use crate::scoring::ClarityAssessment;
use crate::survey::SurveyAnswers;

// ============================================================================
// Write Operations
// ============================================================================

/// Store an answer set and the assessment computed from it in one transaction
pub fn insert_submission(
    conn: &mut SqliteConnection,
    user_id: &str,
    answers: &SurveyAnswers,
    assessment: &ClarityAssessment,
    now: &str,
) -> Result<CompassRecord, GenmaveError> {
    let survey_id = new_id();
    let compass_id = new_id();
    let answers_json = serde_json::to_string(answers)?;

    conn.transaction::<_, GenmaveError, _>(|conn| {
        diesel::insert_into(survey_results::table)
            .values(&NewSurveyResult {
                id: &survey_id,
                user_id,
                answers: &answers_json,
                created_at: now,
            })
            .execute(conn)?;

        diesel::insert_into(compass_data::table)
            .values(&NewCompass {
                id: &compass_id,
                user_id,
                survey_id: &survey_id,
                clarity_score: i32::from(assessment.clarity_score),
                narrative_text: &assessment.narrative_text,
                energy_pattern: assessment.energy_pattern.as_str(),
                learning_style: assessment.learning_style.as_str(),
                recommended_skills: serde_json::to_string(&assessment.recommended_skills)?,
                growth_edges: serde_json::to_string(&assessment.growth_edges)?,
                created_at: now,
            })
            .execute(conn)?;

        Ok(())
    })?;

    Ok(CompassRecord {
        id: compass_id,
        survey_id,
        assessment: assessment.clone(),
        band: assessment.band(),
        created_at: now.to_string(),
    })
}

// ============================================================================
// Read Operations
// ============================================================================

/// Most recent assessment for a user
pub fn latest_compass(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<CompassRecord>, GenmaveError> {
    let row: Option<CompassRow> = compass_data::table
        .filter(compass_data::user_id.eq(user_id))
        .order(compass_data::created_at.desc())
        .then_order_by(sql::<BigInt>("rowid").desc())
        .select(CompassRow::as_select())
        .first(conn)
        .optional()?;

    row.map(CompassRecord::try_from).transpose()
}

/// Score history, newest first
pub fn compass_history(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<CompassSummary>, GenmaveError> {
    Ok(compass_data::table
        .filter(compass_data::user_id.eq(user_id))
        .order(compass_data::created_at.desc())
        .then_order_by(sql::<BigInt>("rowid").desc())
        .select((compass_data::id, compass_data::clarity_score, compass_data::created_at))
        .load(conn)?)
}

/// Raw answers behind an assessment, scoped to the owner
pub fn answers_for(
    conn: &mut SqliteConnection,
    user_id: &str,
    survey_id: &str,
) -> Result<Option<SurveyAnswers>, GenmaveError> {
    let row = survey_results::table
        .filter(survey_results::user_id.eq(user_id))
        .filter(survey_results::id.eq(survey_id))
        .select(super::models::SurveyResultRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|r| r.answers()).transpose()
}

pub fn count_surveys(conn: &mut SqliteConnection, user_id: &str) -> Result<i64, GenmaveError> {
    Ok(survey_results::table
        .filter(survey_results::user_id.eq(user_id))
        .count()
        .get_result(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::scoring::compute_assessment;
    use crate::survey::tests::full_answers;

    #[test]
    fn test_submission_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let answers = full_answers();
        let assessment = compute_assessment(&answers);

        db.with_conn(|conn| {
            let first = insert_submission(conn, "u1", &answers, &assessment, "2026-03-01T08:00:00Z")?;
            let second = insert_submission(conn, "u1", &answers, &assessment, "2026-03-01T08:00:00Z")?;
            insert_submission(conn, "u2", &answers, &assessment, "2026-03-02T08:00:00Z")?;

            let latest = latest_compass(conn, "u1")?.unwrap();
            assert_eq!(latest.id, second.id);
            assert_ne!(latest.id, first.id);
            assert_eq!(latest.assessment, assessment);

            let history = compass_history(conn, "u1")?;
            assert_eq!(history.len(), 2);
            assert_eq!(history[0].clarity_score, 47);

            assert_eq!(count_surveys(conn, "u1")?, 2);
            assert_eq!(answers_for(conn, "u1", &first.survey_id)?, Some(answers.clone()));
            assert_eq!(answers_for(conn, "u2", &first.survey_id)?, None);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_latest_for_new_user_is_none() {
        let db = Database::open_in_memory().unwrap();
        let latest = db.with_conn(|conn| latest_compass(conn, "nobody")).unwrap();
        assert!(latest.is_none());
    }
}
