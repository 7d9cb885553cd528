//! Platform-wide aggregates for the admin dashboard

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable};
use serde::Serialize;
use ts_rs::TS;

use super::diesel_schema::{journal_entries, skill_progress, survey_results};
use crate::challenge::track;
use crate::error::GenmaveError;

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

#[derive(QueryableByName)]
struct AvgRow {
    #[diesel(sql_type = Nullable<Double>)]
    avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct SkillCount {
    pub skill_id: String,
    pub name: String,
    #[ts(type = "number")]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct AdminMetrics {
    pub window_days: u32,
    /// Distinct users seen in any table
    #[ts(type = "number")]
    pub total_users: i64,
    /// Distinct users with at least one survey
    #[ts(type = "number")]
    pub total_respondents: i64,
    /// Distinct journal authors inside the window
    #[ts(type = "number")]
    pub active_users: i64,
    /// Respondents as a percentage of all users
    pub completion_rate: f64,
    pub avg_clarity_score: f64,
    #[ts(type = "number")]
    pub total_journal_entries: i64,
    /// Journal entries per respondent
    pub avg_entries_per_user: f64,
    pub skill_breakdown: Vec<SkillCount>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn ratio(num: i64, den: i64) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

/// Aggregate across all users; `since` is the window start timestamp
pub fn platform_metrics(
    conn: &mut SqliteConnection,
    window_days: u32,
    since: &str,
) -> Result<AdminMetrics, GenmaveError> {
    let total_users = diesel::sql_query(
        r#"
        SELECT COUNT(*) AS n FROM (
            SELECT user_id FROM survey_results
            UNION SELECT user_id FROM journal_entries
            UNION SELECT user_id FROM skill_progress
            UNION SELECT user_id FROM user_settings
        )
        "#,
    )
    .get_result::<CountRow>(conn)?
    .n;

    let total_respondents: i64 = survey_results::table
        .select(diesel::dsl::count_distinct(survey_results::user_id))
        .first(conn)?;

    let active_users: i64 = journal_entries::table
        .filter(journal_entries::created_at.ge(since))
        .select(diesel::dsl::count_distinct(journal_entries::user_id))
        .first(conn)?;

    let avg_clarity = diesel::sql_query("SELECT AVG(clarity_score) AS avg FROM compass_data")
        .get_result::<AvgRow>(conn)?
        .avg
        .unwrap_or(0.0);

    let total_journal_entries: i64 = journal_entries::table.count().get_result(conn)?;

    let skill_breakdown = skill_progress::table
        .group_by(skill_progress::skill_id)
        .select((skill_progress::skill_id, diesel::dsl::count_star()))
        .order(skill_progress::skill_id.asc())
        .load::<(String, i64)>(conn)?
        .into_iter()
        .map(|(skill_id, count)| SkillCount {
            name: track(&skill_id).map(|t| t.name.to_string()).unwrap_or_else(|| skill_id.clone()),
            skill_id,
            count,
        })
        .collect();

    Ok(AdminMetrics {
        window_days,
        total_users,
        total_respondents,
        active_users,
        completion_rate: round1(ratio(total_respondents, total_users) * 100.0),
        avg_clarity_score: round1(avg_clarity),
        total_journal_entries,
        avg_entries_per_user: round1(ratio(total_journal_entries, total_respondents)),
        skill_breakdown,
    })
}
