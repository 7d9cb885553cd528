//! Profile service - settings, stats, dashboard and account erasure

use std::sync::Arc;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::db::account::{self, ErasureReport};
use crate::db::models::{current_timestamp, CompassRecord, CompassSummary, UserSettings};
use crate::db::{journal_entries, skill_progress, surveys, user_settings, Database};
use crate::drafts::DraftStore;
use crate::error::GenmaveError;
use crate::journal;

use super::challenge_service::ProgressView;
use super::events::{EventBus, GenmaveEvent};
use super::journal_service::StreakInfo;

/// Partial settings update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct SettingsPatch {
    #[serde(default)]
    pub email_notifications: Option<bool>,
    #[serde(default)]
    pub reflection_reminders: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct ProfileStats {
    #[ts(type = "number")]
    pub surveys_taken: i64,
    #[ts(type = "number")]
    pub journal_entries: i64,
    #[ts(type = "number")]
    pub tracks_explored: i64,
    pub days_active: u32,
    pub compass_history: Vec<CompassSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct DashboardCounts {
    #[ts(type = "number")]
    pub surveys: i64,
    #[ts(type = "number")]
    pub journal_entries: i64,
    #[ts(type = "number")]
    pub challenges: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct Dashboard {
    pub latest_compass: Option<CompassRecord>,
    pub streak: StreakInfo,
    pub active_challenge: Option<ProgressView>,
    pub counts: DashboardCounts,
}

pub struct ProfileService {
    db: Arc<Database>,
    events: Arc<EventBus>,
    drafts: Arc<DraftStore>,
    offset: FixedOffset,
}

impl ProfileService {
    pub fn new(db: Arc<Database>, events: Arc<EventBus>, drafts: Arc<DraftStore>, offset: FixedOffset) -> Self {
        Self {
            db,
            events,
            drafts,
            offset,
        }
    }

    pub fn settings(&self, user_id: &str) -> Result<UserSettings, GenmaveError> {
        self.db.with_conn(|conn| user_settings::get_or_default(conn, user_id))
    }

    pub fn update_settings(&self, user_id: &str, patch: SettingsPatch) -> Result<UserSettings, GenmaveError> {
        let settings = self.db.with_conn(|conn| {
            let mut settings = user_settings::get_or_default(conn, user_id)?;
            if let Some(v) = patch.email_notifications {
                settings.email_notifications = v;
            }
            if let Some(v) = patch.reflection_reminders {
                settings.reflection_reminders = v;
            }
            settings.updated_at = current_timestamp();
            user_settings::upsert(conn, &settings)?;
            Ok(settings)
        })?;

        self.events.emit(GenmaveEvent::SettingsUpdated {
            user_id: user_id.to_string(),
        });
        Ok(settings)
    }

    pub fn stats(&self, user_id: &str) -> Result<ProfileStats, GenmaveError> {
        self.db.with_conn(|conn| {
            let timestamps = journal_entries::timestamps(conn, user_id)?;
            let days_active = journal::days_active(timestamps.iter().map(String::as_str), self.offset);
            Ok(ProfileStats {
                surveys_taken: surveys::count_surveys(conn, user_id)?,
                journal_entries: timestamps.len() as i64,
                tracks_explored: skill_progress::distinct_tracks(conn, user_id)?,
                days_active: u32::try_from(days_active).unwrap_or(u32::MAX),
                compass_history: surveys::compass_history(conn, user_id)?,
            })
        })
    }

    pub fn dashboard(&self, user_id: &str) -> Result<Dashboard, GenmaveError> {
        self.db.with_conn(|conn| {
            let timestamps = journal_entries::timestamps(conn, user_id)?;
            let today = journal::today(self.offset);
            let streak = journal::journal_streak(timestamps.iter().map(String::as_str), today, self.offset);
            let days_active = journal::days_active(timestamps.iter().map(String::as_str), self.offset);

            Ok(Dashboard {
                latest_compass: surveys::latest_compass(conn, user_id)?,
                streak: StreakInfo {
                    streak,
                    message: journal::streak_message(streak),
                    days_active: u32::try_from(days_active).unwrap_or(u32::MAX),
                },
                active_challenge: skill_progress::active_for_user(conn, user_id)?.map(ProgressView::from),
                counts: DashboardCounts {
                    surveys: surveys::count_surveys(conn, user_id)?,
                    journal_entries: timestamps.len() as i64,
                    challenges: skill_progress::count_for_user(conn, user_id)?,
                },
            })
        })
    }

    /// Delete every row the user owns, then their drafts
    pub fn erase_account(&self, user_id: &str) -> Result<ErasureReport, GenmaveError> {
        let report = self.db.with_conn(|conn| account::erase_user(conn, user_id))?;
        self.drafts.clear_user(user_id);

        self.events.emit(GenmaveEvent::AccountErased {
            user_id: user_id.to_string(),
            rows: report.total(),
        });
        Ok(report)
    }
}
