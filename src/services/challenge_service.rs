//! Challenge service - track catalog, starting tracks and day progress
//!
//! All transitions go through `ChallengeProgress`; this layer only loads the
//! record, applies the transition inside a transaction and emits events.

use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use crate::challenge::{
    self, track_status, ActivityTrack, ChallengeFeedback, ChallengeProgress, DayStatus, TrackStatus,
};
use crate::db::models::{current_timestamp, new_id};
use crate::db::{skill_progress, Database};
use crate::error::GenmaveError;

use super::events::{EventBus, GenmaveEvent};

/// One track on the pathway overview
#[derive(Debug, Clone, Serialize)]
pub struct TrackOverview {
    #[serde(flatten)]
    pub track: &'static ActivityTrack,
    pub status: TrackStatus,
}

/// One track with the user's most relevant record on it
#[derive(Debug, Clone, Serialize)]
pub struct TrackDetail {
    #[serde(flatten)]
    pub overview: TrackOverview,
    pub progress: Option<ProgressView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct DayStatusView {
    pub day: u8,
    pub status: DayStatus,
}

/// A progress record plus everything derived from it for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: ChallengeProgress,
    pub track_name: String,
    pub days: Vec<DayStatusView>,
    pub awaiting_feedback: bool,
    pub completion_percent: u8,
}

impl From<ChallengeProgress> for ProgressView {
    fn from(progress: ChallengeProgress) -> Self {
        let days = progress
            .day_statuses()
            .into_iter()
            .map(|(day, status)| DayStatusView { day, status })
            .collect();
        Self {
            track_name: progress.track().map(|t| t.name).unwrap_or_default().to_string(),
            awaiting_feedback: progress.awaiting_feedback(),
            completion_percent: progress.completion_percent(),
            days,
            progress,
        }
    }
}

pub struct ChallengeService {
    db: Arc<Database>,
    events: Arc<EventBus>,
}

impl ChallengeService {
    pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
        Self { db, events }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Every track with the user's status on it
    pub fn catalog(&self, user_id: &str) -> Result<Vec<TrackOverview>, GenmaveError> {
        let records = self.db.with_conn(|conn| skill_progress::list_for_user(conn, user_id))?;
        Ok(challenge::tracks()
            .iter()
            .map(|track| TrackOverview {
                track,
                status: track_status(track.id, &records),
            })
            .collect())
    }

    /// A track with the user's active record on it, else the newest one
    pub fn track_detail(&self, user_id: &str, track_id: &str) -> Result<TrackDetail, GenmaveError> {
        let track = challenge::track(track_id)
            .ok_or_else(|| GenmaveError::NotFound(format!("track {}", track_id)))?;
        let records = self.db.with_conn(|conn| skill_progress::list_for_user(conn, user_id))?;

        let on_track = records.iter().filter(|r| r.skill_id == track_id);
        let progress = on_track
            .clone()
            .find(|r| r.is_active())
            .or_else(|| on_track.clone().next())
            .cloned()
            .map(ProgressView::from);

        Ok(TrackDetail {
            overview: TrackOverview {
                track,
                status: track_status(track_id, &records),
            },
            progress,
        })
    }

    pub fn active(&self, user_id: &str) -> Result<Option<ProgressView>, GenmaveError> {
        let active = self.db.with_conn(|conn| skill_progress::active_for_user(conn, user_id))?;
        Ok(active.map(ProgressView::from))
    }

    pub fn history(&self, user_id: &str) -> Result<Vec<ChallengeProgress>, GenmaveError> {
        self.db.with_conn(|conn| skill_progress::list_for_user(conn, user_id))
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Start a track, abandoning whatever the user had active
    pub fn start(&self, user_id: &str, track_id: &str) -> Result<ProgressView, GenmaveError> {
        let now = current_timestamp();
        let fresh = ChallengeProgress::start(new_id(), user_id, track_id, &now)?;
        let outcome = self.db.with_conn(|conn| skill_progress::start(conn, fresh, &now))?;

        if let Some(prior) = &outcome.abandoned {
            self.emit_abandoned(prior);
        }
        self.events.emit(GenmaveEvent::ChallengeStarted {
            user_id: user_id.to_string(),
            id: outcome.started.id.clone(),
            skill_id: outcome.started.skill_id.clone(),
        });

        Ok(outcome.started.into())
    }

    pub fn complete_day(
        &self,
        user_id: &str,
        progress_id: &str,
        day: u8,
        reflection: &str,
    ) -> Result<ProgressView, GenmaveError> {
        let now = current_timestamp();
        let (progress, _) = self.modify(user_id, progress_id, |p| Ok(p.complete_day(day, reflection, &now)?))?;

        self.events.emit(GenmaveEvent::ChallengeDayCompleted {
            user_id: user_id.to_string(),
            id: progress.id.clone(),
            day,
        });
        Ok(progress.into())
    }

    pub fn save_reflection(
        &self,
        user_id: &str,
        progress_id: &str,
        day: u8,
        reflection: &str,
    ) -> Result<ProgressView, GenmaveError> {
        let now = current_timestamp();
        let (progress, _) = self.modify(user_id, progress_id, |p| Ok(p.save_reflection(day, reflection, &now)?))?;
        Ok(progress.into())
    }

    pub fn submit_feedback(
        &self,
        user_id: &str,
        progress_id: &str,
        feedback: ChallengeFeedback,
    ) -> Result<ProgressView, GenmaveError> {
        let now = current_timestamp();
        let (progress, _) = self.modify(user_id, progress_id, |p| Ok(p.submit_feedback(feedback, &now)?))?;

        self.events.emit(GenmaveEvent::ChallengeCompleted {
            user_id: user_id.to_string(),
            id: progress.id.clone(),
            skill_id: progress.skill_id.clone(),
            feedback: feedback.as_str().to_string(),
        });
        Ok(progress.into())
    }

    pub fn quit(&self, user_id: &str, progress_id: &str) -> Result<ProgressView, GenmaveError> {
        let now = current_timestamp();
        let (progress, _) = self.modify(user_id, progress_id, |p| Ok(p.quit(&now)?))?;
        self.emit_abandoned(&progress);
        Ok(progress.into())
    }

    fn modify<F, R>(&self, user_id: &str, progress_id: &str, f: F) -> Result<(ChallengeProgress, R), GenmaveError>
    where
        F: FnOnce(&mut ChallengeProgress) -> Result<R, GenmaveError>,
    {
        self.db
            .with_conn(|conn| skill_progress::modify(conn, user_id, progress_id, f))?
            .ok_or_else(|| GenmaveError::NotFound(format!("challenge progress {}", progress_id)))
    }

    fn emit_abandoned(&self, progress: &ChallengeProgress) {
        self.events.emit(GenmaveEvent::ChallengeAbandoned {
            user_id: progress.user_id.clone(),
            id: progress.id.clone(),
            skill_id: progress.skill_id.clone(),
            current_day: progress.current_day,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{ChallengeError, ChallengeStatus};

    fn service() -> ChallengeService {
        let db = Arc::new(Database::open_in_memory().unwrap());
        ChallengeService::new(db, Arc::new(EventBus::new()))
    }

    #[test]
    fn test_full_run_to_feedback() {
        let svc = service();
        let started = svc.start("u1", "web-development").unwrap();
        let id = started.progress.id.clone();
        assert_eq!(started.track_name, "Web Development");
        assert_eq!(started.days[0].status, DayStatus::Active);

        for day in 1..=7 {
            svc.complete_day("u1", &id, day, "belajar hal baru").unwrap();
        }
        let view = svc.active("u1").unwrap().unwrap();
        assert!(view.awaiting_feedback);
        assert_eq!(view.completion_percent, 100);

        let done = svc.submit_feedback("u1", &id, ChallengeFeedback::LoveIt).unwrap();
        assert_eq!(done.progress.status, ChallengeStatus::Completed);
        assert!(svc.active("u1").unwrap().is_none());

        let err = svc.complete_day("u1", &id, 7, "lagi").unwrap_err();
        assert!(matches!(err, GenmaveError::Challenge(ChallengeError::NotActive(ChallengeStatus::Completed))));

        let catalog = svc.catalog("u1").unwrap();
        let status_of = |id: &str| catalog.iter().find(|t| t.track.id == id).unwrap().status;
        assert_eq!(status_of("web-development"), TrackStatus::Completed);
        assert_eq!(status_of("uiux-design"), TrackStatus::Available);
    }

    #[test]
    fn test_switching_tracks_abandons() {
        let svc = service();
        let first = svc.start("u1", "uiux-design").unwrap();
        svc.complete_day("u1", &first.progress.id, 1, "sketch pertama").unwrap();
        svc.start("u1", "content-writing").unwrap();

        let detail = svc.track_detail("u1", "uiux-design").unwrap();
        let old = detail.progress.unwrap();
        assert_eq!(old.progress.status, ChallengeStatus::Abandoned);
        assert_eq!(old.progress.reflection(1), Some("sketch pertama"));
        assert_eq!(detail.overview.status, TrackStatus::Available);

        let active = svc.active("u1").unwrap().unwrap();
        assert_eq!(active.progress.skill_id, "content-writing");
    }

    #[test]
    fn test_unknown_records_and_tracks() {
        let svc = service();
        assert!(matches!(svc.quit("u1", "missing"), Err(GenmaveError::NotFound(_))));
        assert!(matches!(svc.track_detail("u1", "juggling"), Err(GenmaveError::NotFound(_))));
        assert!(matches!(
            svc.start("u1", "juggling"),
            Err(GenmaveError::Challenge(ChallengeError::UnknownTrack(_)))
        ));
    }

    #[test]
    fn test_other_users_record_is_not_found() {
        let svc = service();
        let started = svc.start("u1", "uiux-design").unwrap();
        assert!(matches!(
            svc.complete_day("u2", &started.progress.id, 1, "bukan punyaku"),
            Err(GenmaveError::NotFound(_))
        ));
    }
}
