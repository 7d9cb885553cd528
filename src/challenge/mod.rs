//! 7-day challenge tracks and the per-user progress state machine
//!
//! A `ChallengeProgress` is `active` from the moment a track is started until
//! it is either quit (`abandoned`) or finished and rated (`completed`). Both
//! end states are final. Finishing day 7 does not end the record by itself;
//! the record then waits for a `ChallengeFeedback` token.
//!
//! Every transition checks all of its preconditions before touching a field,
//! so a rejected call leaves the record exactly as it was.

pub mod catalog;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

pub use catalog::{track, tracks, ActivityTrack, DayTask, DAYS_PER_TRACK};

pub const FIRST_DAY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Abandoned,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::Abandoned => "abandoned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ChallengeStatus::Active),
            "completed" => Some(ChallengeStatus::Completed),
            "abandoned" => Some(ChallengeStatus::Abandoned),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal rating given after day 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum ChallengeFeedback {
    LoveIt,
    LikeIt,
    NotForMe,
}

impl ChallengeFeedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeFeedback::LoveIt => "love-it",
            ChallengeFeedback::LikeIt => "like-it",
            ChallengeFeedback::NotForMe => "not-for-me",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "love-it" => Some(ChallengeFeedback::LoveIt),
            "like-it" => Some(ChallengeFeedback::LikeIt),
            "not-for-me" => Some(ChallengeFeedback::NotForMe),
            _ => None,
        }
    }
}

/// Display state of one day, derived and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum DayStatus {
    Completed,
    Active,
    Available,
    Locked,
}

/// Status of a whole track on the pathway overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum TrackStatus {
    Active,
    Completed,
    Available,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("challenge is {0}, not active")]
    NotActive(ChallengeStatus),

    #[error("day {0} is outside 1..=7")]
    DayOutOfRange(u8),

    #[error("day {day} is not the current day ({current})")]
    NotCurrentDay { day: u8, current: u8 },

    #[error("day {0} is already completed")]
    DayAlreadyCompleted(u8),

    #[error("day {0} is locked")]
    DayLocked(u8),

    #[error("reflection text is empty")]
    EmptyReflection,

    #[error("feedback is only accepted after day 7 is completed")]
    FeedbackNotDue,

    #[error("unknown track: {0}")]
    UnknownTrack(String),
}

/// Outcome of completing a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct DayCompletion {
    pub day: u8,
    pub current_day: u8,
    pub awaiting_feedback: bool,
}

/// One user's run through one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct ChallengeProgress {
    pub id: String,
    pub user_id: String,
    pub skill_id: String,
    pub current_day: u8,
    pub completed_days: BTreeSet<u8>,
    /// Keyed `day{N}`
    pub reflections: BTreeMap<String, String>,
    pub status: ChallengeStatus,
    pub completed_at: Option<String>,
    pub survey_response: Option<ChallengeFeedback>,
    pub created_at: String,
    pub updated_at: String,
}

pub fn reflection_key(day: u8) -> String {
    format!("day{}", day)
}

impl ChallengeProgress {
    /// Fresh active record on day 1
    pub fn start(id: String, user_id: &str, track_id: &str, now: &str) -> Result<Self, ChallengeError> {
        if track(track_id).is_none() {
            return Err(ChallengeError::UnknownTrack(track_id.to_string()));
        }
        Ok(Self {
            id,
            user_id: user_id.to_string(),
            skill_id: track_id.to_string(),
            current_day: FIRST_DAY,
            completed_days: BTreeSet::new(),
            reflections: BTreeMap::new(),
            status: ChallengeStatus::Active,
            completed_at: None,
            survey_response: None,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    pub fn track(&self) -> Option<&'static ActivityTrack> {
        track(&self.skill_id)
    }

    pub fn reflection(&self, day: u8) -> Option<&str> {
        self.reflections.get(&reflection_key(day)).map(String::as_str)
    }

    pub fn day_status(&self, day: u8) -> DayStatus {
        if self.completed_days.contains(&day) {
            DayStatus::Completed
        } else if day == self.current_day {
            DayStatus::Active
        } else if day < self.current_day {
            DayStatus::Available
        } else {
            DayStatus::Locked
        }
    }

    pub fn day_statuses(&self) -> Vec<(u8, DayStatus)> {
        (FIRST_DAY..=DAYS_PER_TRACK).map(|d| (d, self.day_status(d))).collect()
    }

    /// Day 7 is done and the record is waiting for a rating
    pub fn awaiting_feedback(&self) -> bool {
        self.is_active() && self.completed_days.contains(&DAYS_PER_TRACK)
    }

    pub fn completion_percent(&self) -> u8 {
        let done = self.completed_days.len().min(DAYS_PER_TRACK as usize);
        ((done * 100) as f64 / DAYS_PER_TRACK as f64).round() as u8
    }

    /// Store the reflection for the current day, mark it done and advance.
    pub fn complete_day(&mut self, day: u8, reflection: &str, now: &str) -> Result<DayCompletion, ChallengeError> {
        self.ensure_active()?;
        ensure_in_range(day)?;
        if self.completed_days.contains(&day) {
            return Err(ChallengeError::DayAlreadyCompleted(day));
        }
        if day > self.current_day {
            return Err(ChallengeError::DayLocked(day));
        }
        if day != self.current_day {
            return Err(ChallengeError::NotCurrentDay {
                day,
                current: self.current_day,
            });
        }
        let text = reflection.trim();
        if text.is_empty() {
            return Err(ChallengeError::EmptyReflection);
        }

        self.reflections.insert(reflection_key(day), text.to_string());
        self.completed_days.insert(day);
        self.current_day = (day + 1).min(DAYS_PER_TRACK);
        if day == DAYS_PER_TRACK {
            self.completed_at = Some(now.to_string());
        }
        self.updated_at = now.to_string();

        Ok(DayCompletion {
            day,
            current_day: self.current_day,
            awaiting_feedback: self.awaiting_feedback(),
        })
    }

    /// Overwrite the reflection of an open day without completing it.
    pub fn save_reflection(&mut self, day: u8, reflection: &str, now: &str) -> Result<(), ChallengeError> {
        self.ensure_active()?;
        ensure_in_range(day)?;
        match self.day_status(day) {
            DayStatus::Active | DayStatus::Available => {}
            DayStatus::Completed => return Err(ChallengeError::DayAlreadyCompleted(day)),
            DayStatus::Locked => return Err(ChallengeError::DayLocked(day)),
        }
        let text = reflection.trim();
        if text.is_empty() {
            return Err(ChallengeError::EmptyReflection);
        }

        self.reflections.insert(reflection_key(day), text.to_string());
        self.updated_at = now.to_string();
        Ok(())
    }

    /// Rate a finished track, closing the record for good.
    pub fn submit_feedback(&mut self, feedback: ChallengeFeedback, now: &str) -> Result<(), ChallengeError> {
        self.ensure_active()?;
        if !self.awaiting_feedback() {
            return Err(ChallengeError::FeedbackNotDue);
        }
        self.survey_response = Some(feedback);
        self.status = ChallengeStatus::Completed;
        self.updated_at = now.to_string();
        Ok(())
    }

    /// Abandon the record; days and reflections are kept.
    pub fn quit(&mut self, now: &str) -> Result<(), ChallengeError> {
        self.ensure_active()?;
        self.status = ChallengeStatus::Abandoned;
        self.updated_at = now.to_string();
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), ChallengeError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ChallengeError::NotActive(self.status))
        }
    }
}

fn ensure_in_range(day: u8) -> Result<(), ChallengeError> {
    if (FIRST_DAY..=DAYS_PER_TRACK).contains(&day) {
        Ok(())
    } else {
        Err(ChallengeError::DayOutOfRange(day))
    }
}

/// Pathway status of `track_id` given the user's records
pub fn track_status(track_id: &str, records: &[ChallengeProgress]) -> TrackStatus {
    let on_track = || records.iter().filter(|r| r.skill_id == track_id);
    if on_track().any(|r| r.is_active()) {
        TrackStatus::Active
    } else if on_track().any(|r| r.status == ChallengeStatus::Completed) {
        TrackStatus::Completed
    } else {
        TrackStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2026-03-01T08:00:00Z";

    fn fresh() -> ChallengeProgress {
        ChallengeProgress::start("p1".into(), "u1", "uiux-design", NOW).unwrap()
    }

    fn finished() -> ChallengeProgress {
        let mut p = fresh();
        for day in 1..=7 {
            p.complete_day(day, &format!("reflection {}", day), NOW).unwrap();
        }
        p
    }

    #[test]
    fn test_start_state() {
        let p = fresh();
        assert_eq!(p.status, ChallengeStatus::Active);
        assert_eq!(p.current_day, 1);
        assert!(p.completed_days.is_empty());
        assert!(p.reflections.is_empty());
        assert!(!p.awaiting_feedback());
    }

    #[test]
    fn test_start_unknown_track() {
        let err = ChallengeProgress::start("p1".into(), "u1", "juggling", NOW).unwrap_err();
        assert_eq!(err, ChallengeError::UnknownTrack("juggling".into()));
    }

    #[test]
    fn test_complete_current_day_advances() {
        let mut p = fresh();
        let done = p.complete_day(1, "  seru banget  ", NOW).unwrap();
        assert_eq!(done.current_day, 2);
        assert!(!done.awaiting_feedback);
        assert_eq!(p.reflection(1), Some("seru banget"));
        assert!(p.reflections.contains_key("day1"));
        assert_eq!(p.completion_percent(), 14);
    }

    #[test]
    fn test_empty_reflection_is_rejected_without_mutation() {
        let mut p = fresh();
        let before = p.clone();
        assert_eq!(p.complete_day(1, "   ", NOW), Err(ChallengeError::EmptyReflection));
        assert_eq!(p, before);
    }

    #[test]
    fn test_wrong_day_is_rejected() {
        let mut p = fresh();
        p.complete_day(1, "ok", NOW).unwrap();
        assert_eq!(p.complete_day(1, "again", NOW), Err(ChallengeError::DayAlreadyCompleted(1)));
        assert_eq!(p.complete_day(4, "skip", NOW), Err(ChallengeError::DayLocked(4)));
        assert_eq!(p.complete_day(8, "x", NOW), Err(ChallengeError::DayOutOfRange(8)));
        assert_eq!(p.complete_day(0, "x", NOW), Err(ChallengeError::DayOutOfRange(0)));
        assert_eq!(p.current_day, 2);
    }

    #[test]
    fn test_skipped_day_is_not_completable() {
        let mut p = fresh();
        p.current_day = 3;
        p.completed_days.insert(1);
        assert_eq!(
            p.complete_day(2, "late", NOW),
            Err(ChallengeError::NotCurrentDay { day: 2, current: 3 })
        );
    }

    #[test]
    fn test_day_status_derivation() {
        let mut p = fresh();
        p.current_day = 3;
        p.completed_days.insert(1);
        assert_eq!(p.day_status(1), DayStatus::Completed);
        assert_eq!(p.day_status(2), DayStatus::Available);
        assert_eq!(p.day_status(3), DayStatus::Active);
        for day in 4..=7 {
            assert_eq!(p.day_status(day), DayStatus::Locked);
        }
        assert_eq!(p.day_statuses().len(), 7);
    }

    #[test]
    fn test_day_seven_waits_for_feedback() {
        let p = finished();
        assert_eq!(p.status, ChallengeStatus::Active);
        assert_eq!(p.current_day, 7);
        assert!(p.awaiting_feedback());
        assert_eq!(p.completed_at.as_deref(), Some(NOW));
        assert_eq!(p.completion_percent(), 100);
    }

    #[test]
    fn test_feedback_closes_record_for_good() {
        let mut p = finished();
        p.submit_feedback(ChallengeFeedback::LoveIt, NOW).unwrap();
        assert_eq!(p.status, ChallengeStatus::Completed);
        assert_eq!(p.survey_response, Some(ChallengeFeedback::LoveIt));
        assert!(!p.awaiting_feedback());

        let err = ChallengeError::NotActive(ChallengeStatus::Completed);
        assert_eq!(p.complete_day(7, "more", NOW), Err(err.clone()));
        assert_eq!(p.submit_feedback(ChallengeFeedback::NotForMe, NOW), Err(err.clone()));
        assert_eq!(p.quit(NOW), Err(err));
    }

    #[test]
    fn test_feedback_before_day_seven() {
        let mut p = fresh();
        assert_eq!(
            p.submit_feedback(ChallengeFeedback::LikeIt, NOW),
            Err(ChallengeError::FeedbackNotDue)
        );
    }

    #[test]
    fn test_save_reflection_overwrites_open_days_only() {
        let mut p = fresh();
        p.save_reflection(1, "draft", NOW).unwrap();
        p.save_reflection(1, "draft v2", NOW).unwrap();
        assert_eq!(p.reflection(1), Some("draft v2"));
        assert_eq!(p.current_day, 1);
        assert!(p.completed_days.is_empty());

        p.complete_day(1, "final", NOW).unwrap();
        assert_eq!(p.save_reflection(1, "edit", NOW), Err(ChallengeError::DayAlreadyCompleted(1)));
        assert_eq!(p.save_reflection(5, "early", NOW), Err(ChallengeError::DayLocked(5)));
        assert_eq!(p.save_reflection(2, "", NOW), Err(ChallengeError::EmptyReflection));

        p.current_day = 4;
        p.save_reflection(3, "skipped day note", NOW).unwrap();
        assert_eq!(p.day_status(3), DayStatus::Available);
    }

    #[test]
    fn test_quit_preserves_data() {
        let mut p = fresh();
        p.complete_day(1, "hari pertama", NOW).unwrap();
        p.quit(NOW).unwrap();
        assert_eq!(p.status, ChallengeStatus::Abandoned);
        assert_eq!(p.reflection(1), Some("hari pertama"));
        assert!(p.completed_days.contains(&1));
        assert!(p.complete_day(2, "x", NOW).is_err());
    }

    #[test]
    fn test_track_status() {
        let mut done = finished();
        done.submit_feedback(ChallengeFeedback::LikeIt, NOW).unwrap();
        let mut quit = ChallengeProgress::start("p2".into(), "u1", "web-development", NOW).unwrap();
        quit.quit(NOW).unwrap();
        let active = ChallengeProgress::start("p3".into(), "u1", "content-writing", NOW).unwrap();
        let records = vec![done, quit, active];

        assert_eq!(track_status("uiux-design", &records), TrackStatus::Completed);
        assert_eq!(track_status("web-development", &records), TrackStatus::Available);
        assert_eq!(track_status("content-writing", &records), TrackStatus::Active);
    }

    #[test]
    fn test_wire_tokens() {
        assert_eq!(serde_json::to_value(ChallengeFeedback::NotForMe).unwrap(), "not-for-me");
        assert_eq!(ChallengeFeedback::parse("love-it"), Some(ChallengeFeedback::LoveIt));
        assert_eq!(serde_json::to_value(DayStatus::Available).unwrap(), "available");
        assert_eq!(ChallengeStatus::parse("abandoned"), Some(ChallengeStatus::Abandoned));
    }
}
