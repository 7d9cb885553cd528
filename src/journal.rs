//! Journal rules: content validation, streaks and active days
//!
//! Entry timestamps are stored in UTC. Calendar days are taken in one
//! configured fixed offset (`journal_utc_offset_minutes`), so "today" and
//! "yesterday" mean the same thing for every caller.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};

use crate::error::GenmaveError;

pub const MAX_CONTENT_CHARS: usize = 2000;
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Trimmed content, or an error if blank or too long
pub fn validate_content(content: &str) -> Result<String, GenmaveError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(GenmaveError::InvalidInput("journal content is empty".into()));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(GenmaveError::InvalidInput(format!(
            "journal content is {} characters, limit is {}",
            chars, MAX_CONTENT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

pub fn utc_offset(minutes: i32) -> Result<FixedOffset, GenmaveError> {
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| GenmaveError::Config(format!("invalid UTC offset: {} minutes", minutes)))
}

/// Calendar date of an RFC 3339 timestamp in `offset`. Unparseable input is skipped.
pub fn local_date(timestamp: &str, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&offset).date_naive())
}

pub fn today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

fn distinct_dates<'a, I>(timestamps: I, offset: FixedOffset) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a str>,
{
    timestamps
        .into_iter()
        .filter_map(|ts| local_date(ts, offset))
        .collect()
}

/// Consecutive days with at least one entry, counted back from `today`, or
/// from yesterday when today has no entry yet.
pub fn journal_streak<'a, I>(timestamps: I, today: NaiveDate, offset: FixedOffset) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let dates = distinct_dates(timestamps, offset);

    let mut cursor = if dates.contains(&today) {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) if dates.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while dates.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Number of distinct calendar days with an entry
pub fn days_active<'a, I>(timestamps: I, offset: FixedOffset) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    distinct_dates(timestamps, offset).len()
}

pub fn streak_message(streak: u32) -> String {
    match streak {
        0 => "Mulai streak hari ini!".to_string(),
        1..=2 => "Bagus! Keep going 🔥".to_string(),
        3..=6 => "Streak kamu on fire! 🔥🔥".to_string(),
        n => format!("Amazing! {} hari berturut-turut! 🔥🔥🔥", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_content() {
        assert_eq!(validate_content("  hari ini capek  ").unwrap(), "hari ini capek");
        assert!(validate_content(" \n ").is_err());
        assert!(validate_content(&"a".repeat(MAX_CONTENT_CHARS)).is_ok());
        assert!(validate_content(&"a".repeat(MAX_CONTENT_CHARS + 1)).is_err());
        // characters, not bytes
        assert!(validate_content(&"é".repeat(MAX_CONTENT_CHARS)).is_ok());
    }

    #[test]
    fn test_streak_counts_from_today() {
        let utc = utc_offset(0).unwrap();
        let entries = [
            "2026-03-10T09:00:00Z",
            "2026-03-10T21:00:00Z",
            "2026-03-09T12:00:00Z",
            "2026-03-08T12:00:00Z",
            "2026-03-06T12:00:00Z",
        ];
        assert_eq!(journal_streak(entries, date("2026-03-10"), utc), 3);
    }

    #[test]
    fn test_streak_survives_until_today_ends() {
        let utc = utc_offset(0).unwrap();
        let entries = ["2026-03-09T12:00:00Z", "2026-03-08T12:00:00Z"];
        assert_eq!(journal_streak(entries, date("2026-03-10"), utc), 2);
        assert_eq!(journal_streak(entries, date("2026-03-11"), utc), 0);
    }

    #[test]
    fn test_streak_empty() {
        let utc = utc_offset(0).unwrap();
        assert_eq!(journal_streak([], date("2026-03-10"), utc), 0);
        assert_eq!(journal_streak(["garbage"], date("2026-03-10"), utc), 0);
    }

    #[test]
    fn test_offset_moves_day_boundary() {
        // 23:30 UTC is already the next morning in UTC+7
        let jakarta = utc_offset(7 * 60).unwrap();
        let entries = ["2026-03-09T23:30:00Z", "2026-03-09T01:00:00Z"];
        assert_eq!(local_date(entries[0], jakarta), Some(date("2026-03-10")));
        assert_eq!(journal_streak(entries, date("2026-03-10"), jakarta), 2);
        assert_eq!(days_active(entries, jakarta), 2);
        assert_eq!(days_active(entries, utc_offset(0).unwrap()), 1);
    }

    #[test]
    fn test_invalid_offset() {
        assert!(utc_offset(24 * 60).is_err());
    }

    #[test]
    fn test_streak_messages() {
        assert_eq!(streak_message(0), "Mulai streak hari ini!");
        assert_eq!(streak_message(2), "Bagus! Keep going 🔥");
        assert_eq!(streak_message(6), "Streak kamu on fire! 🔥🔥");
        assert_eq!(streak_message(7), "Amazing! 7 hari berturut-turut! 🔥🔥🔥");
    }
}
