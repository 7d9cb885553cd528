//! Journal service - private entries and streaks

use std::sync::Arc;

use chrono::FixedOffset;
use serde::Serialize;
use ts_rs::TS;

use crate::db::models::{current_timestamp, new_id, JournalEntry};
use crate::db::{journal_entries, Database};
use crate::drafts::{DraftKind, DraftStore};
use crate::error::GenmaveError;
use crate::journal::{self, DEFAULT_LIST_LIMIT};

use super::events::{EventBus, GenmaveEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct StreakInfo {
    pub streak: u32,
    pub message: String,
    pub days_active: u32,
}

pub struct JournalService {
    db: Arc<Database>,
    events: Arc<EventBus>,
    drafts: Arc<DraftStore>,
    offset: FixedOffset,
}

impl JournalService {
    pub fn new(db: Arc<Database>, events: Arc<EventBus>, drafts: Arc<DraftStore>, offset: FixedOffset) -> Self {
        Self {
            db,
            events,
            drafts,
            offset,
        }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    pub fn list(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<JournalEntry>, GenmaveError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500);
        self.db.with_conn(|conn| journal_entries::list(conn, user_id, limit))
    }

    pub fn get(&self, user_id: &str, id: &str) -> Result<Option<JournalEntry>, GenmaveError> {
        self.db.with_conn(|conn| journal_entries::get(conn, user_id, id))
    }

    pub fn streak(&self, user_id: &str) -> Result<StreakInfo, GenmaveError> {
        let timestamps = self.db.with_conn(|conn| journal_entries::timestamps(conn, user_id))?;
        let today = journal::today(self.offset);
        let streak = journal::journal_streak(timestamps.iter().map(String::as_str), today, self.offset);
        let days_active = journal::days_active(timestamps.iter().map(String::as_str), self.offset);

        Ok(StreakInfo {
            streak,
            message: journal::streak_message(streak),
            days_active: u32::try_from(days_active).unwrap_or(u32::MAX),
        })
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Save a new entry; a manual save discards the journal draft
    pub fn create(&self, user_id: &str, content: &str) -> Result<JournalEntry, GenmaveError> {
        let content = journal::validate_content(content)?;
        let id = new_id();
        let now = current_timestamp();
        let entry = self
            .db
            .with_conn(|conn| journal_entries::create(conn, &id, user_id, &content, &now))?;

        self.drafts.clear(user_id, DraftKind::Journal);
        self.events.emit(GenmaveEvent::JournalSaved {
            user_id: user_id.to_string(),
            id: entry.id.clone(),
            created: true,
        });
        Ok(entry)
    }

    pub fn update(&self, user_id: &str, id: &str, content: &str) -> Result<JournalEntry, GenmaveError> {
        let content = journal::validate_content(content)?;
        let now = current_timestamp();
        let entry = self
            .db
            .with_conn(|conn| journal_entries::update(conn, user_id, id, &content, &now))?
            .ok_or_else(|| GenmaveError::NotFound(format!("journal entry {}", id)))?;

        self.events.emit(GenmaveEvent::JournalSaved {
            user_id: user_id.to_string(),
            id: entry.id.clone(),
            created: false,
        });
        Ok(entry)
    }

    /// `false` if the entry does not exist for this user
    pub fn delete(&self, user_id: &str, id: &str) -> Result<bool, GenmaveError> {
        let deleted = self.db.with_conn(|conn| journal_entries::delete(conn, user_id, id))?;
        if deleted {
            self.events.emit(GenmaveEvent::JournalDeleted {
                user_id: user_id.to_string(),
                id: id.to_string(),
            });
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::Draft;

    fn service() -> (JournalService, Arc<DraftStore>) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let drafts = Arc::new(DraftStore::new());
        let offset = journal::utc_offset(0).unwrap();
        (
            JournalService::new(db, Arc::new(EventBus::new()), drafts.clone(), offset),
            drafts,
        )
    }

    #[test]
    fn test_create_clears_draft_and_starts_streak() {
        let (svc, drafts) = service();
        drafts.save(
            "u1",
            Draft::Journal {
                content: "setengah jadi".into(),
                saved_at: None,
            },
        );

        let entry = svc.create("u1", "  Hari ini aku belajar Figma.  ").unwrap();
        assert_eq!(entry.content, "Hari ini aku belajar Figma.");
        assert!(drafts.load("u1", DraftKind::Journal).is_none());

        let info = svc.streak("u1").unwrap();
        assert_eq!(info.streak, 1);
        assert_eq!(info.days_active, 1);
        assert_eq!(info.message, "Bagus! Keep going 🔥");
    }

    #[test]
    fn test_validation_and_ownership() {
        let (svc, _) = service();
        assert!(matches!(svc.create("u1", "   "), Err(GenmaveError::InvalidInput(_))));

        let entry = svc.create("u1", "catatan").unwrap();
        assert!(matches!(svc.update("u2", &entry.id, "bukan punyaku"), Err(GenmaveError::NotFound(_))));
        assert!(svc.get("u2", &entry.id).unwrap().is_none());
        assert!(!svc.delete("u2", &entry.id).unwrap());

        assert_eq!(svc.update("u1", &entry.id, "revisi").unwrap().content, "revisi");
        assert!(svc.delete("u1", &entry.id).unwrap());
        assert_eq!(svc.streak("u1").unwrap().streak, 0);
    }
}
