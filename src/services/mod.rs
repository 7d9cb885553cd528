//! Service layer for genmave
//!
//! Services sit between the HTTP handlers and the repositories. Each one:
//! - validates input
//! - runs the pure domain logic (scoring, challenge transitions, streaks)
//! - owns the transaction boundary
//! - emits events after a successful write
//!
//! ## Architecture
//!
//! ```text
//! HTTP Handlers (thin)
//!     ↓
//! Service Layer (validation, events)
//!     ↓
//! Domain (survey, scoring, challenge, journal) + Repository Layer (db/*.rs)
//!     ↓
//! SQLite Database
//! ```

pub mod admin_service;
pub mod challenge_service;
pub mod compass_service;
pub mod events;
pub mod journal_service;
pub mod profile_service;
pub mod response;

pub use admin_service::AdminService;
pub use challenge_service::{ChallengeService, ProgressView};
pub use compass_service::CompassService;
pub use events::{EventBus, EventListener, GenmaveEvent};
pub use journal_service::{JournalService, StreakInfo};
pub use profile_service::ProfileService;
pub use response::*;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::drafts::DraftStore;
use crate::error::GenmaveError;
use crate::journal::utc_offset;

/// Service container for dependency injection
///
/// Holds all services with a shared database, event bus and draft store.
/// Pass this to HttpServer for handler access.
pub struct Services {
    pub compass: Arc<CompassService>,
    pub challenge: Arc<ChallengeService>,
    pub journal: Arc<JournalService>,
    pub profile: Arc<ProfileService>,
    pub admin: Arc<AdminService>,
    pub drafts: Arc<DraftStore>,
    pub events: Arc<EventBus>,
    db: Arc<Database>,
}

impl Services {
    pub fn new(db: Arc<Database>, config: &Config) -> Result<Self, GenmaveError> {
        let events = Arc::new(EventBus::new());
        let drafts = Arc::new(DraftStore::new());
        let offset = utc_offset(config.journal_utc_offset_minutes)?;

        Ok(Self {
            compass: Arc::new(CompassService::new(db.clone(), events.clone(), drafts.clone())),
            challenge: Arc::new(ChallengeService::new(db.clone(), events.clone())),
            journal: Arc::new(JournalService::new(db.clone(), events.clone(), drafts.clone(), offset)),
            profile: Arc::new(ProfileService::new(db.clone(), events.clone(), drafts.clone(), offset)),
            admin: Arc::new(AdminService::new(
                db.clone(),
                &config.admin_user_ids,
                config.admin_window_days,
            )),
            drafts,
            events,
            db,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
