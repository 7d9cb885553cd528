//! Ephemeral drafts: a survey in progress and unsaved journal text
//!
//! Last write wins; nothing here survives a restart.

use std::fmt;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::survey::SurveyAnswers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum DraftKind {
    Survey,
    Journal,
}

impl DraftKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "survey" => Some(DraftKind::Survey),
            "journal" => Some(DraftKind::Journal),
            _ => None,
        }
    }
}

impl fmt::Display for DraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftKind::Survey => write!(f, "survey"),
            DraftKind::Journal => write!(f, "journal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum Draft {
    Survey {
        answers: SurveyAnswers,
        #[serde(default)]
        current_question: usize,
    },
    Journal {
        content: String,
        #[serde(default)]
        saved_at: Option<String>,
    },
}

impl Draft {
    pub fn kind(&self) -> DraftKind {
        match self {
            Draft::Survey { .. } => DraftKind::Survey,
            Draft::Journal { .. } => DraftKind::Journal,
        }
    }
}

/// In-memory draft cache keyed by (user, kind)
#[derive(Default)]
pub struct DraftStore {
    drafts: DashMap<(String, DraftKind), Draft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, user_id: &str, draft: Draft) {
        self.drafts.insert((user_id.to_string(), draft.kind()), draft);
    }

    pub fn load(&self, user_id: &str, kind: DraftKind) -> Option<Draft> {
        self.drafts
            .get(&(user_id.to_string(), kind))
            .map(|d| d.value().clone())
    }

    /// `true` if a draft was removed
    pub fn clear(&self, user_id: &str, kind: DraftKind) -> bool {
        self.drafts.remove(&(user_id.to_string(), kind)).is_some()
    }

    /// Drop every draft a user has
    pub fn clear_user(&self, user_id: &str) {
        self.drafts.retain(|(owner, _), _| owner != user_id);
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal(text: &str) -> Draft {
        Draft::Journal {
            content: text.into(),
            saved_at: None,
        }
    }

    #[test]
    fn test_last_write_wins() {
        let store = DraftStore::new();
        store.save("u1", journal("v1"));
        store.save("u1", journal("v2"));
        assert_eq!(store.load("u1", DraftKind::Journal), Some(journal("v2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_kinds_and_users_are_separate() {
        let store = DraftStore::new();
        store.save("u1", journal("mine"));
        store.save(
            "u1",
            Draft::Survey {
                answers: SurveyAnswers::new(),
                current_question: 4,
            },
        );
        store.save("u2", journal("theirs"));

        assert!(store.clear("u1", DraftKind::Journal));
        assert!(!store.clear("u1", DraftKind::Journal));
        assert!(store.load("u1", DraftKind::Survey).is_some());
        assert_eq!(store.load("u2", DraftKind::Journal), Some(journal("theirs")));

        store.clear_user("u1");
        assert!(store.load("u1", DraftKind::Survey).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_draft_json_shape() {
        let draft: Draft = serde_json::from_str(r#"{"kind": "survey", "answers": {"3": "Jarang"}, "current_question": 3}"#).unwrap();
        assert_eq!(draft.kind(), DraftKind::Survey);
        assert_eq!(DraftKind::parse("journal"), Some(DraftKind::Journal));
        assert_eq!(DraftKind::parse("notes"), None);
    }
}
