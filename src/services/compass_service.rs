//! Compass service - survey submission and assessment history

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::db::models::{current_timestamp, CompassRecord, CompassSummary};
use crate::db::{surveys, Database};
use crate::drafts::{Draft, DraftKind, DraftStore};
use crate::error::GenmaveError;
use crate::scoring::{compute_assessment, ClarityAssessment};
use crate::survey::{progress_percent, question, questions, AnswerValue, Question, SurveyAnswers, QUESTIONS};

use super::events::{EventBus, GenmaveEvent};

/// Survey draft with form progress
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct SurveyDraftView {
    pub answers: SurveyAnswers,
    pub current_question: usize,
    pub progress_percent: u8,
    pub complete: bool,
}

pub struct CompassService {
    db: Arc<Database>,
    events: Arc<EventBus>,
    drafts: Arc<DraftStore>,
}

impl CompassService {
    pub fn new(db: Arc<Database>, events: Arc<EventBus>, drafts: Arc<DraftStore>) -> Self {
        Self { db, events, drafts }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    pub fn questions(&self) -> &'static [Question] {
        questions()
    }

    /// Score an answer set without storing anything
    pub fn preview(&self, answers: &SurveyAnswers) -> ClarityAssessment {
        compute_assessment(answers)
    }

    pub fn latest(&self, user_id: &str) -> Result<Option<CompassRecord>, GenmaveError> {
        self.db.with_conn(|conn| surveys::latest_compass(conn, user_id))
    }

    pub fn history(&self, user_id: &str) -> Result<Vec<CompassSummary>, GenmaveError> {
        self.db.with_conn(|conn| surveys::compass_history(conn, user_id))
    }

    /// Raw answers behind one of the user's submissions
    pub fn answers(&self, user_id: &str, survey_id: &str) -> Result<Option<SurveyAnswers>, GenmaveError> {
        self.db.with_conn(|conn| surveys::answers_for(conn, user_id, survey_id))
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Apply one form answer to the user's survey draft.
    ///
    /// Multi-select answers toggle a single token.
    pub fn answer_draft(
        &self,
        user_id: &str,
        question_id: u8,
        value: AnswerValue,
        current_question: Option<usize>,
    ) -> Result<SurveyDraftView, GenmaveError> {
        let q = question(question_id)
            .ok_or_else(|| GenmaveError::InvalidInput(format!("unknown question id {}", question_id)))?;
        let (mut answers, mut current) = match self.drafts.load(user_id, DraftKind::Survey) {
            Some(Draft::Survey {
                answers,
                current_question,
            }) => (answers, current_question),
            _ => (SurveyAnswers::new(), 0),
        };

        answers.answer(q, value)?;
        if let Some(index) = current_question {
            current = index.min(QUESTIONS.len() - 1);
        }

        self.drafts.save(
            user_id,
            Draft::Survey {
                answers: answers.clone(),
                current_question: current,
            },
        );
        Ok(SurveyDraftView {
            progress_percent: progress_percent(current),
            complete: answers.is_complete(),
            answers,
            current_question: current,
        })
    }

    /// Validate, score and persist a finished survey
    pub fn submit(&self, user_id: &str, answers: SurveyAnswers) -> Result<CompassRecord, GenmaveError> {
        answers.validate_submission()?;

        let assessment = compute_assessment(&answers);
        let now = current_timestamp();
        let record = self
            .db
            .with_conn(|conn| surveys::insert_submission(conn, user_id, &answers, &assessment, &now))?;

        if self.drafts.clear(user_id, DraftKind::Survey) {
            debug!(user_id = %user_id, "Cleared survey draft after submission");
        }

        self.events.emit(GenmaveEvent::SurveySubmitted {
            user_id: user_id.to_string(),
            compass_id: record.id.clone(),
            clarity_score: record.assessment.clarity_score,
        });

        Ok(record)
    }
}
