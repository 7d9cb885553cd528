//! Survey answers and the question catalog
//!
//! Answers arrive from the client keyed by question id. Values are one of three
//! shapes (option token, scale integer, list of tokens); the typed accessors
//! return `None` for anything absent or of the wrong shape, so callers such as
//! the scoring engine can degrade instead of failing.

pub mod questions;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::GenmaveError;
pub use questions::{ids, question, questions, Question, QuestionKind, QUESTIONS};

/// A single answer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../web/src/generated/")]
pub enum AnswerValue {
    Number(#[ts(type = "number")] i64),
    Text(String),
    Tokens(Vec<String>),
    /// Any other JSON shape; reads as unanswered
    Other(#[ts(type = "unknown")] serde_json::Value),
}

impl AnswerValue {
    /// Blank text and empty selections count as unanswered
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Number(_) => false,
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Tokens(v) => v.is_empty(),
            AnswerValue::Other(_) => true,
        }
    }
}

/// Answers keyed by question id (1-15)
///
/// JSON keys are stringified ids; keys that are not a valid id are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct SurveyAnswers(BTreeMap<u8, AnswerValue>);

impl<'de> Deserialize<'de> for SurveyAnswers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, AnswerValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| key.trim().parse::<u8>().ok().map(|id| (id, value)))
            .collect())
    }
}

impl SurveyAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u8) -> Option<&AnswerValue> {
        self.0.get(&id)
    }

    pub fn insert(&mut self, id: u8, value: AnswerValue) {
        self.0.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-choice answer, `None` if absent or not a token
    pub fn text(&self, id: u8) -> Option<&str> {
        match self.0.get(&id) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Scale answer, `None` if absent or not an integer
    pub fn number(&self, id: u8) -> Option<i64> {
        match self.0.get(&id) {
            Some(AnswerValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Multi-choice answer in selection order, `None` if absent or not a list
    pub fn tokens(&self, id: u8) -> Option<&[String]> {
        match self.0.get(&id) {
            Some(AnswerValue::Tokens(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Multi-choice membership test; absent or mis-shaped answers never match
    pub fn contains(&self, id: u8, token: &str) -> bool {
        self.tokens(id)
            .map(|v| v.iter().any(|t| t == token))
            .unwrap_or(false)
    }

    pub fn is_answered(&self, id: u8) -> bool {
        self.0.get(&id).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// Every catalog question has a non-empty answer
    pub fn is_complete(&self) -> bool {
        QUESTIONS.iter().all(|q| self.is_answered(q.id))
    }

    /// Record an answer the way the survey form does: single and scale
    /// questions replace the value, multi questions toggle the token and
    /// ignore a new selection once `max_select` is reached.
    pub fn answer(&mut self, question: &Question, value: AnswerValue) -> Result<(), GenmaveError> {
        match (question.kind, value) {
            (QuestionKind::Single, AnswerValue::Text(token)) => {
                if !question.has_token(&token) {
                    return Err(unknown_option(question.id, &token));
                }
                self.0.insert(question.id, AnswerValue::Text(token));
            }
            (QuestionKind::Scale { min, max }, AnswerValue::Number(n)) => {
                if n < min || n > max {
                    return Err(GenmaveError::InvalidInput(format!(
                        "question {} expects a value in {}..={}, got {}",
                        question.id, min, max, n
                    )));
                }
                self.0.insert(question.id, AnswerValue::Number(n));
            }
            (QuestionKind::Multi { max_select }, AnswerValue::Text(token)) => {
                if !question.has_token(&token) {
                    return Err(unknown_option(question.id, &token));
                }
                let mut current = self.tokens(question.id).map(<[String]>::to_vec).unwrap_or_default();
                if let Some(pos) = current.iter().position(|t| *t == token) {
                    current.remove(pos);
                } else if max_select.map_or(true, |cap| current.len() < cap) {
                    current.push(token);
                }
                self.0.insert(question.id, AnswerValue::Tokens(current));
            }
            (_, other) => {
                return Err(GenmaveError::InvalidInput(format!(
                    "question {} does not accept {:?}",
                    question.id, other
                )));
            }
        }
        Ok(())
    }

    /// Check a finished answer set before it is persisted.
    pub fn validate_submission(&self) -> Result<(), GenmaveError> {
        for (id, value) in &self.0 {
            let q = question(*id)
                .ok_or_else(|| GenmaveError::InvalidInput(format!("unknown question id {}", id)))?;
            validate_shape(q, value)?;
        }

        let missing: Vec<u8> = QUESTIONS
            .iter()
            .filter(|q| !self.is_answered(q.id))
            .map(|q| q.id)
            .collect();
        if !missing.is_empty() {
            return Err(GenmaveError::InvalidInput(format!(
                "unanswered questions: {:?}",
                missing
            )));
        }

        Ok(())
    }
}

impl FromIterator<(u8, AnswerValue)> for SurveyAnswers {
    fn from_iter<I: IntoIterator<Item = (u8, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Percent of the survey reached when `current_index` (0-based) is on screen
pub fn progress_percent(current_index: usize) -> u8 {
    let total = QUESTIONS.len();
    let shown = (current_index + 1).min(total);
    ((shown * 100) as f64 / total as f64).round() as u8
}

fn unknown_option(id: u8, token: &str) -> GenmaveError {
    GenmaveError::InvalidInput(format!("question {} has no option {:?}", id, token))
}

fn validate_shape(q: &Question, value: &AnswerValue) -> Result<(), GenmaveError> {
    match (q.kind, value) {
        (QuestionKind::Single, AnswerValue::Text(token)) if q.has_token(token) => Ok(()),
        (QuestionKind::Scale { min, max }, AnswerValue::Number(n)) if (min..=max).contains(n) => Ok(()),
        (QuestionKind::Multi { max_select }, AnswerValue::Tokens(tokens)) => {
            if let Some(bad) = tokens.iter().find(|t| !q.has_token(t)) {
                return Err(unknown_option(q.id, bad));
            }
            if let Some(cap) = max_select {
                if tokens.len() > cap {
                    return Err(GenmaveError::InvalidInput(format!(
                        "question {} allows at most {} selections",
                        q.id, cap
                    )));
                }
            }
            Ok(())
        }
        _ => Err(GenmaveError::InvalidInput(format!(
            "question {} has a malformed answer",
            q.id
        ))),
    }
}
