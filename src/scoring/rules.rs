//! Rule primitives shared by the scoring tables
//!
//! Every rule table in this module family is plain data: a list of
//! `(condition, effect)` entries folded in order. Conditions never fail; an
//! absent or mis-shaped answer simply does not match.

use crate::survey::{ids, SurveyAnswers};

/// Predicate over a survey answer set
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// Single-choice answer equals the token
    Equals(u8, &'static str),
    /// Multi-choice answer contains the token
    Contains(u8, &'static str),
    /// At least one nested condition holds
    Any(&'static [Condition]),
}

impl Condition {
    pub fn holds(&self, answers: &SurveyAnswers) -> bool {
        match *self {
            Condition::Equals(id, token) => answers.text(id) == Some(token),
            Condition::Contains(id, token) => answers.contains(id, token),
            Condition::Any(conditions) => conditions.iter().any(|c| c.holds(answers)),
        }
    }
}

/// Additive score adjustment
#[derive(Debug, Clone, Copy)]
pub enum Adjustment {
    /// Fixed delta when the condition holds
    Fixed { when: Condition, delta: i64 },
    /// `(value - center) * step` for a scale answer
    Centered { question: u8, center: i64, step: i64 },
    /// `delta` for every selected token of a multi-choice answer
    PerSelection { question: u8, delta: i64 },
}

impl Adjustment {
    /// Contribution of this rule; zero when its answer is absent
    pub fn delta(&self, answers: &SurveyAnswers) -> i64 {
        match *self {
            Adjustment::Fixed { when, delta } => {
                if when.holds(answers) {
                    delta
                } else {
                    0
                }
            }
            Adjustment::Centered { question, center, step } => answers
                .number(question)
                .map(|v| (v - center) * step)
                .unwrap_or(0),
            Adjustment::PerSelection { question, delta } => answers
                .tokens(question)
                .map(|v| v.len() as i64 * delta)
                .unwrap_or(0),
        }
    }
}

pub const BASE_SCORE: i64 = 50;
pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

pub static SCORE_RULES: [Adjustment; 5] = [
    Adjustment::Fixed {
        when: Condition::Equals(ids::FEELING_LOST, "Hampir tiap hari"),
        delta: -20,
    },
    Adjustment::Fixed {
        when: Condition::Equals(ids::FEELING_LOST, "Seminggu beberapa kali"),
        delta: -10,
    },
    Adjustment::Fixed {
        when: Condition::Equals(ids::FEELING_LOST, "Jarang"),
        delta: 20,
    },
    Adjustment::Centered {
        question: ids::SELF_UNDERSTANDING,
        center: 3,
        step: 10,
    },
    Adjustment::PerSelection {
        question: ids::LOST_FACTORS,
        delta: -3,
    },
];

/// Fold the rule table over the base score and clamp into `0..=100`
pub fn clarity_score(answers: &SurveyAnswers) -> u8 {
    let raw = SCORE_RULES
        .iter()
        .fold(BASE_SCORE, |score, rule| score + rule.delta(answers));
    raw.clamp(MIN_SCORE, MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::AnswerValue;

    fn answers(json: &str) -> SurveyAnswers {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_frequent_lost_low_understanding() {
        let a = answers(r#"{"3": "Hampir tiap hari", "4": 2, "5": ["scroll_sosmed", "tekanan_ortu"]}"#);
        assert_eq!(clarity_score(&a), 14);
    }

    #[test]
    fn test_rarely_lost_high_understanding() {
        let a = answers(r#"{"3": "Jarang", "4": 5}"#);
        assert_eq!(clarity_score(&a), 90);
    }

    #[test]
    fn test_missing_answers_keep_base() {
        assert_eq!(clarity_score(&SurveyAnswers::new()), 50);
        let a = answers(r#"{"3": "Kadang-kadang"}"#);
        assert_eq!(clarity_score(&a), 50);
    }

    #[test]
    fn test_clamped_at_bounds() {
        let every_factor: Vec<String> = [
            "scroll_sosmed", "tekanan_ortu", "ngebanding", "ekspektasi",
            "skill_bingung", "terlalu_banyak_pilihan", "takut_salah", "standar_orang",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let mut low = answers(r#"{"3": "Hampir tiap hari", "4": 1}"#);
        low.insert(5, AnswerValue::Tokens(every_factor));
        assert_eq!(clarity_score(&low), 0);

        // Out-of-range scale values still clamp
        let high = answers(r#"{"3": "Jarang", "4": 40}"#);
        assert_eq!(clarity_score(&high), 100);
    }

    #[test]
    fn test_any_condition() {
        let a = answers(r#"{"10": "Audio", "5": ["skill_bingung"]}"#);
        const EITHER: Condition =
            Condition::Any(&[Condition::Equals(10, "Visual"), Condition::Contains(5, "skill_bingung")]);
        assert!(EITHER.holds(&a));
        assert!(!Condition::Equals(10, "Visual").holds(&a));
    }
}
