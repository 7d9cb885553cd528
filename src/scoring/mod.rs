//! Clarity scoring engine
//!
//! Maps a survey answer set to a `ClarityAssessment` (the "compass"): score,
//! narrative, energy pattern, learning style, recommended skills and growth
//! edges. Pure and deterministic; no I/O, no clock, no randomness.
//!
//! ## Rule tables
//!
//! | Table | Module | Effect |
//! |-------|--------|--------|
//! | `SCORE_RULES` | [`rules`] | additive score deltas, clamped to 0..=100 |
//! | `FRAGMENTS` | [`narrative`] | narrative bullets in fixed order |
//! | `RULES` | [`recommendations`] | up to three skill suggestions |
//! | `EDGES` | [`growth_edges`] | obstacle -> (pattern, tip) |

pub mod growth_edges;
pub mod narrative;
pub mod recommendations;
pub mod rules;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::survey::{ids, SurveyAnswers};

pub use growth_edges::GrowthEdge;
pub use recommendations::RecommendedSkill;

/// When the user is most productive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub enum EnergyPattern {
    #[serde(rename = "Morning person")]
    MorningPerson,
    #[serde(rename = "Night owl")]
    NightOwl,
    #[default]
    Flexible,
}

impl EnergyPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyPattern::MorningPerson => "Morning person",
            EnergyPattern::NightOwl => "Night owl",
            EnergyPattern::Flexible => "Flexible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Morning person" => Some(EnergyPattern::MorningPerson),
            "Night owl" => Some(EnergyPattern::NightOwl),
            "Flexible" => Some(EnergyPattern::Flexible),
            _ => None,
        }
    }
}

/// Preferred way of learning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub enum LearningStyle {
    #[default]
    Visual,
    #[serde(rename = "Hands-on")]
    HandsOn,
    Reading,
    Audio,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::HandsOn => "Hands-on",
            LearningStyle::Reading => "Reading",
            LearningStyle::Audio => "Audio",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Visual" => Some(LearningStyle::Visual),
            "Hands-on" => Some(LearningStyle::HandsOn),
            "Reading" => Some(LearningStyle::Reading),
            "Audio" => Some(LearningStyle::Audio),
            _ => None,
        }
    }
}

/// Display band for a clarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/generated/")]
pub enum ScoreBand {
    NeedsSupport,
    Developing,
    Strong,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=40 => ScoreBand::NeedsSupport,
            41..=70 => ScoreBand::Developing,
            _ => ScoreBand::Strong,
        }
    }
}

/// Derived snapshot of one survey submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct ClarityAssessment {
    pub clarity_score: u8,
    pub narrative_text: String,
    pub energy_pattern: EnergyPattern,
    pub learning_style: LearningStyle,
    pub recommended_skills: Vec<RecommendedSkill>,
    pub growth_edges: Vec<GrowthEdge>,
}

impl ClarityAssessment {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.clarity_score)
    }
}

/// Compute the full assessment for an answer set
pub fn compute_assessment(answers: &SurveyAnswers) -> ClarityAssessment {
    ClarityAssessment {
        clarity_score: rules::clarity_score(answers),
        narrative_text: narrative::compose(answers),
        energy_pattern: answers
            .text(ids::ENERGY_PATTERN)
            .and_then(EnergyPattern::parse)
            .unwrap_or_default(),
        learning_style: answers
            .text(ids::LEARNING_STYLE)
            .and_then(LearningStyle::parse)
            .unwrap_or_default(),
        recommended_skills: recommendations::select(answers),
        growth_edges: growth_edges::derive(answers),
    }
}
