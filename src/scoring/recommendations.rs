//! Recommendation selector
//!
//! Rules are evaluated in priority order and every matching rule contributes
//! its record. Output is not deduplicated; each rule emits a distinct slug, so
//! the table itself cannot produce duplicates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::rules::Condition;
use crate::survey::{ids, SurveyAnswers};

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Recommended activity as persisted in `compass_data.recommended_skills`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct RecommendedSkill {
    pub name: String,
    #[serde(rename = "match")]
    pub match_percent: u8,
    pub reason: String,
    pub slug: String,
}

/// Static output record of a rule
#[derive(Debug, Clone, Copy)]
pub struct SkillTemplate {
    pub name: &'static str,
    pub match_percent: u8,
    pub reason: &'static str,
    pub slug: &'static str,
}

impl SkillTemplate {
    fn to_skill(self) -> RecommendedSkill {
        RecommendedSkill {
            name: self.name.to_string(),
            match_percent: self.match_percent,
            reason: self.reason.to_string(),
            slug: self.slug.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    pub when: Condition,
    pub skill: SkillTemplate,
}

pub static RULES: [RecommendationRule; 4] = [
    RecommendationRule {
        when: Condition::Any(&[
            Condition::Equals(ids::LEARNING_STYLE, "Visual"),
            Condition::Contains(ids::LOST_FACTORS, "skill_bingung"),
        ]),
        skill: SkillTemplate {
            name: "UI/UX Design",
            match_percent: 87,
            reason: "Visual thinking + creative exploration",
            slug: "uiux",
        },
    },
    RecommendationRule {
        when: Condition::Any(&[
            Condition::Equals(ids::LEARNING_STYLE, "Hands-on"),
            Condition::Contains(ids::LOST_FACTORS, "terlalu_banyak_pilihan"),
        ]),
        skill: SkillTemplate {
            name: "Web Development",
            match_percent: 85,
            reason: "Practical, immediate feedback, clear path",
            slug: "webdev",
        },
    },
    RecommendationRule {
        when: Condition::Any(&[
            Condition::Equals(ids::LEARNING_STYLE, "Reading"),
            Condition::Equals(ids::PRIMARY_NEED, "Memahami diri lebih dalam"),
        ]),
        skill: SkillTemplate {
            name: "Creative Writing",
            match_percent: 82,
            reason: "Deep reflection, self-expression",
            slug: "writing",
        },
    },
    RecommendationRule {
        when: Condition::Any(&[
            Condition::Equals(ids::LEARNING_STYLE, "Audio"),
            Condition::Equals(ids::PRIMARY_NEED, "Komunitas kecil"),
        ]),
        skill: SkillTemplate {
            name: "Podcasting",
            match_percent: 80,
            reason: "Social connection through storytelling",
            slug: "podcasting",
        },
    },
];

/// Appended once when fewer than three rules matched
pub static FALLBACK: SkillTemplate = SkillTemplate {
    name: "Content Creation",
    match_percent: 75,
    reason: "Self-expression and creativity",
    slug: "content",
};

/// Select up to three recommendations in rule order
pub fn select(answers: &SurveyAnswers) -> Vec<RecommendedSkill> {
    let mut skills: Vec<RecommendedSkill> = RULES
        .iter()
        .filter(|rule| rule.when.holds(answers))
        .map(|rule| rule.skill.to_skill())
        .collect();

    if skills.len() < MAX_RECOMMENDATIONS {
        skills.push(FALLBACK.to_skill());
    }

    skills.truncate(MAX_RECOMMENDATIONS);
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(json: &str) -> Vec<String> {
        let answers: SurveyAnswers = serde_json::from_str(json).unwrap();
        select(&answers).into_iter().map(|s| s.slug).collect()
    }

    #[test]
    fn test_visual_learner_gets_uiux_first() {
        let answers: SurveyAnswers = serde_json::from_str(r#"{"10": "Visual"}"#).unwrap();
        let skills = select(&answers);
        assert_eq!(skills[0].slug, "uiux");
        assert_eq!(skills[0].match_percent, 87);
        assert_eq!(skills[1].slug, "content");
        assert_eq!(skills.len(), 2);
    }

    #[test]
    fn test_no_match_returns_only_fallback() {
        assert_eq!(slugs("{}"), vec!["content"]);
    }

    #[test]
    fn test_truncates_in_rule_order() {
        let picked = slugs(
            r#"{"10": "Audio", "5": ["skill_bingung", "terlalu_banyak_pilihan"],
                "13": "Memahami diri lebih dalam"}"#,
        );
        assert_eq!(picked, vec!["uiux", "webdev", "writing"]);
    }

    #[test]
    fn test_three_matches_skip_fallback() {
        let picked = slugs(r#"{"10": "Reading", "5": ["skill_bingung", "terlalu_banyak_pilihan"]}"#);
        assert_eq!(picked, vec!["uiux", "webdev", "writing"]);
    }

    #[test]
    fn test_match_serializes_as_match() {
        let json = serde_json::to_value(FALLBACK.to_skill()).unwrap();
        assert_eq!(json["match"], 75);
        assert_eq!(json["slug"], "content");
    }
}
