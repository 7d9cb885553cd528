//! Growth-edge deriver: learning obstacles mapped to counter-tips

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::survey::{ids, SurveyAnswers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/generated/")]
pub struct GrowthEdge {
    pub pattern: String,
    pub tip: String,
}

/// obstacle token -> (pattern, tip)
pub static EDGES: [(&str, &str, &str); 5] = [
    (
        "nggak_tau_mulai",
        "overwhelmed by options",
        "Pick one small step hari ini. Nggak harus sempurna.",
    ),
    (
        "terlalu_banyak_resources",
        "analysis paralysis",
        "Batasi diri cuma 1 resource per minggu.",
    ),
    (
        "nggak_ada_support",
        "isolation",
        "Share progress kamu, even kecil-kecilan, di komunitas.",
    ),
    (
        "cepet_bosan",
        "low sustained interest",
        "Coba format belajar yang beda dari biasanya.",
    ),
    (
        "nggak_ada_waktu",
        "time management",
        "Start with 15 menit/hari. Consistency > duration.",
    ),
];

/// Edges for each selected obstacle, in selection order. Unknown tokens are skipped.
pub fn derive(answers: &SurveyAnswers) -> Vec<GrowthEdge> {
    answers
        .tokens(ids::LEARNING_OBSTACLES)
        .unwrap_or_default()
        .iter()
        .filter_map(|obstacle| {
            EDGES
                .iter()
                .find(|(token, _, _)| *token == obstacle.as_str())
                .map(|(_, pattern, tip)| GrowthEdge {
                    pattern: (*pattern).to_string(),
                    tip: (*tip).to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_order_is_kept() {
        let answers: SurveyAnswers =
            serde_json::from_str(r#"{"9": ["nggak_ada_waktu", "bogus", "nggak_tau_mulai"]}"#).unwrap();
        let edges = derive(&answers);
        let patterns: Vec<_> = edges.iter().map(|e| e.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["time management", "overwhelmed by options"]);
    }

    #[test]
    fn test_absent_or_malformed_yields_nothing() {
        assert!(derive(&SurveyAnswers::new()).is_empty());
        let answers: SurveyAnswers = serde_json::from_str(r#"{"9": "cepet_bosan"}"#).unwrap();
        assert!(derive(&answers).is_empty());
    }
}
