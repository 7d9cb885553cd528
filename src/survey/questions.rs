//! Static catalog of the 15 self-assessment questions

use serde::Serialize;

/// Question identifiers referenced by the scoring rules
pub mod ids {
    pub const AGE: u8 = 1;
    pub const STATUS: u8 = 2;
    pub const FEELING_LOST: u8 = 3;
    pub const SELF_UNDERSTANDING: u8 = 4;
    pub const LOST_FACTORS: u8 = 5;
    pub const BRAINROT_PLATFORM: u8 = 6;
    pub const AFTER_SCROLL_FEELINGS: u8 = 7;
    pub const SKILL_CONFUSION: u8 = 8;
    pub const LEARNING_OBSTACLES: u8 = 9;
    pub const LEARNING_STYLE: u8 = 10;
    pub const COMMUNITY_EXPERIENCE: u8 = 11;
    pub const SHARING_COMFORT: u8 = 12;
    pub const PRIMARY_NEED: u8 = 13;
    pub const ENERGY_PATTERN: u8 = 14;
    pub const WORK_PREFERENCE: u8 = 15;
}

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// One option token
    Single,
    /// One integer within `min..=max`
    Scale { min: i64, max: i64 },
    /// A set of option tokens, optionally capped
    Multi { max_select: Option<usize> },
}

/// Value carried by a selectable option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Token(&'static str),
    Number(i64),
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuestionOption {
    pub value: OptionValue,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: u8,
    pub question: &'static str,
    pub kind: QuestionKind,
    pub options: &'static [QuestionOption],
}

impl Question {
    /// Whether `token` is one of this question's option tokens
    pub fn has_token(&self, token: &str) -> bool {
        self.options
            .iter()
            .any(|o| matches!(o.value, OptionValue::Token(t) if t == token))
    }
}

const fn token(value: &'static str, label: &'static str) -> QuestionOption {
    QuestionOption { value: OptionValue::Token(value), label }
}

const fn plain(value: &'static str) -> QuestionOption {
    token(value, value)
}

const fn scale(value: i64, label: &'static str) -> QuestionOption {
    QuestionOption { value: OptionValue::Number(value), label }
}

pub static QUESTIONS: [Question; 15] = [
    Question {
        id: ids::AGE,
        question: "Umur kamu?",
        kind: QuestionKind::Single,
        options: &[plain("18-20"), plain("21-23"), plain("24-26"), plain("27+")],
    },
    Question {
        id: ids::STATUS,
        question: "Status kamu?",
        kind: QuestionKind::Single,
        options: &[plain("Mahasiswa"), plain("Kerja"), plain("Fresh grad"), plain("Gap year")],
    },
    Question {
        id: ids::FEELING_LOST,
        question: "Seberapa sering feeling lost?",
        kind: QuestionKind::Single,
        options: &[
            plain("Hampir tiap hari"),
            plain("Seminggu beberapa kali"),
            plain("Kadang-kadang"),
            plain("Jarang"),
        ],
    },
    Question {
        id: ids::SELF_UNDERSTANDING,
        question: "Seberapa paham diri sendiri?",
        kind: QuestionKind::Scale { min: 1, max: 5 },
        options: &[
            scale(1, "1 - Nggak ngerti sama sekali"),
            scale(2, "2 - Ngerti dikit"),
            scale(3, "3 - Lumayan ngerti"),
            scale(4, "4 - Cukup paham"),
            scale(5, "5 - Paham banget"),
        ],
    },
    Question {
        id: ids::LOST_FACTORS,
        question: "Apa yang bikin 'hilang' dari diri?",
        kind: QuestionKind::Multi { max_select: None },
        options: &[
            token("scroll_sosmed", "Scroll sosmed terlalu lama"),
            token("tekanan_ortu", "Tekanan ortu/keluarga"),
            token("ngebanding", "Ngebanding-bandingin diri"),
            token("ekspektasi", "Terlalu banyak ekspektasi"),
            token("skill_bingung", "Nggak tau skill apa yang mau dipelajari"),
            token("terlalu_banyak_pilihan", "Terlalu banyak pilihan"),
            token("takut_salah", "Takut salah pilih jalan hidup"),
            token("standar_orang", "Harus ikut standar orang lain"),
        ],
    },
    Question {
        id: ids::BRAINROT_PLATFORM,
        question: "Platform yang paling bikin brainrot?",
        kind: QuestionKind::Single,
        options: &[
            plain("TikTok"),
            plain("Instagram"),
            plain("Twitter/X"),
            plain("YouTube Shorts"),
            plain("Facebook"),
        ],
    },
    Question {
        id: ids::AFTER_SCROLL_FEELINGS,
        question: "Perasaan after scroll lama?",
        kind: QuestionKind::Multi { max_select: Some(3) },
        options: &[
            token("capek_mental", "Capek mental"),
            token("insecure", "Insecure"),
            token("overwhelmed", "Overwhelmed"),
            token("guilty", "Guilty"),
            token("kosong", "Kosong/hampa"),
            token("termotivasi", "Termotivasi"),
        ],
    },
    Question {
        id: ids::SKILL_CONFUSION,
        question: "Lagi bingung skill apa yang mau dipelajari?",
        kind: QuestionKind::Single,
        options: &[
            plain("Iya, bingung banget"),
            plain("Agak bingung"),
            plain("Nggak, udah tau"),
            plain("Nggak tertarik"),
        ],
    },
    Question {
        id: ids::LEARNING_OBSTACLES,
        question: "Kenapa biasanya berhenti belajar skill?",
        kind: QuestionKind::Multi { max_select: Some(3) },
        options: &[
            token("nggak_tau_mulai", "Nggak tau mulai dari mana"),
            token("terlalu_banyak_resources", "Terlalu banyak resources"),
            token("nggak_ada_support", "Nggak ada support"),
            token("cepet_bosan", "Cepet bosan"),
            token("nggak_ada_waktu", "Nggak ada waktu"),
        ],
    },
    Question {
        id: ids::LEARNING_STYLE,
        question: "Cara belajar yang efektif?",
        kind: QuestionKind::Single,
        options: &[
            token("Visual", "Visual (video, diagram)"),
            token("Hands-on", "Hands-on (praktek langsung)"),
            token("Reading", "Reading (artikel, buku)"),
            token("Audio", "Audio (podcast, diskusi)"),
        ],
    },
    Question {
        id: ids::COMMUNITY_EXPERIENCE,
        question: "Pengalaman dengan komunitas online?",
        kind: QuestionKind::Single,
        options: &[
            plain("Mostly positif"),
            plain("Mixed"),
            plain("Mostly negatif"),
            plain("Belum pernah join"),
        ],
    },
    Question {
        id: ids::SHARING_COMFORT,
        question: "Seberapa nyaman share kebingungan?",
        kind: QuestionKind::Single,
        options: &[
            plain("Nyaman banget, asal anonim"),
            plain("Nyaman kalau kecil & aman"),
            plain("Nggak terlalu nyaman"),
            plain("Nggak mau share"),
        ],
    },
    Question {
        id: ids::PRIMARY_NEED,
        question: "Yang paling kamu butuhin?",
        kind: QuestionKind::Single,
        options: &[
            plain("Memahami diri lebih dalam"),
            plain("Tempat nulis/refleksi"),
            plain("Komunitas kecil"),
            plain("Panduan skill"),
            plain("Ngobrol sama mentor"),
        ],
    },
    Question {
        id: ids::ENERGY_PATTERN,
        question: "Energy pattern kamu?",
        kind: QuestionKind::Single,
        options: &[plain("Morning person"), plain("Night owl"), plain("Flexible")],
    },
    Question {
        id: ids::WORK_PREFERENCE,
        question: "Prefer kerja solo atau bareng?",
        kind: QuestionKind::Single,
        options: &[plain("Solo"), plain("Bareng tim"), plain("Depends on task")],
    },
];

/// Look up a question by id
pub fn question(id: u8) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// All questions in presentation order
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_sequential() {
        for (i, q) in QUESTIONS.iter().enumerate() {
            assert_eq!(q.id as usize, i + 1);
        }
    }

    #[test]
    fn test_multi_caps() {
        assert_eq!(question(5).unwrap().kind, QuestionKind::Multi { max_select: None });
        assert_eq!(question(7).unwrap().kind, QuestionKind::Multi { max_select: Some(3) });
        assert_eq!(question(9).unwrap().kind, QuestionKind::Multi { max_select: Some(3) });
    }

    #[test]
    fn test_has_token() {
        let q = question(ids::LEARNING_STYLE).unwrap();
        assert!(q.has_token("Hands-on"));
        assert!(!q.has_token("Hands-on (praktek langsung)"));
        assert!(question(16).is_none());
    }
}
