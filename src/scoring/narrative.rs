//! Narrative composition from fixed bullet fragments

use crate::survey::{ids, SurveyAnswers};

pub const HEADER: &str = "Berdasarkan jawaban kamu, kamu termasuk orang yang:\n\n";

pub const CLOSING: &str = "Kamu nggak sendirian dalam perjalanan ini. Ribuan Gen Z lainnya juga sedang mencari cara untuk kembali ke diri sendiri.";

/// One bullet source
#[derive(Debug, Clone, Copy)]
pub enum Fragment {
    /// Bullet text looked up from the answer token
    Lookup {
        question: u8,
        table: &'static [(&'static str, &'static str)],
    },
    /// The answer itself, lower-cased, after a prefix
    Echo { question: u8, prefix: &'static str },
}

impl Fragment {
    fn bullet(&self, answers: &SurveyAnswers) -> Option<String> {
        match *self {
            Fragment::Lookup { question, table } => {
                let token = answers.text(question)?;
                table
                    .iter()
                    .find(|(key, _)| *key == token)
                    .map(|(_, text)| (*text).to_string())
            }
            Fragment::Echo { question, prefix } => {
                let token = answers.text(question)?.trim();
                if token.is_empty() {
                    return None;
                }
                Some(format!("{}{}", prefix, token.to_lowercase()))
            }
        }
    }
}

const LOST_PATTERN: &str = "Sering merasa lost dan mencari arah yang lebih jelas";
const CLEAR_PATTERN: &str = "Sudah cukup jelas dengan arah hidupmu";

/// Bullets in output order: frequency pattern, learning style, energy,
/// work preference, primary need
pub static FRAGMENTS: [Fragment; 5] = [
    Fragment::Lookup {
        question: ids::FEELING_LOST,
        table: &[
            ("Hampir tiap hari", LOST_PATTERN),
            ("Seminggu beberapa kali", LOST_PATTERN),
            ("Kadang-kadang", CLEAR_PATTERN),
            ("Jarang", CLEAR_PATTERN),
        ],
    },
    Fragment::Lookup {
        question: ids::LEARNING_STYLE,
        table: &[
            ("Visual", "belajar paling efektif dengan video dan visualisasi"),
            ("Hands-on", "belajar paling efektif dengan hands-on practice"),
            ("Reading", "belajar paling efektif dengan membaca dan refleksi"),
            ("Audio", "belajar paling efektif dengan mendengar dan diskusi"),
        ],
    },
    Fragment::Lookup {
        question: ids::ENERGY_PATTERN,
        table: &[
            ("Morning person", "paling produktif di pagi hari"),
            ("Night owl", "paling produktif di malam hari"),
            ("Flexible", "bisa fleksibel dengan waktu produktif"),
        ],
    },
    Fragment::Lookup {
        question: ids::WORK_PREFERENCE,
        table: &[
            ("Solo", "lebih suka bekerja sendiri"),
            ("Bareng tim", "lebih suka bekerja dalam tim"),
            ("Depends on task", "fleksibel antara solo dan tim tergantung tugas"),
        ],
    },
    Fragment::Echo {
        question: ids::PRIMARY_NEED,
        prefix: "Saat ini butuh: ",
    },
];

/// Compose the narrative text. Never fails: missing answers drop their bullet.
pub fn compose(answers: &SurveyAnswers) -> String {
    let mut narrative = FRAGMENTS
        .iter()
        .filter_map(|f| f.bullet(answers))
        .fold(String::from(HEADER), |mut acc, bullet| {
            acc.push_str("- ");
            acc.push_str(&bullet);
            acc.push('\n');
            acc
        });
    narrative.push('\n');
    narrative.push_str(CLOSING);
    narrative
}
