//! GenMave - self-reflection backend
//!
//! Serves the clarity compass survey, 7-day skill challenges and a private
//! journal to the web client over a JSON HTTP API.
//!
//! ## Layers
//!
//! - **Domain**: `survey`, `scoring`, `challenge`, `journal` are pure and
//!   synchronous. No I/O, no clocks except where a timestamp is passed in.
//! - **Persistence**: `db` holds the SQLite schema and Diesel repositories.
//! - **Services**: validation, transactions and events over the two above.
//! - **HTTP**: thin hyper handlers over `Services`.
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.local/share/genmave/
//! ├── genmave.db        # SQLite (WAL mode)
//! └── config.toml       # Configuration
//! ```
//!
//! Drafts live in memory only and are lost on restart.

pub mod challenge;
pub mod config;
pub mod db;
pub mod drafts;
pub mod error;
pub mod http;
pub mod journal;
pub mod scoring;
pub mod services;
pub mod survey;

// Re-exports
pub use challenge::{ChallengeError, ChallengeProgress, ChallengeStatus};
pub use config::Config;
pub use db::Database;
pub use drafts::{Draft, DraftKind, DraftStore};
pub use error::GenmaveError;
pub use http::HttpServer;
pub use scoring::{compute_assessment, ClarityAssessment};
pub use services::{EventBus, GenmaveEvent, Services};
pub use survey::SurveyAnswers;
