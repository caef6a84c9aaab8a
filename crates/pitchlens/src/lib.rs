//! Pitchlens: LLM-backed performance summaries for soccer players and goalkeepers.
//!
//! Pitchlens loads player and goalkeeper statistics from CSV uploads, lets a
//! caller pick one individual, and asks a hosted text-generation model for a
//! performance description with suggested improvements.
//!
//! # Core Pieces
//!
//! - **Record store**: four immutable in-memory tables (two teams, two goalkeepers)
//! - **Inference client**: prompt building plus a bounded retry loop around the endpoint
//! - **Analyzer**: identifier lookup feeding the inference client
//! - **Session/export**: concatenated results rendered as CSV
//!
//! # Example
//!
//! ```no_run
//! use pitchlens::{
//!     Analyzer, EnvSecret, InferenceClient, InferenceConfig, PlayerId, RecordStore, Role,
//!     Session,
//! };
//!
//! let store = RecordStore::from_files("team1.csv", "team2.csv", "gk1.csv", "gk2.csv").unwrap();
//! let client = InferenceClient::new(InferenceConfig::from_env(), &EnvSecret::new()).unwrap();
//! let analyzer = Analyzer::new(client);
//!
//! let mut session = Session::new();
//! let results = analyzer
//!     .analyze_selection(&store, Role::Player, &PlayerId::from(7))
//!     .unwrap();
//! println!("{}", results[0].text());
//! session.record(Role::Player, results);
//! session.save_csv("performance_analysis.csv").unwrap();
//! ```

pub mod analyzer;
pub mod error;
pub mod export;
pub mod input;
pub mod llm;
pub mod session;
pub mod store;

pub use analyzer::{AnalysisResult, Analyzer, Role, Selection};
pub use error::{PitchlensError, Result};
pub use export::{DEFAULT_EXPORT_FILE, save_csv, to_csv_string, write_csv};
pub use input::{
    DataTable, GoalkeeperRecord, GoalkeeperTable, InvalidCell, Parser, PlayerId, PlayerRecord,
    PlayerTable, SourceMetadata,
};
pub use llm::{
    Analyzable, EnvSecret, Generation, InferenceClient, InferenceConfig, InferenceError,
    MockTransport, SecretProvider, StaticSecret, Transport, TransportResponse,
};
pub use session::Session;
pub use store::{RecordStore, TableSlot};
