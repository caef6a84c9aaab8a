//! Analyses performed during one interactive session.

use std::path::Path;

use crate::analyzer::{AnalysisResult, Role};
use crate::error::Result;
use crate::export;

/// Player and goalkeeper analyses collected for export.
///
/// Results are only concatenated, never merged or de-duplicated: analyzing
/// the same identifier twice yields two rows.
#[derive(Debug, Default, Clone)]
pub struct Session {
    players: Vec<AnalysisResult>,
    goalkeepers: Vec<AnalysisResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append results of an analysis for `role`.
    pub fn record(&mut self, role: Role, results: Vec<AnalysisResult>) {
        match role {
            Role::Player => self.players.extend(results),
            Role::Goalkeeper => self.goalkeepers.extend(results),
        }
    }

    pub fn players(&self) -> &[AnalysisResult] {
        &self.players
    }

    pub fn goalkeepers(&self) -> &[AnalysisResult] {
        &self.goalkeepers
    }

    /// Player analyses followed by goalkeeper analyses.
    pub fn combined(&self) -> Vec<AnalysisResult> {
        self.players
            .iter()
            .chain(self.goalkeepers.iter())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.players.len() + self.goalkeepers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.goalkeepers.clear();
    }

    /// Combined results as CSV text.
    pub fn to_csv(&self) -> Result<String> {
        export::to_csv_string(&self.combined())
    }

    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        export::save_csv(&self.combined(), path)
    }
}
