//! Identifier lookup and analysis of a single record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PitchlensError, Result};
use crate::input::{
    GoalkeeperRecord, GoalkeeperTable, PlayerId, PlayerRecord, PlayerTable, RecordTable,
    TableRecord,
};
use crate::llm::{Analyzable, Generation, InferenceClient, InferenceError};
use crate::store::RecordStore;

/// Which kind of record is being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Goalkeeper,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "player" | "players" => Ok(Role::Player),
            "goalkeeper" | "goalkeepers" | "keeper" | "gk" => Ok(Role::Goalkeeper),
            _ => Err(format!("Unknown role: {}. Use player or goalkeeper.", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player => write!(f, "player"),
            Role::Goalkeeper => write!(f, "goalkeeper"),
        }
    }
}

/// Analysis of one player or goalkeeper.
///
/// Serializes as `{"Player ID": .., "Analysis": ..}`; a failed generation is
/// written as [`InferenceError::SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    #[serde(rename = "Player ID")]
    pub player_id: PlayerId,

    #[serde(rename = "Analysis", serialize_with = "serialize_generation")]
    pub analysis: Generation,
}

impl AnalysisResult {
    pub fn new(player_id: PlayerId, analysis: Generation) -> Self {
        Self {
            player_id,
            analysis,
        }
    }

    /// Generated text, or the sentinel when generation failed.
    pub fn text(&self) -> &str {
        match &self.analysis {
            Ok(text) => text,
            Err(_) => InferenceError::SENTINEL,
        }
    }

    pub fn is_success(&self) -> bool {
        self.analysis.is_ok()
    }

    pub fn error(&self) -> Option<&InferenceError> {
        self.analysis.as_ref().err()
    }
}

fn serialize_generation<S: Serializer>(
    generation: &Generation,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match generation {
        Ok(text) => serializer.serialize_str(text),
        Err(_) => serializer.serialize_str(InferenceError::SENTINEL),
    }
}

/// Resolves identifiers to records and obtains their analysis.
pub struct Analyzer {
    client: InferenceClient,
}

impl Analyzer {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &InferenceClient {
        &self.client
    }

    /// Analyze the first player in `table` with identifier `id`.
    ///
    /// Returns a single-element list so player and goalkeeper results can be
    /// concatenated for export. An absent identifier is an error.
    pub fn analyze_player(
        &self,
        table: &PlayerTable,
        id: &PlayerId,
    ) -> Result<Vec<AnalysisResult>> {
        self.analyze_in(table, id)
    }

    /// Analyze the first goalkeeper in `table` with identifier `id`.
    pub fn analyze_goalkeeper(
        &self,
        table: &GoalkeeperTable,
        id: &PlayerId,
    ) -> Result<Vec<AnalysisResult>> {
        self.analyze_in(table, id)
    }

    /// Resolve `id` across the store's tables for `role` and analyze it.
    ///
    /// Team 1 is searched before team 2 (goalkeeper 1 before goalkeeper 2).
    pub fn analyze_selection(
        &self,
        store: &RecordStore,
        role: Role,
        id: &PlayerId,
    ) -> Result<Vec<AnalysisResult>> {
        let selection = Selection::resolve(store, role, id)?;
        Ok(self.analyze_selected(&selection))
    }

    /// Analyze a record already taken out of the store.
    pub fn analyze_selected(&self, selection: &Selection) -> Vec<AnalysisResult> {
        match selection {
            Selection::Player(record) => vec![self.analyze_record(record)],
            Selection::Goalkeeper(record) => vec![self.analyze_record(record)],
        }
    }

    fn analyze_in<R: Analyzable>(
        &self,
        table: &RecordTable<R>,
        id: &PlayerId,
    ) -> Result<Vec<AnalysisResult>> {
        let record = table
            .find(id)
            .ok_or_else(|| PitchlensError::PlayerNotFound(id.to_string()))??;

        Ok(vec![self.analyze_record(record)])
    }

    fn analyze_record<R: Analyzable>(&self, record: &R) -> AnalysisResult {
        let analysis = self.client.analyze(record);
        if let Err(ref e) = analysis {
            log::warn!("Analysis for {} {} failed: {}", R::KIND, record.player_id(), e);
        }

        AnalysisResult::new(record.player_id().clone(), analysis)
    }
}

/// A record resolved from a [`RecordStore`], detached from its table.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Player(PlayerRecord),
    Goalkeeper(GoalkeeperRecord),
}

impl Selection {
    /// Find the first record for `role` with identifier `id`.
    ///
    /// All four tables must be loaded. Team 1 is searched before team 2.
    pub fn resolve(store: &RecordStore, role: Role, id: &PlayerId) -> Result<Self> {
        store.require_complete()?;
        let not_found = || PitchlensError::PlayerNotFound(id.to_string());

        match role {
            Role::Player => {
                let table = store.player_table_for(id).ok_or_else(not_found)?;
                let record = table.find(id).ok_or_else(not_found)??;
                Ok(Selection::Player(record.clone()))
            }
            Role::Goalkeeper => {
                let table = store.goalkeeper_table_for(id).ok_or_else(not_found)?;
                let record = table.find(id).ok_or_else(not_found)??;
                Ok(Selection::Goalkeeper(record.clone()))
            }
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Selection::Player(_) => Role::Player,
            Selection::Goalkeeper(_) => Role::Goalkeeper,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        match self {
            Selection::Player(record) => record.player_id(),
            Selection::Goalkeeper(record) => record.player_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm::{InferenceConfig, MockTransport, RecordingSleeper, TransportResponse};
    use crate::store::TableSlot;

    fn player(id: &str, fouls: i64) -> PlayerRecord {
        PlayerRecord {
            player_id: PlayerId::from(id),
            average_speed_over_a_game: Some(7.0),
            no_of_goals_made: Some(1),
            fouls: Some(fouls),
            yellow_card: Some(0),
            red_card: Some(0),
        }
    }

    fn analyzer(transport: &Arc<MockTransport>) -> Analyzer {
        let client = InferenceClient::with_transport(InferenceConfig::default(), transport.clone())
            .with_sleeper(Arc::new(RecordingSleeper::new()));
        Analyzer::new(client)
    }

    #[test]
    fn test_lookup_selects_target() {
        let table = PlayerTable::from_records(
            "team1",
            vec![player("A", 1), player("B", 2), player("C", 3)],
        );
        let transport = Arc::new(MockTransport::new());

        let results = analyzer(&transport)
            .analyze_player(&table, &PlayerId::from("B"))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].player_id, PlayerId::from("B"));
        assert!(transport.requests()[0].inputs.contains("Fouls: 2,"));
    }

    #[test]
    fn test_absent_target_fails_without_request() {
        let table = PlayerTable::from_records("team1", vec![player("A", 1)]);
        let transport = Arc::new(MockTransport::new());

        let err = analyzer(&transport)
            .analyze_player(&table, &PlayerId::from("Z"))
            .unwrap_err();

        assert!(matches!(err, PitchlensError::PlayerNotFound(ref id) if id == "Z"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_goalkeeper_prompt_used() {
        let table = GoalkeeperTable::from_records(
            "gk1",
            vec![GoalkeeperRecord {
                player_id: PlayerId::from(1),
                no_of_goals_save: Some(9),
            }],
        );
        let transport = Arc::new(MockTransport::new());

        analyzer(&transport)
            .analyze_goalkeeper(&table, &PlayerId::from(1))
            .unwrap();

        let prompt = &transport.requests()[0].inputs;
        assert!(prompt.contains("soccer goalkeeper"));
        assert!(prompt.contains("Total Saves: 9."));
    }

    #[test]
    fn test_failure_kept_as_typed_error() {
        let table = PlayerTable::from_records("team1", vec![player("A", 1)]);
        let transport = Arc::new(MockTransport::scripted(vec![TransportResponse::new(
            500, "down",
        )]));

        let results = analyzer(&transport)
            .analyze_player(&table, &PlayerId::from("A"))
            .unwrap();

        assert!(!results[0].is_success());
        assert_eq!(results[0].error().and_then(|e| e.status()), Some(500));
        assert_eq!(results[0].text(), InferenceError::SENTINEL);
    }

    #[test]
    fn test_result_serializes_with_display_keys() {
        let result = AnalysisResult::new(PlayerId::from(7), Ok("Quick.".to_string()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"Player ID": "7", "Analysis": "Quick."}));

        let failed = AnalysisResult::new(
            PlayerId::from(7),
            Err(InferenceError::Transport("offline".to_string())),
        );
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["Analysis"], InferenceError::SENTINEL);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Goalkeeper".parse::<Role>().unwrap(), Role::Goalkeeper);
        assert_eq!("player".parse::<Role>().unwrap(), Role::Player);
        assert!("coach".parse::<Role>().is_err());
        assert_eq!(PlayerRecord::KIND, "player");
    }

    fn store_with_bad_keeper_row() -> RecordStore {
        let header =
            "player_id,average_speed_over_a_game,no_of_goals_made,fouls,yellow_card,red_card\n";
        let team1 = format!("{header}7,8.2,2,3,1,0\n9,,1,0,0,0\n");

        let mut store = RecordStore::new();
        for (slot, csv) in [
            (TableSlot::Team1, team1.as_str()),
            (TableSlot::Team2, header),
            (TableSlot::Goalkeeper1, "player_id,no_of_goals_save\n1,4\n"),
            (TableSlot::Goalkeeper2, "player_id,no_of_goals_save\n2,many\n"),
        ] {
            store.load_bytes(slot, slot.to_string(), csv.as_bytes()).unwrap();
        }
        store
    }

    #[test]
    fn test_unreadable_row_elsewhere_does_not_block() {
        let store = store_with_bad_keeper_row();
        let transport = Arc::new(MockTransport::new());

        let results = analyzer(&transport)
            .analyze_selection(&store, Role::Player, &PlayerId::from(9))
            .unwrap();

        assert!(results[0].is_success());
        assert!(transport.requests()[0].inputs.contains("Average Speed: nan m/s"));
    }

    #[test]
    fn test_unreadable_selected_row_fails_without_request() {
        let store = store_with_bad_keeper_row();
        let transport = Arc::new(MockTransport::new());

        let err = analyzer(&transport)
            .analyze_selection(&store, Role::Goalkeeper, &PlayerId::from(2))
            .unwrap_err();

        assert!(matches!(err, PitchlensError::InvalidValue { ref value, .. } if value == "many"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_selection_is_detached_from_store() {
        let store = store_with_bad_keeper_row();
        let selection =
            Selection::resolve(&store, Role::Goalkeeper, &PlayerId::from(1)).unwrap();
        drop(store);

        assert_eq!(selection.role(), Role::Goalkeeper);
        assert_eq!(selection.player_id(), &PlayerId::from(1));

        let transport = Arc::new(MockTransport::new());
        let results = analyzer(&transport).analyze_selected(&selection);
        assert_eq!(results.len(), 1);
        assert!(transport.requests()[0].inputs.contains("Total Saves: 4."));
    }
}
