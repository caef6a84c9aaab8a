//! The four uploaded tables of a session.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{PitchlensError, Result};
use crate::input::{
    DataTable, GoalkeeperTable, Parser, PlayerId, PlayerTable, SourceMetadata,
};

/// Upload slot a CSV file is loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSlot {
    Team1,
    Team2,
    Goalkeeper1,
    Goalkeeper2,
}

impl TableSlot {
    pub const ALL: [TableSlot; 4] = [
        TableSlot::Team1,
        TableSlot::Team2,
        TableSlot::Goalkeeper1,
        TableSlot::Goalkeeper2,
    ];

    /// Upload prompt shown in user interfaces.
    pub fn description(&self) -> &'static str {
        match self {
            TableSlot::Team1 => "Team 1 Player Data",
            TableSlot::Team2 => "Team 2 Player Data",
            TableSlot::Goalkeeper1 => "Goalkeeper 1 Data",
            TableSlot::Goalkeeper2 => "Goalkeeper 2 Data",
        }
    }
}

impl FromStr for TableSlot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "team1" => Ok(TableSlot::Team1),
            "team2" => Ok(TableSlot::Team2),
            "goalkeeper1" | "keeper1" | "gk1" => Ok(TableSlot::Goalkeeper1),
            "goalkeeper2" | "keeper2" | "gk2" => Ok(TableSlot::Goalkeeper2),
            _ => Err(format!(
                "Unknown slot: {}. Use team1, team2, goalkeeper1 or goalkeeper2.",
                s
            )),
        }
    }
}

impl fmt::Display for TableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSlot::Team1 => write!(f, "team1"),
            TableSlot::Team2 => write!(f, "team2"),
            TableSlot::Goalkeeper1 => write!(f, "goalkeeper1"),
            TableSlot::Goalkeeper2 => write!(f, "goalkeeper2"),
        }
    }
}

/// In-memory player and goalkeeper tables.
///
/// Tables are replaced whole on re-upload and never modified in place.
#[derive(Debug, Default)]
pub struct RecordStore {
    parser: Parser,
    team1: Option<PlayerTable>,
    team2: Option<PlayerTable>,
    goalkeeper1: Option<GoalkeeperTable>,
    goalkeeper2: Option<GoalkeeperTable>,
    sources: IndexMap<TableSlot, SourceMetadata>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all four tables from disk.
    pub fn from_files(
        team1: impl AsRef<Path>,
        team2: impl AsRef<Path>,
        goalkeeper1: impl AsRef<Path>,
        goalkeeper2: impl AsRef<Path>,
    ) -> Result<Self> {
        let mut store = Self::new();
        store.load_file(TableSlot::Team1, team1)?;
        store.load_file(TableSlot::Team2, team2)?;
        store.load_file(TableSlot::Goalkeeper1, goalkeeper1)?;
        store.load_file(TableSlot::Goalkeeper2, goalkeeper2)?;
        Ok(store)
    }

    /// Parse and load a CSV file into a slot.
    pub fn load_file(
        &mut self,
        slot: TableSlot,
        path: impl AsRef<Path>,
    ) -> Result<&SourceMetadata> {
        let (table, metadata) = self.parser.parse_file(path)?;
        self.install(slot, &table, metadata)
    }

    /// Parse and load uploaded CSV bytes into a slot.
    pub fn load_bytes(
        &mut self,
        slot: TableSlot,
        label: impl Into<String>,
        bytes: &[u8],
    ) -> Result<&SourceMetadata> {
        let (table, metadata) = self.parser.parse_bytes(label, bytes)?;
        self.install(slot, &table, metadata)
    }

    fn install(
        &mut self,
        slot: TableSlot,
        table: &DataTable,
        metadata: SourceMetadata,
    ) -> Result<&SourceMetadata> {
        let label = metadata.label.clone();
        match slot {
            TableSlot::Team1 => self.team1 = Some(PlayerTable::from_data(label, table)?),
            TableSlot::Team2 => self.team2 = Some(PlayerTable::from_data(label, table)?),
            TableSlot::Goalkeeper1 => {
                self.goalkeeper1 = Some(GoalkeeperTable::from_data(label, table)?)
            }
            TableSlot::Goalkeeper2 => {
                self.goalkeeper2 = Some(GoalkeeperTable::from_data(label, table)?)
            }
        }

        log::info!(
            "Loaded {} ({} rows) into {}",
            metadata.label,
            metadata.row_count,
            slot
        );
        self.sources.insert(slot, metadata);
        Ok(&self.sources[&slot])
    }

    /// Metadata of loaded slots, in load order.
    pub fn sources(&self) -> impl Iterator<Item = (&TableSlot, &SourceMetadata)> {
        self.sources.iter()
    }

    pub fn is_loaded(&self, slot: TableSlot) -> bool {
        self.sources.contains_key(&slot)
    }

    /// Slots that still need an upload.
    pub fn missing_slots(&self) -> Vec<TableSlot> {
        TableSlot::ALL
            .into_iter()
            .filter(|s| !self.is_loaded(*s))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_slots().is_empty()
    }

    /// Fail with `NotLoaded` naming the first empty slot.
    pub fn require_complete(&self) -> Result<()> {
        match self.missing_slots().first() {
            Some(slot) => Err(PitchlensError::NotLoaded(slot.description().to_string())),
            None => Ok(()),
        }
    }

    pub fn team1(&self) -> Option<&PlayerTable> {
        self.team1.as_ref()
    }

    pub fn team2(&self) -> Option<&PlayerTable> {
        self.team2.as_ref()
    }

    pub fn goalkeeper1(&self) -> Option<&GoalkeeperTable> {
        self.goalkeeper1.as_ref()
    }

    pub fn goalkeeper2(&self) -> Option<&GoalkeeperTable> {
        self.goalkeeper2.as_ref()
    }

    fn player_tables(&self) -> impl Iterator<Item = &PlayerTable> {
        self.team1.iter().chain(self.team2.iter())
    }

    fn goalkeeper_tables(&self) -> impl Iterator<Item = &GoalkeeperTable> {
        self.goalkeeper1.iter().chain(self.goalkeeper2.iter())
    }

    /// Selectable player ids: team 1 then team 2, duplicates removed.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.player_tables()
            .flat_map(|t| t.ids().cloned())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Selectable goalkeeper ids: goalkeeper 1 then goalkeeper 2, as listed.
    pub fn goalkeeper_ids(&self) -> Vec<PlayerId> {
        self.goalkeeper_tables()
            .flat_map(|t| t.ids().cloned())
            .collect()
    }

    /// First player table (team 1 before team 2) containing `id`.
    pub fn player_table_for(&self, id: &PlayerId) -> Option<&PlayerTable> {
        self.player_tables().find(|t| t.contains(id))
    }

    /// First goalkeeper table containing `id`.
    pub fn goalkeeper_table_for(&self, id: &PlayerId) -> Option<&GoalkeeperTable> {
        self.goalkeeper_tables().find(|t| t.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM1: &str =
        "player_id,average_speed_over_a_game,no_of_goals_made,fouls,yellow_card,red_card\n\
         1,7.0,1,0,0,0\n\
         2,7.5,0,2,1,0\n";
    const TEAM2: &str =
        "player_id,average_speed_over_a_game,no_of_goals_made,fouls,yellow_card,red_card\n\
         2,9.9,5,5,5,5\n\
         3,6.1,0,0,0,0\n";
    const GK1: &str = "player_id,no_of_goals_save\n10,4\n";
    const GK2: &str = "player_id,no_of_goals_save\n10,7\n11,2\n";

    fn loaded() -> RecordStore {
        let mut store = RecordStore::new();
        store.load_bytes(TableSlot::Team1, "team1.csv", TEAM1.as_bytes()).unwrap();
        store.load_bytes(TableSlot::Team2, "team2.csv", TEAM2.as_bytes()).unwrap();
        store.load_bytes(TableSlot::Goalkeeper1, "gk1.csv", GK1.as_bytes()).unwrap();
        store.load_bytes(TableSlot::Goalkeeper2, "gk2.csv", GK2.as_bytes()).unwrap();
        store
    }

    #[test]
    fn test_player_ids_deduplicated_in_order() {
        let ids: Vec<String> = loaded().player_ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_goalkeeper_ids_keep_duplicates() {
        let ids: Vec<String> = loaded()
            .goalkeeper_ids()
            .iter()
            .map(|i| i.to_string())
            .collect();
        assert_eq!(ids, vec!["10", "10", "11"]);
    }

    #[test]
    fn test_duplicate_id_resolves_to_team1() {
        let store = loaded();
        let table = store.player_table_for(&PlayerId::from(2)).unwrap();
        assert_eq!(table.label(), "team1.csv");

        let table = store.player_table_for(&PlayerId::from(3)).unwrap();
        assert_eq!(table.label(), "team2.csv");

        assert!(store.player_table_for(&PlayerId::from(99)).is_none());
    }

    #[test]
    fn test_completeness() {
        let mut store = RecordStore::new();
        assert!(!store.is_complete());
        store.load_bytes(TableSlot::Team1, "t1", TEAM1.as_bytes()).unwrap();
        assert_eq!(store.missing_slots().len(), 3);

        match store.require_complete() {
            Err(PitchlensError::NotLoaded(what)) => assert_eq!(what, "Team 2 Player Data"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(loaded().require_complete().is_ok());
    }

    #[test]
    fn test_wrong_table_kind_rejected() {
        let mut store = RecordStore::new();
        let err = store
            .load_bytes(TableSlot::Team1, "gk.csv", GK1.as_bytes())
            .unwrap_err();
        assert!(matches!(err, PitchlensError::MissingColumn { .. }));
        assert!(!store.is_loaded(TableSlot::Team1));
    }

    #[test]
    fn test_slot_parse() {
        assert_eq!("gk-1".parse::<TableSlot>().unwrap(), TableSlot::Goalkeeper1);
        assert_eq!("Team_2".parse::<TableSlot>().unwrap(), TableSlot::Team2);
        assert!("bench".parse::<TableSlot>().is_err());
    }
}
