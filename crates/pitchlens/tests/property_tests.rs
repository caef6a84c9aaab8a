//! Property-based tests for prompt construction and export.
//!
//! ```bash
//! cargo test -p pitchlens --test property_tests
//! PROPTEST_CASES=10000 cargo test -p pitchlens --test property_tests
//! ```

use proptest::option;
use proptest::prelude::*;

use pitchlens::llm::INSTRUCTION;
use pitchlens::{
    AnalysisResult, Analyzable, GoalkeeperRecord, PlayerId, PlayerRecord, to_csv_string,
};

// =============================================================================
// Test Strategies
// =============================================================================

fn player_record() -> impl Strategy<Value = PlayerRecord> {
    (
        "[A-Za-z0-9]{1,8}",
        option::of(0.0f64..20.0),
        option::of(0i64..50),
        option::of(0i64..30),
        option::of(0i64..10),
        option::of(0i64..3),
    )
        .prop_map(|(id, speed, goals, fouls, yellow, red)| PlayerRecord {
            player_id: PlayerId::from(id),
            average_speed_over_a_game: speed,
            no_of_goals_made: goals,
            fouls,
            yellow_card: yellow,
            red_card: red,
        })
}

// =============================================================================
// Prompt Properties
// =============================================================================

proptest! {
    #[test]
    fn player_prompt_embeds_metrics_in_order(record in player_record()) {
        let prompt = record.prompt();

        let positions: Vec<usize> = [
            format!("Average Speed: {}", record.metrics()["average_speed_over_a_game"]),
            format!("Goals: {}", record.metrics()["no_of_goals_made"]),
            format!("Fouls: {}", record.metrics()["fouls"]),
            format!("Yellow Cards: {}", record.metrics()["yellow_card"]),
            format!("Red Cards: {}", record.metrics()["red_card"]),
        ]
        .iter()
        .map(|needle| prompt.find(needle.as_str()).expect("metric missing from prompt"))
        .collect();

        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(prompt.ends_with(INSTRUCTION));
    }

    #[test]
    fn prompt_is_deterministic(record in player_record()) {
        prop_assert_eq!(record.prompt(), record.clone().prompt());
    }

    #[test]
    fn goalkeeper_prompt_embeds_saves(saves in 0i64..1000) {
        let record = GoalkeeperRecord {
            player_id: PlayerId::from("gk"),
            no_of_goals_save: Some(saves),
        };
        let prompt = record.prompt();

        let expected = format!("Total Saves: {}.\n", saves);
        prop_assert!(prompt.contains(&expected));
        prop_assert!(prompt.ends_with(INSTRUCTION));
    }

    #[test]
    fn export_has_one_row_per_result(texts in prop::collection::vec("[ -~\n]{0,40}", 0..10)) {
        let results: Vec<AnalysisResult> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| AnalysisResult::new(PlayerId::from(i as i64), Ok(t.clone())))
            .collect();

        let csv = to_csv_string(&results).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let headers = reader.headers().unwrap().clone();
        prop_assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Player ID", "Analysis"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        prop_assert_eq!(rows.len(), results.len());
        for (row, text) in rows.iter().zip(&texts) {
            prop_assert_eq!(&row[1], text.as_str());
        }
    }
}
