//! Prompt templates for performance analysis requests.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::input::{GoalkeeperRecord, PlayerRecord, TableRecord};

/// Instruction appended to every prompt.
pub const INSTRUCTION: &str = "Provide a performance description and suggest improvements.";

/// A single metric value taken from a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    /// Blank cell in the upload.
    Missing,
}

impl From<Option<i64>> for MetricValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(MetricValue::Missing, MetricValue::Int)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::Missing, MetricValue::Float)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(n) => write!(f, "{}", n),
            // Keep a trailing ".0" so whole speeds still read as measurements
            MetricValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Missing => f.write_str("nan"),
        }
    }
}

/// Metric name to value, in prompt order.
pub type Metrics = IndexMap<&'static str, MetricValue>;

/// How one metric is worded in a prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptField {
    /// Key in the [`Metrics`] mapping.
    pub key: &'static str,
    /// Label shown to the model.
    pub label: &'static str,
    /// Unit suffix, if any.
    pub unit: Option<&'static str>,
}

/// A fixed prompt layout for one kind of record.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    /// What is being analyzed ("player", "goalkeeper").
    pub subject: &'static str,
    pub fields: &'static [PromptField],
}

pub const PLAYER_TEMPLATE: PromptTemplate = PromptTemplate {
    subject: "player",
    fields: &[
        PromptField {
            key: "average_speed_over_a_game",
            label: "Average Speed",
            unit: Some("m/s"),
        },
        PromptField {
            key: "no_of_goals_made",
            label: "Goals",
            unit: None,
        },
        PromptField {
            key: "fouls",
            label: "Fouls",
            unit: None,
        },
        PromptField {
            key: "yellow_card",
            label: "Yellow Cards",
            unit: None,
        },
        PromptField {
            key: "red_card",
            label: "Red Cards",
            unit: None,
        },
    ],
};

pub const GOALKEEPER_TEMPLATE: PromptTemplate = PromptTemplate {
    subject: "goalkeeper",
    fields: &[PromptField {
        key: "no_of_goals_save",
        label: "Total Saves",
        unit: None,
    }],
};

impl PromptTemplate {
    /// Render the prompt for a set of metrics.
    ///
    /// Fields appear in template order. A metric missing from the mapping is
    /// written as `unknown` rather than silently dropped.
    pub fn render(&self, metrics: &Metrics) -> String {
        let values = self
            .fields
            .iter()
            .map(|field| {
                let value = metrics
                    .get(field.key)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                match field.unit {
                    Some(unit) => format!("{}: {} {}", field.label, value, unit),
                    None => format!("{}: {}", field.label, value),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Analyze the performance of a soccer {} with the following metrics:\n{}.\n{}",
            self.subject, values, INSTRUCTION
        )
    }
}

/// A record that can be sent for analysis.
pub trait Analyzable: TableRecord {
    fn template() -> &'static PromptTemplate;

    /// Metric subset embedded in the prompt, in prompt order.
    fn metrics(&self) -> Metrics;

    fn prompt(&self) -> String {
        Self::template().render(&self.metrics())
    }
}

impl Analyzable for PlayerRecord {
    fn template() -> &'static PromptTemplate {
        &PLAYER_TEMPLATE
    }

    fn metrics(&self) -> Metrics {
        let mut metrics = IndexMap::new();
        metrics.insert(
            "average_speed_over_a_game",
            self.average_speed_over_a_game.into(),
        );
        metrics.insert("no_of_goals_made", self.no_of_goals_made.into());
        metrics.insert("fouls", self.fouls.into());
        metrics.insert("yellow_card", self.yellow_card.into());
        metrics.insert("red_card", self.red_card.into());
        metrics
    }
}

impl Analyzable for GoalkeeperRecord {
    fn template() -> &'static PromptTemplate {
        &GOALKEEPER_TEMPLATE
    }

    fn metrics(&self) -> Metrics {
        let mut metrics = IndexMap::new();
        metrics.insert("no_of_goals_save", self.no_of_goals_save.into());
        metrics
    }
}
