//! Spread definitions and the spread catalog
//!
//! A spread is a name plus an ordered list of position labels; its card
//! count is the number of positions. Built-in spreads are constants, custom
//! spreads are assembled at runtime from a count, optional labels, and an
//! optional free-form layout captured by the presenter.

use crate::{Result, TarotError};
use serde::{Deserialize, Serialize};

/// Upper bound for the card count of a custom spread
pub const MAX_CUSTOM_CARDS: usize = 20;

/// Display name given to every custom spread
pub const CUSTOM_SPREAD_NAME: &str = "Custom Spread";

/// 2D position of a spread slot on the presenter's canvas
///
/// The core never interprets these; they are stored and handed back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f32,
    pub y: f32,
}

impl LayoutPoint {
    pub fn new(x: f32, y: f32) -> Self {
        LayoutPoint { x, y }
    }
}

/// How a spread was requested, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadSpec {
    /// A built-in spread by key (e.g., "three-card")
    Predefined(String),
    /// A user-defined spread
    Custom {
        count: usize,
        labels: Vec<String>,
        layout: Option<Vec<LayoutPoint>>,
    },
}

/// A normalized spread, as consumed by a draw session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spread {
    /// Catalog key for built-ins, `None` for custom spreads
    pub key: Option<String>,
    pub name: String,
    pub positions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<LayoutPoint>>,
}

impl Spread {
    /// Number of cards this spread draws
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_custom(&self) -> bool {
        self.key.is_none()
    }

    pub fn position(&self, index: usize) -> Option<&str> {
        self.positions.get(index).map(String::as_str)
    }

    /// Attach one layout point per position
    pub fn with_layout(mut self, layout: Vec<LayoutPoint>) -> Result<Self> {
        if layout.len() != self.count() {
            return Err(TarotError::LayoutMismatch {
                expected: self.count(),
                actual: layout.len(),
            });
        }
        self.layout = Some(layout);
        Ok(self)
    }

    pub fn layout_point(&self, index: usize) -> Option<LayoutPoint> {
        self.layout.as_ref().and_then(|l| l.get(index).copied())
    }
}

/// Placeholder label for an unnamed position (1-based)
pub fn placeholder_label(index: usize) -> String {
    format!("Position {}", index + 1)
}

struct BuiltinSpread {
    key: &'static str,
    name: &'static str,
    positions: &'static [&'static str],
}

const BUILTIN_SPREADS: &[BuiltinSpread] = &[
    BuiltinSpread {
        key: "one-card",
        name: "One Card",
        positions: &["Core Advice"],
    },
    BuiltinSpread {
        key: "three-card",
        name: "Three Card",
        positions: &["Past", "Present", "Future"],
    },
    BuiltinSpread {
        key: "celtic-cross",
        name: "Celtic Cross",
        positions: &[
            "Present",
            "Challenge",
            "Foundation",
            "Past",
            "Potential",
            "Future",
            "Self",
            "Environment",
            "Hopes and Fears",
            "Outcome",
        ],
    },
];

impl BuiltinSpread {
    fn to_spread(&self) -> Spread {
        Spread {
            key: Some(self.key.to_string()),
            name: self.name.to_string(),
            positions: self.positions.iter().map(|p| p.to_string()).collect(),
            layout: None,
        }
    }
}

/// Registry of built-in spreads plus the custom spread factory
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadCatalog;

impl SpreadCatalog {
    pub fn new() -> Self {
        SpreadCatalog
    }

    /// Built-in spreads in menu order
    pub fn list(&self) -> Vec<Spread> {
        BUILTIN_SPREADS.iter().map(BuiltinSpread::to_spread).collect()
    }

    pub fn get(&self, key: &str) -> Result<Spread> {
        BUILTIN_SPREADS
            .iter()
            .find(|s| s.key == key)
            .map(BuiltinSpread::to_spread)
            .ok_or_else(|| TarotError::UnknownSpread(key.to_string()))
    }

    /// Build a custom spread of `count` positions
    ///
    /// Missing or blank labels become "Position i"; labels past `count` are ignored.
    pub fn make_custom(&self, count: usize, labels: Option<&[String]>) -> Result<Spread> {
        if !(1..=MAX_CUSTOM_CARDS).contains(&count) {
            return Err(TarotError::InvalidCardCount {
                count,
                max: MAX_CUSTOM_CARDS,
            });
        }

        let labels = labels.unwrap_or(&[]);
        let positions = (0..count)
            .map(|i| match labels.get(i).map(|l| l.trim()) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => placeholder_label(i),
            })
            .collect();

        Ok(Spread {
            key: None,
            name: CUSTOM_SPREAD_NAME.to_string(),
            positions,
            layout: None,
        })
    }

    /// Normalize either kind of request into a `Spread`
    pub fn resolve(&self, spec: &SpreadSpec) -> Result<Spread> {
        match spec {
            SpreadSpec::Predefined(key) => self.get(key),
            SpreadSpec::Custom {
                count,
                labels,
                layout,
            } => {
                let spread = self.make_custom(*count, Some(labels.as_slice()))?;
                match layout {
                    Some(points) => spread.with_layout(points.clone()),
                    None => Ok(spread),
                }
            }
        }
    }
}
