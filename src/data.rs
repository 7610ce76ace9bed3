// src/data.rs
//
// Shapes that flow through the pipeline.
//
// - RawEvent:    one event card as read from the page. Transient; built by
//                specs::psel, consumed once by the aggregator.
// - MatchRecord: one real-world match after merging every card that shares its key.
//                Serializes to the published JSON shape.

use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One priced outcome, label already canonical, `value > 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct OddsEntry {
    pub label: String,
    pub value: f64,
}

impl OddsEntry {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

/// Extraction result for one container. Never leaves the extractor with
/// empty `opponents` or empty `odds`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEvent {
    /// Document order: home first.
    pub opponents: Vec<String>,
    pub competition: Option<String>,
    pub date_time_text: Option<String>,
    pub url: Option<String>,
    /// Digits-only path segment of `url`.
    pub external_id: Option<String>,
    pub odds: Vec<OddsEntry>,
}

impl RawEvent {
    pub fn is_usable(&self) -> bool {
        !self.opponents.is_empty() && !self.odds.is_empty()
    }
}

/// Outcome label → provider → odds, in first-seen label order.
///
/// Labels live in a plain list with a position index beside it, so "append if
/// new, else look up" is O(1) and the order is exactly the order labels were
/// first observed. A draw sits in the middle only because the page lists it there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Market {
    labels: Vec<String>,
    quotes: Vec<BTreeMap<String, f64>>,
    index: HashMap<String, usize>,
}

impl Market {
    /// Position of `label`, appending an empty slot if unseen.
    pub fn ensure(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(s!(label));
        self.quotes.push(BTreeMap::new());
        self.index.insert(s!(label), i);
        i
    }

    /// Last write wins per (label, provider).
    pub fn set(&mut self, label: &str, provider: &str, value: f64) {
        let i = self.ensure(label);
        self.quotes[i].insert(s!(provider), value);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, label: &str, provider: &str) -> Option<f64> {
        let i = *self.index.get(label)?;
        self.quotes[i].get(provider).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Serialize for Market {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (label, quotes) in self.labels.iter().zip(&self.quotes) {
            map.serialize_entry(label, quotes)?;
        }
        map.end()
    }
}

/// Named markets of one match. Only the winner market is produced today.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Markets {
    // Same text as `consts::MARKET_WINNER`; serde needs a literal here.
    #[serde(rename = "Vainqueur")]
    pub winner: Market,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub competition: Option<String>,
    /// ISO-8601, second precision, no offset.
    pub date_time: String,
    /// Exactly two, fixed when the record is created.
    pub opponents: [String; 2],
    /// Provider → external id (`null` when the link carried none).
    pub ids: BTreeMap<String, Option<String>>,
    pub markets: Markets,
}
