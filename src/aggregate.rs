// src/aggregate.rs
//! Merges extracted events into one record per match.
//!
//! Match identity is the composite string
//! `"<home> vs <away> - <YYYY-MM-DD HH:MM:SS> - <competition>"`; two events merge
//! iff their keys are byte-equal. Records are kept in first-seen order and the
//! whole map serializes in that order.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::consts::{PROVIDER, UNKNOWN_COMPETITION};
use crate::data::{Markets, MatchRecord, RawEvent};
use crate::normalize::{display_timestamp, iso_timestamp, normalize_datetime};
use crate::normalize::datetime::truncate_to_seconds;

/// Build the merge key for a pair of opponents at a resolved instant.
pub fn match_key(home: &str, away: &str, at: NaiveDateTime, competition: Option<&str>) -> String {
    format!(
        "{home} vs {away} - {} - {}",
        display_timestamp(at),
        competition.unwrap_or(UNKNOWN_COMPETITION)
    )
}

/// Insertion-ordered `key → MatchRecord`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchMap {
    keys: Vec<String>,
    records: Vec<MatchRecord>,
    index: HashMap<String, usize>,
}

impl MatchMap {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MatchRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchRecord)> {
        self.keys.iter().map(String::as_str).zip(&self.records)
    }

    /// Existing record for `key`, or the one `make` builds (appended last).
    fn entry_or_insert_with(&mut self, key: String, make: impl FnOnce() -> MatchRecord) -> &mut MatchRecord {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.records.len();
                self.records.push(make());
                self.index.insert(key.clone(), i);
                self.keys.push(key);
                i
            }
        };
        &mut self.records[i]
    }
}

impl Serialize for MatchMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (key, rec) in self.iter() {
            map.serialize_entry(key, rec)?;
        }
        map.end()
    }
}

/// Accumulator for one run. Not shared across runs.
pub struct Aggregator {
    now: NaiveDateTime,
    matches: MatchMap,
    skipped: usize,
}

impl Aggregator {
    /// `now` anchors relative timer text and stands in for unreadable times.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: truncate_to_seconds(now), matches: MatchMap::default(), skipped: 0 }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Merge one event. Events with fewer than two opponents are dropped.
    /// Returns the key the event landed under.
    pub fn add(&mut self, ev: &RawEvent) -> Option<String> {
        let [home, away, ..] = ev.opponents.as_slice() else {
            logd!("skipping event with {} opponent(s): {:?}", ev.opponents.len(), ev.opponents);
            self.skipped += 1;
            return None;
        };

        let at = normalize_datetime(ev.date_time_text.as_deref(), self.now).unwrap_or(self.now);
        let key = match_key(home, away, at, ev.competition.as_deref());

        let rec = self.matches.entry_or_insert_with(key.clone(), || MatchRecord {
            competition: ev.competition.clone(),
            date_time: iso_timestamp(at),
            opponents: [home.clone(), away.clone()],
            ids: BTreeMap::from([(s!(PROVIDER), ev.external_id.clone())]),
            markets: Markets::default(),
        });

        for odd in &ev.odds {
            rec.markets.winner.set(&odd.label, PROVIDER, odd.value);
        }
        Some(key)
    }

    pub fn extend<'a>(&mut self, events: impl IntoIterator<Item = &'a RawEvent>) {
        for ev in events {
            self.add(ev);
        }
    }

    /// Events dropped for having fewer than two opponents.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn matches(&self) -> &MatchMap {
        &self.matches
    }

    pub fn finish(self) -> MatchMap {
        logf!("{} match(es) after merge, {} event(s) skipped", self.matches.len(), self.skipped);
        self.matches
    }
}
