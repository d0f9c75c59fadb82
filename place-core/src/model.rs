//! # Gazetteer data model
//!
//! [`Place`] is the immutable record the whole engine revolves around. Places
//! form a hierarchy through `located_in_id` (the primary parent) and
//! `also_located_in_ids` (secondary parents, e.g. a town that straddles two
//! counties). The hierarchy is walked by [`crate::hierarchy`]; nothing in
//! this module knows how to traverse it.

use serde::{Deserialize, Serialize};

/// Coarsest level: countries. Finer levels increase toward street-level
/// places. Scoring clamps at this bound (see [`crate::scorer`]).
pub const MAX_LEVELS: u8 = 4;

/// Country id for the United States; used by the level matcher's
/// "skippable set" rule (a US state may not be skipped once locked in).
pub const USA_ID: i64 = 1500;

/// An alternate name for a place, optionally tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltName {
    pub text: String,
    pub source: Option<String>,
}

/// A citation for where a place record's data came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub text: String,
    pub id: Option<i64>,
}

/// A single gazetteer entry, immutable once loaded.
///
/// `located_in_id == 0` means no primary parent (a root, i.e. a country).
/// `level` is in `[1, MAX_LEVELS]`; `1` is coarsest (country).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub alt_names: Vec<AltName>,
    pub types: Vec<String>,
    pub located_in_id: i64,
    pub also_located_in_ids: Vec<i64>,
    pub level: u8,
    pub country_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub sources: Vec<Source>,
}

impl Place {
    /// Lowercased primary name with punctuation and whitespace stripped —
    /// the same concatenated-word shape [`crate::token_builder::build_tokens`]
    /// produces for `name_token`/`type_token`, so substring matching in the
    /// scorer and the type filter compares like with like (e.g. `"St. Louis"`
    /// normalizes to `"stlouis"`, matching a `name_token` built from the
    /// words `"st"`, `"louis"`).
    pub fn normalized_name(&self) -> String {
        self.name.chars().filter(|c| c.is_alphanumeric()).flat_map(|c| c.to_lowercase()).collect()
    }

    /// `true` if this place is a country (level 1).
    pub fn is_country(&self) -> bool {
        self.level == 1
    }

    /// `true` if this place is a US state (level 2, country = USA).
    pub fn is_us_state(&self) -> bool {
        self.level == 2 && self.country_id == USA_ID
    }
}

/// A candidate place together with its computed score.
///
/// Sorts descending by `score`, ties broken by ascending `id` so that
/// identical inputs always produce identical output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceScore {
    pub place: Place,
    pub score: f64,
}

/// Result-construction mode for [`crate::engine::PlaceEngine::standardize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Return the best-scoring candidates even if the finest input level
    /// never matched.
    Best,
    /// Like `Best`, but return nothing unless the finest input level
    /// contributed a match.
    Required,
    /// Like `Best`, but if the coarsest input level never matched,
    /// synthesize a "new" place one level below the best match.
    New,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Best
    }
}
