//! # Engine configuration
//!
//! The source format is a flat property list (see `spec.md` §6): comma-
//! separated word lists, `abbr=expansion` pairs, comma-separated integer or
//! real lists. [`EngineConfig::parse`] turns that into a typed record and
//! is the only place that can fail during construction — everything after
//! a successful parse is infallible.

use std::collections::{HashMap, HashSet};

use crate::error::GazetteerError;
use crate::model::MAX_LEVELS;

/// Typed form of the property-list configuration described in `spec.md`
/// §6: type words, abbreviations, noise words, the two special country
/// buckets, the three level-weight vectors, and the primary-name bonus.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub type_words: HashSet<String>,
    pub abbreviations: HashMap<String, String>,
    pub noise_words: HashSet<String>,
    pub large_countries: HashSet<i64>,
    pub medium_countries: HashSet<i64>,
    pub large_country_level_weights: Vec<f64>,
    pub medium_country_level_weights: Vec<f64>,
    pub small_country_level_weights: Vec<f64>,
    pub primary_match_weight: f64,
}

impl EngineConfig {
    /// Parses the property-list format: each key maps to a comma-separated
    /// value as described in `spec.md` §6. Missing keys default to empty
    /// collections / `0.0` weights, except the three level-weight vectors,
    /// whose length must equal [`MAX_LEVELS`] when present at all.
    pub fn parse(props: &HashMap<String, String>) -> Result<Self, GazetteerError> {
        let type_words = parse_word_set(props.get("typeWords"));
        let noise_words = parse_word_set(props.get("noiseWords"));
        let abbreviations = parse_abbreviations(props.get("abbreviations"))?;
        let large_countries = parse_int_set(props.get("largeCountries"))?;
        let medium_countries = parse_int_set(props.get("mediumCountries"))?;

        let large_country_level_weights =
            parse_weights(props.get("largeCountryLevelWeights"), "largeCountryLevelWeights")?;
        let medium_country_level_weights = parse_weights(
            props.get("mediumCountryLevelWeights"),
            "mediumCountryLevelWeights",
        )?;
        let small_country_level_weights = parse_weights(
            props.get("smallCountryLevelWeights"),
            "smallCountryLevelWeights",
        )?;

        let primary_match_weight = match props.get("primaryMatchWeight") {
            Some(v) => v
                .trim()
                .parse::<f64>()
                .map_err(|_| GazetteerError::ConfigParse {
                    key: "primaryMatchWeight".to_string(),
                    value: v.clone(),
                })?,
            None => 0.0,
        };

        Ok(Self {
            type_words,
            abbreviations,
            noise_words,
            large_countries,
            medium_countries,
            large_country_level_weights,
            medium_country_level_weights,
            small_country_level_weights,
            primary_match_weight,
        })
    }

    /// `true` if `word` expands to a known type word via the abbreviation
    /// map, or is a type word directly. Mirrors `is_type_word` from
    /// `spec.md` §4.2: abbreviation expansion happens before the type-word
    /// membership test.
    pub fn is_type_word(&self, word: &str) -> bool {
        let expanded = self.abbreviations.get(word).map(String::as_str).unwrap_or(word);
        self.type_words.contains(expanded)
    }

    /// `true` if `word` carries no lookup value.
    pub fn is_noise_word(&self, word: &str) -> bool {
        self.noise_words.contains(word)
    }

    /// Picks the level-weight vector for `country_id` per the large /
    /// medium / small bucket rule.
    pub fn weights_for_country(&self, country_id: i64) -> &[f64] {
        if self.large_countries.contains(&country_id) {
            &self.large_country_level_weights
        } else if self.medium_countries.contains(&country_id) {
            &self.medium_country_level_weights
        } else {
            &self.small_country_level_weights
        }
    }
}

fn parse_word_set(raw: Option<&String>) -> HashSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_abbreviations(raw: Option<&String>) -> Result<HashMap<String, String>, GazetteerError> {
    let mut map = HashMap::new();
    let Some(raw) = raw else { return Ok(map) };
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (abbr, expansion) = pair.split_once('=').ok_or_else(|| GazetteerError::ConfigParse {
            key: "abbreviations".to_string(),
            value: pair.to_string(),
        })?;
        map.insert(abbr.trim().to_string(), expansion.trim().to_string());
    }
    Ok(map)
}

fn parse_int_set(raw: Option<&String>) -> Result<HashSet<i64>, GazetteerError> {
    let Some(raw) = raw else { return Ok(HashSet::new()) };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| GazetteerError::ConfigParse {
                key: "<country list>".to_string(),
                value: s.to_string(),
            })
        })
        .collect()
}

fn parse_weights(raw: Option<&String>, key: &str) -> Result<Vec<f64>, GazetteerError> {
    let Some(raw) = raw else {
        return Ok(vec![0.0; MAX_LEVELS as usize]);
    };
    let weights: Vec<f64> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| GazetteerError::ConfigParse {
                key: key.to_string(),
                value: s.to_string(),
            })
        })
        .collect::<Result<_, _>>()?;

    if weights.len() != MAX_LEVELS as usize {
        return Err(GazetteerError::MissingLevelWeights {
            key: key.to_string(),
            expected: MAX_LEVELS as usize,
            found: weights.len(),
        });
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_props() -> HashMap<String, String> {
        let mut props = HashMap::new();
        props.insert("typeWords".to_string(), "county,cemetery,parish".to_string());
        props.insert("noiseWords".to_string(), "the,of,and".to_string());
        props.insert("abbreviations".to_string(), "st=saint,mo=missouri".to_string());
        props.insert("largeCountries".to_string(), "1500".to_string());
        props.insert("mediumCountries".to_string(), "2000".to_string());
        props.insert(
            "largeCountryLevelWeights".to_string(),
            "1.0,2.0,3.0,4.0".to_string(),
        );
        props.insert(
            "mediumCountryLevelWeights".to_string(),
            "1.0,2.0,3.0,4.0".to_string(),
        );
        props.insert(
            "smallCountryLevelWeights".to_string(),
            "1.0,2.0,3.0,4.0".to_string(),
        );
        props.insert("primaryMatchWeight".to_string(), "0.5".to_string());
        props
    }

    #[test]
    fn parses_full_config() {
        let cfg = EngineConfig::parse(&sample_props()).unwrap();
        assert!(cfg.type_words.contains("cemetery"));
        assert_eq!(cfg.abbreviations.get("st").map(String::as_str), Some("saint"));
        assert!(cfg.large_countries.contains(&1500));
        assert_eq!(cfg.primary_match_weight, 0.5);
    }

    #[test]
    fn rejects_wrong_length_weight_vector() {
        let mut props = sample_props();
        props.insert("smallCountryLevelWeights".to_string(), "1.0,2.0".to_string());
        let err = EngineConfig::parse(&props).unwrap_err();
        assert!(matches!(err, GazetteerError::MissingLevelWeights { .. }));
    }

    #[test]
    fn is_type_word_expands_abbreviation_first() {
        let mut props = sample_props();
        props.insert("typeWords".to_string(), "cemetery".to_string());
        props.insert("abbreviations".to_string(), "cem=cemetery".to_string());
        let cfg = EngineConfig::parse(&props).unwrap();
        assert!(cfg.is_type_word("cem"));
        assert!(cfg.is_type_word("cemetery"));
        assert!(!cfg.is_type_word("saint"));
    }
}
