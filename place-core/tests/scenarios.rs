//! End-to-end coverage of the six standardize scenarios from `spec.md` §8,
//! driven through the public [`PlaceEngine`] API (normalizer included) over
//! the fixture gazetteer that section describes: "Missouri" (level 2, USA),
//! "St. Louis" (level 3, in Missouri), "St. Louis Cemetery" (level 4, in St.
//! Louis), "St. Louis Parish" (level 4, in St. Louis, a sibling the §8 text
//! implies exists whenever type-word disambiguation is exercised), and
//! "Île-de-France" (level 2, France).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use place_core::config::EngineConfig;
use place_core::model::{Place, Source};
use place_core::store::InMemoryStore;
use place_core::{Mode, PlaceEngine};

const USA: i64 = 100;
const FRANCE: i64 = 200;
const MISSOURI: i64 = 1;
const ST_LOUIS: i64 = 2;
const ST_LOUIS_CEMETERY: i64 = 3;
const ILE_DE_FRANCE: i64 = 4;
const ST_LOUIS_PARISH: i64 = 5;
const SPRINGFIELD_A: i64 = 6;
const SPRINGFIELD_B: i64 = 7;

fn place(id: i64, name: &str, located_in_id: i64, level: u8, country_id: i64, types: &[&str]) -> Place {
    Place {
        id,
        name: name.to_string(),
        alt_names: vec![],
        types: types.iter().map(|t| t.to_string()).collect(),
        located_in_id,
        also_located_in_ids: vec![],
        level,
        country_id,
        latitude: 0.0,
        longitude: 0.0,
        sources: vec![Source { text: "gnis".into(), id: None }],
    }
}

fn fixture_store() -> InMemoryStore {
    let places = vec![
        place(USA, "United States", 0, 1, USA, &[]),
        place(FRANCE, "France", 0, 1, FRANCE, &[]),
        place(MISSOURI, "Missouri", USA, 2, USA, &[]),
        place(ST_LOUIS, "St. Louis", MISSOURI, 3, USA, &[]),
        place(ST_LOUIS_CEMETERY, "St. Louis Cemetery", ST_LOUIS, 4, USA, &["cemetery"]),
        place(ST_LOUIS_PARISH, "St. Louis Parish", ST_LOUIS, 4, USA, &["parish"]),
        place(ILE_DE_FRANCE, "Île-de-France", FRANCE, 2, FRANCE, &[]),
        // An unrelated, unresolvable name-token tie: no hierarchy or type
        // word narrows these two, so only `num_results`/the scorer's
        // ascending-id tiebreak decide which survive.
        place(SPRINGFIELD_A, "Springfield", FRANCE, 2, FRANCE, &[]),
        place(SPRINGFIELD_B, "Springfield", FRANCE, 2, FRANCE, &[]),
    ];

    // The word index is keyed by the same concatenated, type-word-stripped
    // token the level matcher builds from user input ("St. Louis Cemetery"
    // and "St. Louis Parish" both reduce to the name token "stlouis" plus a
    // distinct type token). "Mo" is indexed directly to model a postal-code
    // alt-name a real loader would have picked up from the source data —
    // the "mo" -> "missouri" entry in the *abbreviations* config is a
    // separate mechanism (token expansion), not the gazetteer's own data.
    let mut words = HashMap::new();
    words.insert("missouri".to_string(), vec![MISSOURI]);
    words.insert("mo".to_string(), vec![MISSOURI]);
    words.insert("stlouis".to_string(), vec![ST_LOUIS, ST_LOUIS_CEMETERY, ST_LOUIS_PARISH]);
    words.insert("iledefrance".to_string(), vec![ILE_DE_FRANCE]);
    words.insert("springfield".to_string(), vec![SPRINGFIELD_A, SPRINGFIELD_B]);
    InMemoryStore::from_places(places, words)
}

fn fixture_config() -> EngineConfig {
    let mut type_words = HashSet::new();
    type_words.insert("cemetery".to_string());

    let mut abbreviations = HashMap::new();
    abbreviations.insert("mo".to_string(), "missouri".to_string());

    EngineConfig {
        type_words,
        abbreviations,
        noise_words: HashSet::new(),
        large_countries: [USA].into_iter().collect(),
        medium_countries: HashSet::new(),
        large_country_level_weights: vec![1.0, 2.0, 3.0, 4.0],
        medium_country_level_weights: vec![1.0, 1.5, 2.0, 2.5],
        small_country_level_weights: vec![0.1, 0.2, 0.3, 0.4],
        primary_match_weight: 5.0,
    }
}

fn engine() -> PlaceEngine {
    PlaceEngine::new(Arc::new(fixture_store()), fixture_config())
}

/// Scenario 1: exact comma-separated input resolves directly; the primary
/// match bonus applies because the name token occurs in the place's own
/// normalized name.
#[test]
fn scenario_1_exact_comma_separated_input() {
    let results = engine().standardize("St. Louis, Missouri", None, Mode::Best, 3);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place.id, ST_LOUIS);
    // level 3, large-country bucket: weights[2] = 3.0, plus the 5.0 primary
    // match bonus since "stlouis" is a substring of the normalized name.
    assert_eq!(results[0].score, 8.0);
}

/// Scenario 2: no commas at all. The finest (only) level must borrow the
/// `"mo"` -> `"missouri"` abbreviation, split via the word-skip/re-level
/// mechanism, and still land on the same place as scenario 1.
#[test]
fn scenario_2_no_commas_with_abbreviation_and_relevel() {
    let results = engine().standardize("St Louis Mo", None, Mode::Best, 3);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place.id, ST_LOUIS);
}

/// Scenario 3: a single input level is simultaneously finest and coarsest,
/// so `REQUIRED` mode's "finest level matched" check is trivially satisfied.
#[test]
fn scenario_3_required_mode_single_level_is_finest() {
    let results = engine().standardize("Missouri", None, Mode::Required, 3);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place.id, MISSOURI);
}

/// Scenario 4: the finest level never matches anything, so `REQUIRED` mode
/// returns nothing even though the coarser level resolved cleanly.
#[test]
fn scenario_4_required_mode_rejects_unmatched_finest_level() {
    let results = engine().standardize("Nowhere, Missouri", None, Mode::Required, 3);
    assert!(results.is_empty());
}

/// Scenario 5: same unmatched-finest-level input, but `NEW` mode synthesizes
/// a place named after the unmatched words, nested under the best match.
#[test]
fn scenario_5_new_mode_synthesizes_place_under_missouri() {
    let results = engine().standardize("Nowhere, Missouri", None, Mode::New, 3);
    assert_eq!(results.len(), 1);
    let synthetic = &results[0].place;
    assert_eq!(synthetic.name, "Nowhere");
    assert_eq!(synthetic.located_in_id, MISSOURI);
    assert_eq!(results[0].score, 0.0);
}

/// Scenario 6: three siblings share the same name token at the finest
/// level ("St. Louis" itself is pruned by `remove_children`, leaving the
/// cemetery and the parish) — only `filter_types`'s `"cemetery"` type token
/// picks the cemetery out of that tie.
#[test]
fn scenario_6_type_disambiguation_picks_cemetery() {
    let results = engine().standardize("St. Louis Cemetery, St. Louis, Missouri", None, Mode::Best, 1);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place.id, ST_LOUIS_CEMETERY);
}

/// Determinism law: identical input yields identical output, repeatedly.
#[test]
fn deterministic_across_repeated_calls() {
    let engine = engine();
    let first = engine.standardize("St. Louis, Missouri", None, Mode::Best, 3);
    let second = engine.standardize("St. Louis, Missouri", None, Mode::Best, 3);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.place.id, b.place.id);
        assert_eq!(a.score, b.score);
    }
}

/// `num_results` is a hard cap on the ambiguous (`|current| > 1`) path,
/// with the ascending-id tiebreak deciding which survivor is kept.
#[test]
fn num_results_caps_ambiguous_output() {
    let results = engine().standardize("Springfield", None, Mode::Best, 1);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place.id, SPRINGFIELD_A);

    let both = engine().standardize("Springfield", None, Mode::Best, 5);
    assert_eq!(both.len(), 2);
    assert_eq!(both[0].place.id, SPRINGFIELD_A);
    assert_eq!(both[1].place.id, SPRINGFIELD_B);
}

/// Every returned place id is resolvable directly through the store.
#[test]
fn returned_places_exist_in_the_gazetteer() {
    let engine = engine();
    let results = engine.standardize("St. Louis, Missouri", None, Mode::Best, 3);
    for scored in &results {
        assert!(engine.place(scored.place.id).is_some());
    }
}

/// Input made only of words the word index has never heard of, with no
/// comma at all, resolves to nothing and does not panic.
#[test]
fn unknown_single_word_input_yields_no_results() {
    let results = engine().standardize("Atlantis", None, Mode::Best, 3);
    assert!(results.is_empty());
}
