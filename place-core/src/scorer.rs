//! # Scorer & result builder
//!
//! Turns the resolver's final candidate set into an ordered list of
//! [`PlaceScore`]s (`spec.md` §4.6): drops candidates that are descendants
//! of another candidate, scores the rest by country-bucketed level weight
//! plus a primary-name bonus, breaks ties deterministically, and — in
//! `NEW` mode — replaces everything with one synthetic place when the
//! coarsest level's own name never matched.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error_handler::{ErrorHandler, ResolutionEvent};
use crate::hierarchy::remove_children;
use crate::model::{Mode, Place, PlaceScore, MAX_LEVELS};
use crate::store::GazetteerStore;

/// Final, ordered output of [`crate::resolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolvedResults {
    pub results: Vec<PlaceScore>,
}

/// Builds the final result list from the resolver's surviving candidate
/// set. `name_token` is the finest matched level's name token, used for
/// the primary-match bonus; `last_found_level` and `levels` are used only
/// by the `NEW`-mode synthesis step.
#[allow(clippy::too_many_arguments)]
pub fn build_results(
    store: &dyn GazetteerStore,
    config: &EngineConfig,
    text: &str,
    levels: &[Vec<String>],
    current_ids: HashSet<i64>,
    name_token: &str,
    default_country: Option<i64>,
    mode: Mode,
    num_results: usize,
    last_found_level: usize,
    handler: &dyn ErrorHandler,
) -> ResolvedResults {
    // Step 1 is a reserved extension point in the source: a supplied
    // default country does not currently influence scoring.
    let _ = default_country;

    let mut ids: Vec<i64> = current_ids.into_iter().collect();
    if ids.len() > 1 {
        ids = remove_children(store, &ids);
    }

    let mut results = if ids.len() > 1 {
        let mut scored: Vec<PlaceScore> = ids
            .iter()
            .filter_map(|&id| store.place(id))
            .map(|place| {
                let score = score_place(config, name_token, &place);
                PlaceScore { place, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.place.id.cmp(&b.place.id))
        });

        if let Some(top) = scored.first() {
            handler.handle(ResolutionEvent::Ambiguous {
                text,
                level_words: levels.first().map(Vec::as_slice).unwrap_or(&[]),
                candidate_ids: ids.clone(),
                chosen: &top.place,
            });
        }

        scored.truncate(num_results);
        scored
    } else if let Some(&id) = ids.first() {
        match store.place(id) {
            Some(place) => {
                let score = score_place(config, name_token, &place);
                vec![PlaceScore { place, score }]
            }
            None => vec![],
        }
    } else {
        vec![]
    };

    if !results.is_empty() && mode == Mode::New && last_found_level > 0 {
        if let Some(words) = levels.get(last_found_level - 1) {
            let synthetic_name = generate_place_name(words, config);
            let located_in_id = results[0].place.id;
            let synthetic = Place {
                id: 0,
                name: synthetic_name,
                alt_names: vec![],
                types: vec![],
                located_in_id,
                also_located_in_ids: vec![],
                level: 0,
                country_id: 0,
                latitude: 0.0,
                longitude: 0.0,
                sources: vec![],
            };
            results = vec![PlaceScore { place: synthetic, score: 0.0 }];
        }
    }

    ResolvedResults { results }
}

fn score_place(config: &EngineConfig, name_token: &str, place: &Place) -> f64 {
    let weights = config.weights_for_country(place.country_id);
    let level_idx = place.level.min(MAX_LEVELS).max(1) as usize - 1;
    let mut score = weights.get(level_idx).copied().unwrap_or(0.0);
    if !name_token.is_empty() && place.normalized_name().contains(name_token) {
        score += config.primary_match_weight;
    }
    score
}

/// Builds a synthetic place name from a level's raw words (`spec.md`
/// §4.6): strips trailing type words, except `"cemetery"` which is kept,
/// falling back to the full word list if stripping would empty it out.
fn generate_place_name(words: &[String], config: &EngineConfig) -> String {
    let mut end = words.len();
    while end > 0 {
        let word = &words[end - 1];
        if word.eq_ignore_ascii_case("cemetery") {
            break;
        }
        if !config.is_type_word(word) {
            break;
        }
        end -= 1;
    }
    let prefix: &[String] = if end == 0 { words } else { &words[..end] };
    prefix.iter().map(|w| capitalize(w)).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}
