//! # Resolver
//!
//! Drives the level matcher across the normalizer's input levels,
//! maintaining `current`/`previous` candidate sets and `last_found_level`,
//! then dispatches to the scorer (`spec.md` §4.5).
//!
//! ## Level ordering and `last_found_level`
//!
//! `levels[0]` is the **finest** input level (e.g. "St. Louis" in
//! `"St. Louis, Missouri"`), `levels[levels.len() - 1]` is the
//! **coarsest** (e.g. "Missouri"). The resolver walks right-to-left over
//! this array — i.e. it processes the *coarsest* level first, so that
//! `current` holds an already-established ancestor context by the time a
//! finer level's candidates are filtered against it via
//! [`crate::hierarchy::filter_subplaces`] (children-under-parents, not the
//! reverse).
//!
//! `last_found_level` is simply the index (into `levels`, before any
//! re-leveling insertions) of the last level that produced a fresh match
//! in this right-to-left walk. Because index `0` (the finest level) is
//! processed *last*, `last_found_level == 0` exactly when the finest level
//! matched (matching `spec.md` §8 scenario 3, where a single-level input
//! is simultaneously finest and coarsest). A nonzero value identifies,
//! 1-off, the finest level that did *not* get a match — used directly by
//! [`crate::scorer`]'s `NEW`-mode synthesis to recover that level's words.
//!
//! ## Re-leveling
//!
//! When the level matcher needs `skip > 0` words to find a hit (`spec.md`
//! §4.4 step 2), the skipped left-hand words are reinserted as a level to
//! revisit immediately — using whatever `current` context the triggering
//! level's match just established. Operationally this is simply "process
//! this leftover word group next", independent of whether it reads as
//! coarser or finer in English; what matters is it sees the just-updated
//! `current`.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error_handler::{ErrorHandler, ResolutionEvent};
use crate::level_matcher::match_level;
use crate::model::Mode;
use crate::scorer::{build_results, ResolvedResults};
use crate::store::GazetteerStore;

pub fn resolve(
    store: &dyn GazetteerStore,
    config: &EngineConfig,
    text: &str,
    mut levels: Vec<Vec<String>>,
    default_country: Option<i64>,
    mode: Mode,
    num_results: usize,
    handler: &dyn ErrorHandler,
) -> ResolvedResults {
    let mut current: Option<HashSet<i64>> = None;
    let mut previous: Option<HashSet<i64>> = None;
    let mut last_found_level: usize = 0;
    let mut error_already_logged = false;
    let mut last_matched_name_token: Option<String> = None;

    let mut idx = levels.len();
    while idx > 0 {
        idx -= 1;
        let level_words = levels[idx].clone();
        let outcome = match_level(
            store,
            config,
            text,
            &level_words,
            idx,
            current.clone(),
            previous.clone(),
            &mut error_already_logged,
            handler,
        );

        if outcome.matched {
            last_found_level = idx;
            last_matched_name_token = outcome.name_token.clone();
        }

        current = outcome.current;
        previous = outcome.previous;

        if !outcome.re_level_words.is_empty() {
            levels.insert(idx, outcome.re_level_words);
            idx += 1; // revisit the freshly inserted level next
        }
    }

    let any_non_noise = levels
        .iter()
        .any(|lvl| lvl.iter().any(|w| !w.is_empty() && !config.is_noise_word(w)));

    let Some(current_ids) = current else {
        if any_non_noise {
            handler.handle(ResolutionEvent::PlaceNotFound { text, level_words: &levels });
        }
        return ResolvedResults { results: vec![] };
    };

    if mode == Mode::Required && last_found_level != 0 {
        return ResolvedResults { results: vec![] };
    }

    build_results(
        store,
        config,
        text,
        &levels,
        current_ids,
        last_matched_name_token.as_deref().unwrap_or(""),
        default_country,
        mode,
        num_results,
        last_found_level,
        handler,
    )
}
