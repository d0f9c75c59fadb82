//! # Level matcher
//!
//! Matches one input level's word list against the resolver's running
//! state. This is the densest piece of the engine (`spec.md` §4.4):
//! word-skip lookup, re-leveling when a skip was needed, ancestor
//! filtering against the running candidate set, parent-skip backoff when
//! filtering empties out, and type-word disambiguation.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error_handler::{ErrorHandler, ResolutionEvent};
use crate::hierarchy::{filter_subplaces, is_ancestor, remove_children};
use crate::store::GazetteerStore;
use crate::token_builder::build_tokens;

/// Outcome of matching one input level.
pub struct MatchOutcome {
    /// New candidate set after this level, or `None` if the level
    /// contributed nothing (kept the prior `current` untouched).
    pub current: Option<HashSet<i64>>,
    /// Previous frame, after the `(previous, current)` shift.
    pub previous: Option<HashSet<i64>>,
    /// `true` if this level produced a fresh match (updates
    /// `last_found_level` in the resolver).
    pub matched: bool,
    /// Left-hand words skipped to find a hit, filtered of noise/type
    /// words, to be re-inserted as a new coarser input level by the
    /// resolver. Empty when nothing needs re-leveling.
    pub re_level_words: Vec<String>,
    /// The `name_token` built for this level (used by the scorer for the
    /// finest matched level).
    pub name_token: Option<String>,
}

/// `true` iff no place in `ids` is a country (level 1) or a US state
/// (level 2, country = USA). Only skippable sets may be bypassed by a
/// subsequent level's parent-skip backoff (`spec.md` §4.4).
fn is_skippable(store: &dyn GazetteerStore, ids: &HashSet<i64>) -> bool {
    ids.iter().all(|&id| match store.place(id) {
        Some(p) => !(p.is_country() || p.is_us_state()),
        None => true,
    })
}

fn filter_types(store: &dyn GazetteerStore, type_token: &str, ids: &[i64]) -> Vec<i64> {
    ids.iter()
        .copied()
        .filter(|&id| {
            let Some(place) = store.place(id) else { return false };
            if place.normalized_name().contains(type_token) {
                return true;
            }
            place
                .types
                .iter()
                .any(|t| t.to_lowercase().contains(type_token))
        })
        .collect()
}

/// Matches one input level. `text` and `level_index` are passed through
/// only for error-handler callbacks.
#[allow(clippy::too_many_arguments)]
pub fn match_level(
    store: &dyn GazetteerStore,
    config: &EngineConfig,
    text: &str,
    level_words: &[String],
    level_index: usize,
    current: Option<HashSet<i64>>,
    previous: Option<HashSet<i64>>,
    error_already_logged: &mut bool,
    handler: &dyn ErrorHandler,
) -> MatchOutcome {
    // 1. Word-skip lookup.
    let mut hit_ids: Option<Vec<i64>> = None;
    let mut hit_skip = 0usize;
    let mut name_token: Option<String> = None;
    let mut type_token: Option<String> = None;

    for skip in 0..=level_words.len() {
        let built = build_tokens(level_words, skip, config);
        if let Some(token) = &built.name_token {
            if let Some(ids) = store.word(token) {
                if !ids.is_empty() {
                    hit_ids = Some(ids);
                    hit_skip = skip;
                    name_token = built.name_token;
                    type_token = built.type_token;
                    break;
                }
            }
        }
        if skip == level_words.len() {
            break;
        }
    }

    let has_non_noise_word = level_words
        .iter()
        .any(|w| !w.is_empty() && !config.is_noise_word(w));

    let Some(ids) = hit_ids else {
        if has_non_noise_word && !*error_already_logged {
            let current_ids: Vec<i64> = current.iter().flatten().copied().collect();
            handler.handle(ResolutionEvent::TokenNotFound {
                text,
                level_words,
                level_index,
                current_ids: remove_children(store, &current_ids),
            });
            *error_already_logged = true;
        }
        return MatchOutcome {
            current: current.clone(),
            previous,
            matched: false,
            re_level_words: Vec::new(),
            name_token: None,
        };
    };

    // 2. Re-level on skip: left-hand words, minus noise/type words, become
    // a new coarser level for the resolver to revisit.
    let re_level_words: Vec<String> = if hit_skip > 0 {
        level_words[..hit_skip]
            .iter()
            .filter(|w| !w.is_empty() && !config.is_noise_word(w) && !config.is_type_word(w))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let mut ignore_type_token = false;
    let mut accepted: Vec<i64>;

    match &current {
        None => {
            // 4. Hit with no prior matches.
            accepted = ids;
        }
        Some(current_set) => {
            let matching = filter_subplaces(store, &ids, current_set);
            if matching.is_empty() && is_skippable(store, current_set) {
                let mut fallback: Option<Vec<i64>> = None;
                if let Some(previous_set) = &previous {
                    if !previous_set.is_empty() {
                        let retried = filter_subplaces(store, &ids, previous_set);
                        if !retried.is_empty() {
                            fallback = Some(retried);
                        }
                    }
                }
                if let Some(retried) = fallback {
                    accepted = retried;
                    handler.handle(ResolutionEvent::SkippingParentLevel {
                        text,
                        level_words,
                        level_index,
                        candidate_ids: remove_children(store, &accepted),
                    });
                    return finish(
                        store,
                        config,
                        text,
                        level_words,
                        level_index,
                        accepted,
                        Some(current_set.clone()),
                        re_level_words,
                        name_token,
                        type_token,
                        ignore_type_token,
                        handler,
                    );
                } else if !is_skippable(store, &ids.iter().copied().collect()) {
                    accepted = ids;
                    handler.handle(ResolutionEvent::SkippingParentLevel {
                        text,
                        level_words,
                        level_index,
                        candidate_ids: remove_children(store, &accepted),
                    });
                    return finish(
                        store,
                        config,
                        text,
                        level_words,
                        level_index,
                        accepted,
                        None,
                        re_level_words,
                        name_token,
                        type_token,
                        ignore_type_token,
                        handler,
                    );
                } else {
                    // Still empty: "as though this level had not been processed" —
                    // (current, previous) are left exactly as they were.
                    if has_non_noise_word && !*error_already_logged {
                        handler.handle(ResolutionEvent::TokenNotFound {
                            text,
                            level_words,
                            level_index,
                            current_ids: remove_children(store, &current_set.iter().copied().collect::<Vec<_>>()),
                        });
                        *error_already_logged = true;
                    }
                    ignore_type_token = true;
                    return MatchOutcome {
                        current: Some(current_set.clone()),
                        previous,
                        matched: false,
                        re_level_words,
                        name_token: None,
                    };
                }
            } else if matching.is_empty() {
                if has_non_noise_word && !*error_already_logged {
                    handler.handle(ResolutionEvent::TokenNotFound {
                        text,
                        level_words,
                        level_index,
                        current_ids: remove_children(store, &current_set.iter().copied().collect::<Vec<_>>()),
                    });
                    *error_already_logged = true;
                }
                ignore_type_token = true;
                return MatchOutcome {
                    current: Some(current_set.clone()),
                    previous,
                    matched: false,
                    re_level_words,
                    name_token: None,
                };
            } else {
                accepted = matching;
            }
        }
    }

    finish(
        store,
        config,
        text,
        level_words,
        level_index,
        accepted,
        current,
        re_level_words,
        name_token,
        type_token,
        ignore_type_token,
        handler,
    )
}

#[allow(clippy::too_many_arguments)]
fn finish(
    store: &dyn GazetteerStore,
    _config: &EngineConfig,
    text: &str,
    level_words: &[String],
    level_index: usize,
    mut accepted: Vec<i64>,
    current: Option<HashSet<i64>>,
    re_level_words: Vec<String>,
    name_token: Option<String>,
    type_token: Option<String>,
    ignore_type_token: bool,
    handler: &dyn ErrorHandler,
) -> MatchOutcome {
    // 6. Type disambiguation.
    if accepted.len() > 1 && !ignore_type_token {
        if let Some(type_token) = &type_token {
            let typed = filter_types(store, type_token, &accepted);
            if !typed.is_empty() {
                accepted = typed;
            } else {
                handler.handle(ResolutionEvent::TypeNotFound {
                    text,
                    level_words,
                    level_index,
                    ids: remove_children(store, &accepted),
                });
            }
        }
    }

    let accepted_set: HashSet<i64> = accepted.into_iter().collect();
    MatchOutcome {
        current: Some(accepted_set),
        previous: current,
        matched: true,
        re_level_words,
        name_token,
    }
}
