//! # Error handler — advisory callbacks, never a `Result`
//!
//! `spec.md` §6 describes a five-method interface. A tagged-variant event
//! plus a single callback method is equally idiomatic and is what this
//! crate uses, per the "callbacks" design note in `spec.md` §9.
//!
//! At most one of `TokenNotFound` / `SkippingParentLevel` / `TypeNotFound`
//! / `Ambiguous` fires per `standardize` call (first wins); `PlaceNotFound`
//! fires independently whenever it applies. None of these may panic or
//! propagate — the resolver's job is to keep going regardless.

use crate::model::Place;

/// One resolution-anomaly event, reported to the configured
/// [`ErrorHandler`].
#[derive(Debug, Clone)]
pub enum ResolutionEvent<'a> {
    /// A level's name token matched nothing in the word index. The id list
    /// is pruned through [`crate::hierarchy::remove_children`] first (the
    /// source's `current_ids_minus_children`).
    TokenNotFound {
        text: &'a str,
        level_words: &'a [String],
        level_index: usize,
        current_ids: Vec<i64>,
    },
    /// A level's match only survived by dropping down to the previous
    /// (shallower) candidate frame, or by discarding the current frame
    /// entirely. Id list pruned through `remove_children`.
    SkippingParentLevel {
        text: &'a str,
        level_words: &'a [String],
        level_index: usize,
        candidate_ids: Vec<i64>,
    },
    /// A type token failed to disambiguate any candidate. Id list pruned
    /// through `remove_children`.
    TypeNotFound {
        text: &'a str,
        level_words: &'a [String],
        level_index: usize,
        ids: Vec<i64>,
    },
    /// More than one candidate survived to the scorer; `chosen` is the
    /// top-scoring place after tie-breaking.
    Ambiguous {
        text: &'a str,
        level_words: &'a [String],
        candidate_ids: Vec<i64>,
        chosen: &'a Place,
    },
    /// No candidate survived resolution at all.
    PlaceNotFound {
        text: &'a str,
        level_words: &'a [Vec<String>],
    },
}

/// Receives advisory callbacks during resolution. Implementations must
/// not panic; a handler that wants to log asynchronously should do so
/// without blocking the resolver (e.g. push onto a channel).
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, event: ResolutionEvent<'_>);
}

/// Default handler: emits a `tracing` event at `debug` level per
/// callback, matching the ambient logging style used elsewhere in this
/// crate.
#[derive(Debug, Default)]
pub struct TracingErrorHandler;

impl ErrorHandler for TracingErrorHandler {
    fn handle(&self, event: ResolutionEvent<'_>) {
        match event {
            ResolutionEvent::TokenNotFound { text, level_index, .. } => {
                tracing::debug!(text, level_index, "token not found");
            }
            ResolutionEvent::SkippingParentLevel { text, level_index, .. } => {
                tracing::debug!(text, level_index, "skipping parent level");
            }
            ResolutionEvent::TypeNotFound { text, level_index, .. } => {
                tracing::debug!(text, level_index, "type token not found");
            }
            ResolutionEvent::Ambiguous {
                text,
                candidate_ids,
                chosen,
                ..
            } => {
                tracing::debug!(
                    text,
                    candidates = candidate_ids.len(),
                    chosen_id = chosen.id,
                    "ambiguous match"
                );
            }
            ResolutionEvent::PlaceNotFound { text, .. } => {
                tracing::debug!(text, "place not found");
            }
        }
    }
}
