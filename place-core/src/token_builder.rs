//! # Token builder
//!
//! Turns the word list of one input level into a `(name_token, type_token)`
//! pair for word-index lookup and type disambiguation. The algorithm is a
//! single right-to-left scan over the words (`spec.md` §4.2); everything
//! from the first non-type word leftward becomes one contiguous
//! `name_token`, trailing type words become `type_token`.

use crate::config::EngineConfig;

/// Result of building tokens from one input level's words.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuiltTokens {
    pub name_token: Option<String>,
    pub type_token: Option<String>,
}

/// Builds `(name_token, type_token)` from `words[words_to_skip..]`.
///
/// Step-by-step (see `spec.md` §4.2):
/// 1. Skip empty words.
/// 2. Halt on a bare `"or"`/`"now"` once the buffer already holds content
///    — the Open Question in `spec.md` §9 is resolved this way: the halt
///    requires the buffer to be non-empty first, so a leading `"or"`/`"now"`
///    at the very end of the scan (nothing accumulated yet) does not halt.
/// 3. Expand abbreviations, but only when the level has more than one word
///    after skipping (a single-word level like `"No"` in `"No, Niigata,
///    Japan"` must not expand to `"North"`).
/// 4. Type words accumulate into a trailing buffer that becomes
///    `type_token` the moment a name word is seen with content already
///    pending from the right.
/// 5. Prepend each resolved word into the buffer.
pub fn build_tokens(words: &[String], words_to_skip: usize, config: &EngineConfig) -> BuiltTokens {
    let scanned: Vec<&str> = words
        .get(words_to_skip..)
        .unwrap_or(&[])
        .iter()
        .map(String::as_str)
        .collect();

    let multi_word = scanned.iter().filter(|w| !w.is_empty()).count() > 1;

    let mut buffer = String::new();
    let mut type_token: Option<String> = None;
    let mut seen_name_word = false;

    for word in scanned.iter().rev() {
        if word.is_empty() {
            continue;
        }

        if !buffer.is_empty() && (*word == "or" || *word == "now") {
            break;
        }

        let resolved: &str = if multi_word {
            config.abbreviations.get(*word).map(String::as_str).unwrap_or(word)
        } else {
            word
        };

        if !config.is_type_word(resolved) {
            if !seen_name_word && !buffer.is_empty() {
                type_token = Some(buffer.clone());
                buffer.clear();
            }
            seen_name_word = true;
        }

        buffer.insert_str(0, resolved);
    }

    let name_token = if buffer.is_empty() { None } else { Some(buffer) };
    BuiltTokens { name_token, type_token }
}
