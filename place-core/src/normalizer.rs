//! # Normalizer
//!
//! Turns raw input text into the levels of word lists the resolver walks.
//! `spec.md` §1 lists this as an external collaborator — interface only —
//! but a shipped crate needs a working default, so [`DefaultNormalizer`]
//! provides the obvious one: lowercase, strip punctuation down to
//! alphanumerics and whitespace, split on commas into levels, split each
//! level on whitespace into words.
//!
//! Levels come out in the same finest-first order the text was written in
//! (`"St. Louis, Missouri"` → `[["st", "louis"], ["missouri"]]`), matching
//! [`crate::resolver::resolve`]'s documented array convention directly.

/// Splits input text into levels of normalized words. Replaceable: embed a
/// different implementation when the input language or format calls for
/// one, and feed its output straight to [`crate::resolver::resolve`].
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<Vec<String>>;
}

/// Lowercase, strip everything but alphanumerics/whitespace/commas, split
/// on commas, split each chunk on whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, text: &str) -> Vec<Vec<String>> {
        let cleaned: String = text
            .chars()
            .flat_map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || c == ',' {
                    c.to_lowercase().collect::<Vec<_>>()
                } else {
                    vec![' ']
                }
            })
            .collect();

        cleaned
            .split(',')
            .map(|chunk| chunk.split_whitespace().map(str::to_string).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas_into_finest_first_levels() {
        let levels = DefaultNormalizer.normalize("St. Louis, Missouri");
        assert_eq!(levels, vec![vec!["st".to_string(), "louis".to_string()], vec!["missouri".to_string()]]);
    }

    #[test]
    fn strips_punctuation_and_lowercases() {
        let levels = DefaultNormalizer.normalize("Île-de-France!!");
        assert_eq!(levels, vec![vec!["île".to_string(), "de".to_string(), "france".to_string()]]);
    }

    #[test]
    fn single_level_with_no_commas() {
        let levels = DefaultNormalizer.normalize("Missouri");
        assert_eq!(levels, vec![vec!["missouri".to_string()]]);
    }

    #[test]
    fn empty_input_yields_one_empty_level() {
        let levels = DefaultNormalizer.normalize("");
        assert_eq!(levels, vec![Vec::<String>::new()]);
    }
}
