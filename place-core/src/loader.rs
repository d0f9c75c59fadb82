//! # Loader
//!
//! Materializes a [`crate::store::InMemoryStore`] from the `|`-delimited
//! text format described in `spec.md` §6, and provides a minimal
//! [`SqlBackend`] seam for driving [`crate::store::CachedStore`] in tests
//! and small deployments without wiring up a real SQL driver — the
//! out-of-scope collaborator spec.md §1(b) names is the production
//! database behind that seam, not the seam itself.
//!
//! Two files, one record type each: a `places` file and a `place_words`
//! file. Within a `places` record, `~` separates repeated sub-fields
//! (`alt_names`, `types`, `also_located_in_ids`, `sources`) and `:`
//! separates an `alt_name`/`source` entry's text from its optional tag.

use std::collections::HashMap;

use crate::error::GazetteerError;
use crate::model::{AltName, Place, Source};
use crate::store::{Backend, InMemoryStore};

/// Parses the `places` file format into a list of [`Place`]s.
pub fn parse_places(path: &str, contents: &str) -> Result<Vec<Place>, GazetteerError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_place_line(path, idx + 1, line))
        .collect()
}

/// Parses the `place_words` file format into a word → ids index.
pub fn parse_words(path: &str, contents: &str) -> Result<HashMap<String, Vec<i64>>, GazetteerError> {
    let mut words = HashMap::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, '|');
        let word = fields.next().unwrap_or("").trim().to_string();
        let ids_field = fields.next().ok_or_else(|| GazetteerError::MalformedRecord {
            path: path.to_string(),
            line: idx + 1,
            reason: "missing comma-separated id list".to_string(),
        })?;
        let ids = parse_int_list(ids_field, ',').map_err(|reason| GazetteerError::MalformedRecord {
            path: path.to_string(),
            line: idx + 1,
            reason,
        })?;
        words.insert(word, ids);
    }
    Ok(words)
}

/// Reads both files from disk and builds an [`InMemoryStore`].
pub fn load_in_memory_store(places_path: &str, words_path: &str) -> Result<InMemoryStore, GazetteerError> {
    let places_contents =
        std::fs::read_to_string(places_path).map_err(|source| GazetteerError::DataFileUnreadable {
            path: places_path.to_string(),
            source,
        })?;
    let words_contents =
        std::fs::read_to_string(words_path).map_err(|source| GazetteerError::DataFileUnreadable {
            path: words_path.to_string(),
            source,
        })?;

    let places = parse_places(places_path, &places_contents)?;
    let words = parse_words(words_path, &words_contents)?;
    tracing::info!(places = places.len(), words = words.len(), "loaded gazetteer from text files");
    Ok(InMemoryStore::from_places(places, words))
}

fn parse_place_line(path: &str, line_no: usize, line: &str) -> Result<Place, GazetteerError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < 8 {
        return Err(GazetteerError::MalformedRecord {
            path: path.to_string(),
            line: line_no,
            reason: format!("expected at least 8 fields, found {}", fields.len()),
        });
    }

    let malformed = |reason: String| GazetteerError::MalformedRecord {
        path: path.to_string(),
        line: line_no,
        reason,
    };

    let id = fields[0].parse::<i64>().map_err(|_| malformed(format!("invalid id `{}`", fields[0])))?;
    let name = fields[1].to_string();
    let alt_names = parse_alt_names(fields[2]);
    let types = parse_sub_list(fields[3]);
    let located_in_id = fields[4]
        .parse::<i64>()
        .map_err(|_| malformed(format!("invalid located_in_id `{}`", fields[4])))?;
    let also_located_in_ids = parse_int_list(fields[5], '~').map_err(malformed)?;
    let level = fields[6].parse::<u8>().map_err(|_| malformed(format!("invalid level `{}`", fields[6])))?;
    let country_id = fields[7]
        .parse::<i64>()
        .map_err(|_| malformed(format!("invalid country_id `{}`", fields[7])))?;

    let latitude = fields.get(8).map(|f| f.parse::<f64>().unwrap_or(0.0)).unwrap_or(0.0);
    let longitude = fields.get(9).map(|f| f.parse::<f64>().unwrap_or(0.0)).unwrap_or(0.0);
    let sources = fields.get(10).map(|f| parse_sources(f)).unwrap_or_default();

    Ok(Place {
        id,
        name,
        alt_names,
        types,
        located_in_id,
        also_located_in_ids,
        level,
        country_id,
        latitude,
        longitude,
        sources,
    })
}

fn parse_sub_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split('~').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn parse_int_list(field: &str, sep: char) -> Result<Vec<i64>, String> {
    if field.trim().is_empty() {
        return Ok(Vec::new());
    }
    field
        .split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|_| format!("invalid integer `{s}`")))
        .collect()
}

fn parse_alt_names(field: &str) -> Vec<AltName> {
    parse_sub_list(field)
        .into_iter()
        .map(|entry| match entry.split_once(':') {
            Some((text, source)) => AltName { text: text.to_string(), source: Some(source.to_string()) },
            None => AltName { text: entry, source: None },
        })
        .collect()
}

fn parse_sources(field: &str) -> Vec<Source> {
    parse_sub_list(field)
        .into_iter()
        .map(|entry| match entry.split_once(':') {
            Some((text, id)) => Source { text: text.to_string(), id: id.parse::<i64>().ok() },
            None => Source { text: entry, id: None },
        })
        .collect()
}

/// A thin seam over a SQL-shaped backing store (`spec.md` §6's `places` /
/// `place_words` tables), so [`crate::store::CachedStore`] is exercisable
/// against a fake in tests. No real driver is wired up here: a production
/// `DATABASE_URL` integration lives outside this crate.
pub trait SqlBackend: Send + Sync {
    fn select_place(&self, id: i64) -> Result<Option<Place>, String>;
    fn select_word_ids(&self, word: &str) -> Result<Option<Vec<i64>>, String>;
}

/// Blanket adapter: any [`SqlBackend`] is usable as a [`Backend`] for
/// [`crate::store::CachedStore`].
pub struct SqlBackendAdapter<S: SqlBackend>(pub S);

impl<S: SqlBackend> Backend for SqlBackendAdapter<S> {
    fn load_place(&self, id: i64) -> Result<Option<Place>, String> {
        self.0.select_place(id)
    }

    fn load_word(&self, word: &str) -> Result<Option<Vec<i64>>, String> {
        self.0.select_word_ids(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_place_line() {
        let places = parse_places("test", "1|Missouri||county|0||2|1500").unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, 1);
        assert_eq!(places[0].name, "Missouri");
        assert_eq!(places[0].types, vec!["county".to_string()]);
        assert_eq!(places[0].located_in_id, 0);
        assert_eq!(places[0].level, 2);
        assert_eq!(places[0].country_id, 1500);
    }

    #[test]
    fn parses_alt_names_and_sources_with_tags() {
        let line = "2|St. Louis|Saint Louis:census~St Louis:postal||1||3|1500|38.6|-90.1|gnis:123~wikipedia";
        let places = parse_places("test", line).unwrap();
        let place = &places[0];
        assert_eq!(place.alt_names.len(), 2);
        assert_eq!(place.alt_names[0].text, "Saint Louis");
        assert_eq!(place.alt_names[0].source.as_deref(), Some("census"));
        assert_eq!(place.latitude, 38.6);
        assert_eq!(place.sources[0].text, "gnis");
        assert_eq!(place.sources[0].id, Some(123));
        assert_eq!(place.sources[1].text, "wikipedia");
        assert_eq!(place.sources[1].id, None);
    }

    #[test]
    fn rejects_line_with_too_few_fields() {
        let err = parse_places("test", "1|Missouri").unwrap_err();
        assert!(matches!(err, GazetteerError::MalformedRecord { .. }));
    }

    #[test]
    fn parses_word_index() {
        let words = parse_words("test", "stlouis|2,3,4\nmissouri|1").unwrap();
        assert_eq!(words.get("stlouis"), Some(&vec![2, 3, 4]));
        assert_eq!(words.get("missouri"), Some(&vec![1]));
    }
}
