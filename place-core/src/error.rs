//! # Construction-time errors
//!
//! Only engine *construction* can fail: bad configuration, an unreadable
//! gazetteer file, or a backing store that refuses to initialize. Once a
//! [`crate::engine::PlaceEngine`] exists, `standardize`/`place` never
//! return a [`GazetteerError`] — resolution anomalies go through
//! [`crate::error_handler::ErrorHandler`] instead (see `spec.md` §7).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GazetteerError {
    #[error("could not parse configuration key `{key}`: invalid value `{value}`")]
    ConfigParse { key: String, value: String },

    #[error("level-weight vector `{key}` must have {expected} entries, found {found}")]
    MissingLevelWeights {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("gazetteer data file `{path}` could not be read: {source}")]
    DataFileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed gazetteer record at line {line} in `{path}`: {reason}")]
    MalformedRecord {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("backing store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}
