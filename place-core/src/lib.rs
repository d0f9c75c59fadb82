//! # place-core — Free-text place resolution against a curated gazetteer
//!
//! This crate implements the matching engine used by genealogy pipelines to
//! turn noisy, partially abbreviated place references (e.g. `"St. Louis,
//! Mo."`) into canonical entries of a hierarchical gazetteer:
//! country → state/province → county/city → finer places (cemeteries,
//! churches, …).
//!
//! ## Pipeline
//!
//! ```text
//! Text → Normalizer (levels of words) → Token builder → Level matcher
//!      → Resolver (right-to-left over levels) → Scorer → [PlaceScore]
//! ```
//!
//! The [`normalizer`] module's default implementation (lowercasing, comma
//! splitting, punctuation stripping) is a replaceable stand-in for a
//! production normalizer; everything downstream of it — token building,
//! the hierarchy oracle, the level matcher, the resolver and the scorer —
//! is the part this crate actually specifies.
//!
//! Resolution anomalies (a token that matched nothing, a type word that
//! disambiguated nothing, an ambiguous candidate set, …) are never returned
//! as errors: they are reported through the [`error_handler::ErrorHandler`]
//! callback contract while the resolver still returns its best-effort
//! result. Only *construction* failures (bad config, unreadable data) are
//! [`Result`]-typed, via [`error::GazetteerError`].

pub mod config;
pub mod engine;
pub mod error;
pub mod error_handler;
pub mod hierarchy;
pub mod level_matcher;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod resolver;
pub mod scorer;
pub mod store;
pub mod token_builder;

pub use config::EngineConfig;
pub use engine::PlaceEngine;
pub use error::GazetteerError;
pub use error_handler::ErrorHandler;
pub use model::{AltName, Mode, Place, PlaceScore, Source};
