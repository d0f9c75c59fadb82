//! # Engine
//!
//! [`PlaceEngine`] is the public handle embedders and the HTTP layer call
//! into. Construction (`from_config` / `from_files`) is the only fallible
//! path (`spec.md` §7); every `standardize`/`place` call afterward is
//! infallible, with resolution anomalies routed through the configured
//! [`ErrorHandler`] instead.

use std::sync::{Arc, OnceLock, RwLock};

use crate::config::EngineConfig;
use crate::error::GazetteerError;
use crate::error_handler::{ErrorHandler, TracingErrorHandler};
use crate::loader;
use crate::model::{Mode, Place, PlaceScore};
use crate::normalizer::{DefaultNormalizer, Normalizer};
use crate::resolver::resolve;
use crate::store::GazetteerStore;

/// A constructed, read-only matching engine: a gazetteer store, a parsed
/// configuration, a normalizer, and a swappable error handler.
pub struct PlaceEngine {
    store: Arc<dyn GazetteerStore>,
    config: EngineConfig,
    normalizer: Box<dyn Normalizer>,
    handler: RwLock<Arc<dyn ErrorHandler>>,
}

impl PlaceEngine {
    /// Builds an engine over an already-constructed store and a parsed
    /// configuration. Infallible: the fallible steps (config parsing, file
    /// loading) happen before this point.
    pub fn new(store: Arc<dyn GazetteerStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            normalizer: Box::new(DefaultNormalizer),
            handler: RwLock::new(Arc::new(TracingErrorHandler)),
        }
    }

    /// Parses `props` into an [`EngineConfig`] and pairs it with an
    /// already-loaded store.
    pub fn from_config(
        store: Arc<dyn GazetteerStore>,
        props: &std::collections::HashMap<String, String>,
    ) -> Result<Self, GazetteerError> {
        let config = EngineConfig::parse(props)?;
        Ok(Self::new(store, config))
    }

    /// Loads the gazetteer and word index from the `|`-delimited text
    /// format (`spec.md` §6) and pairs them with a parsed configuration.
    pub fn from_files(
        places_path: &str,
        words_path: &str,
        props: &std::collections::HashMap<String, String>,
    ) -> Result<Self, GazetteerError> {
        let config = EngineConfig::parse(props)?;
        let store = loader::load_in_memory_store(places_path, words_path)?;
        Ok(Self::new(Arc::new(store), config))
    }

    /// Replaces the error handler used for subsequent `standardize` calls.
    pub fn set_error_handler(&self, handler: Arc<dyn ErrorHandler>) {
        *self.handler.write().expect("error handler lock poisoned") = handler;
    }

    /// Full form: explicit mode, result count, and optional default country.
    pub fn standardize(
        &self,
        text: &str,
        default_country: Option<i64>,
        mode: Mode,
        num_results: usize,
    ) -> Vec<PlaceScore> {
        let levels = self.normalizer.normalize(text);
        let handler = self.handler.read().expect("error handler lock poisoned").clone();
        tracing::debug!(text, ?mode, num_results, "resolving place reference");
        resolve(
            self.store.as_ref(),
            &self.config,
            text,
            levels,
            default_country,
            mode,
            num_results,
            handler.as_ref(),
        )
        .results
    }

    /// Shorthand: `BEST` mode, no default country.
    pub fn standardize_top_n(&self, text: &str, num_results: usize) -> Vec<PlaceScore> {
        self.standardize(text, None, Mode::Best, num_results)
    }

    /// Shorthand: best single match, or `None`.
    pub fn standardize_best(&self, text: &str, default_country: Option<i64>) -> Option<Place> {
        self.standardize(text, default_country, Mode::Best, 1)
            .into_iter()
            .next()
            .map(|scored| scored.place)
    }

    /// Looks up a place by id directly, bypassing resolution.
    pub fn place(&self, id: i64) -> Option<Place> {
        self.store.place(id)
    }
}

static GLOBAL_ENGINE: OnceLock<Arc<PlaceEngine>> = OnceLock::new();

/// Installs the process-wide engine instance. Intended to be called once
/// at startup (e.g. by the HTTP layer); later calls are no-ops, matching
/// `spec.md` §9's "no re-initialization" design note.
pub fn install_global(engine: Arc<PlaceEngine>) {
    let _ = GLOBAL_ENGINE.set(engine);
}

/// A thin convenience accessor over the process-wide engine, per
/// `spec.md` §9 ("prefer an explicit constructed handle ... retain a
/// process-wide convenience accessor only as a thin shim"). Panics if
/// [`install_global`] was never called.
pub fn global() -> Arc<PlaceEngine> {
    GLOBAL_ENGINE.get().expect("place engine not installed").clone()
}
