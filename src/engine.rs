//! The support engine: a corpus snapshot plus everything derived from it.
//!
//! The dataset, its fitted vector space and its categorized store live
//! together in one immutable [`EngineState`]. Every call takes an `Arc` of
//! the current state up front and works only on it, while a retrain builds a
//! complete replacement before publishing it with a single pointer swap.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, SupportAnalyzer};
use crate::catalog::CategorizedStore;
use crate::config::EngineConfig;
use crate::corpus::{CorpusSource, Dataset, RemoteFetcher};
use crate::error::Result;
use crate::ml::evaluation::{EvaluationReport, Evaluator};
use crate::ml::vectorizer::TfIdfVectorizer;
use crate::responder::{QueryResponder, Resolution};

/// One consistent corpus snapshot.
#[derive(Debug)]
pub struct EngineState {
    dataset: Dataset,
    vectorizer: TfIdfVectorizer,
    store: CategorizedStore,
    generation: u64,
    trained_at: DateTime<Utc>,
}

impl EngineState {
    /// Fit a vector space and build the store for `dataset`.
    pub fn build(dataset: Dataset, analyzer: Arc<dyn Analyzer>, generation: u64) -> Result<Self> {
        let mut vectorizer = TfIdfVectorizer::new(analyzer);
        vectorizer.fit(&dataset.documents())?;
        let store = CategorizedStore::build(&dataset);

        info!("Model prepared with {} training examples", dataset.len());

        Ok(EngineState {
            dataset,
            vectorizer,
            store,
            generation,
            trained_at: Utc::now(),
        })
    }

    /// A state with no data and no fitted space; every query resolves to a
    /// failure.
    fn unfitted(analyzer: Arc<dyn Analyzer>) -> Self {
        EngineState {
            dataset: Dataset::new(),
            vectorizer: TfIdfVectorizer::new(analyzer),
            store: CategorizedStore::default(),
            generation: 0,
            trained_at: Utc::now(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn store(&self) -> &CategorizedStore {
        &self.store
    }

    /// Zero for the state built at construction, then one more per retrain.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }
}

/// Summary of the engine's current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub records: usize,
    pub vocabulary_size: usize,
    pub products: usize,
    pub orders: usize,
    pub users: usize,
    pub generation: u64,
    pub trained_at: DateTime<Utc>,
}

/// A rendered answer and the resolution it came from.
///
/// Both are taken from the same snapshot, identified by `generation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub resolution: Resolution,
    pub generation: u64,
}

/// Retrieval-based support engine.
pub struct SupportEngine {
    source: Arc<dyn CorpusSource>,
    analyzer: Arc<dyn Analyzer>,
    responder: QueryResponder,
    evaluator: Evaluator,
    state: RwLock<Arc<EngineState>>,
    /// Serializes retrains so generations are handed out once.
    train_lock: Mutex<()>,
}

impl fmt::Debug for SupportEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.snapshot();
        f.debug_struct("SupportEngine")
            .field("source", &self.source.describe())
            .field("analyzer", &self.analyzer.name())
            .field("records", &state.dataset.len())
            .field("generation", &state.generation)
            .finish()
    }
}

impl SupportEngine {
    /// Load `source` and build the initial state.
    ///
    /// A source that fails to load yields an engine over an empty dataset,
    /// which answers every query with the no-match text.
    pub fn new(source: Arc<dyn CorpusSource>) -> Self {
        Self::with_analyzer(source, Arc::new(SupportAnalyzer::new()))
    }

    /// Like [`SupportEngine::new`] with a custom analyzer.
    pub fn with_analyzer(source: Arc<dyn CorpusSource>, analyzer: Arc<dyn Analyzer>) -> Self {
        let dataset = source.load().unwrap_or_else(|e| {
            warn!("Could not load corpus from {}: {e}", source.describe());
            Dataset::new()
        });
        info!("Loaded {} entries from {}", dataset.len(), source.describe());

        let state = EngineState::build(dataset, analyzer.clone(), 0).unwrap_or_else(|e| {
            error!("Error preparing model: {e}");
            EngineState::unfitted(analyzer.clone())
        });

        SupportEngine {
            source,
            evaluator: Evaluator::new(analyzer.clone()),
            analyzer,
            responder: QueryResponder::default(),
            state: RwLock::new(Arc::new(state)),
            train_lock: Mutex::new(()),
        }
    }

    /// Build an engine from configuration.
    pub fn from_config(config: &EngineConfig, fetcher: Arc<dyn RemoteFetcher>) -> Result<Self> {
        config.validate()?;
        let engine = Self::new(config.source(fetcher));
        let evaluator = Evaluator::new(engine.analyzer.clone())
            .with_seed(config.seed)
            .with_test_ratio(config.test_ratio);
        Ok(engine.with_evaluator(evaluator))
    }

    pub fn with_responder(mut self, responder: QueryResponder) -> Self {
        self.responder = responder;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// The current state. Holding it keeps that snapshot alive across retrains.
    pub fn snapshot(&self) -> Arc<EngineState> {
        self.state.read().clone()
    }

    /// Answer a query. Never fails.
    pub fn answer(&self, message: &str, user_id: Option<&str>) -> String {
        self.respond(message, user_id).text
    }

    /// Resolve and render a query against a single snapshot.
    pub fn respond(&self, message: &str, user_id: Option<&str>) -> Answer {
        let state = self.snapshot();
        let resolution = self
            .responder
            .resolve(&state.dataset, &state.vectorizer, message, user_id);

        Answer {
            text: resolution.text(&state.dataset).to_string(),
            resolution,
            generation: state.generation,
        }
    }

    /// How a query resolves against the current state.
    ///
    /// Record indices refer to the snapshot used here; a retrain may have
    /// replaced it by the time the caller looks at another snapshot. Use
    /// [`SupportEngine::respond`] to get the rendered text as well.
    pub fn resolve(&self, message: &str, user_id: Option<&str>) -> Resolution {
        self.respond(message, user_id).resolution
    }

    /// Reload the source and replace all derived state.
    ///
    /// On error the previous state stays active.
    pub fn train_model(&self) -> Result<()> {
        let _guard = self.train_lock.lock();

        let dataset = self.source.load().inspect_err(|e| {
            error!("Retrain failed to load {}: {e}", self.source.describe());
        })?;
        let generation = self.snapshot().generation + 1;
        let state = EngineState::build(dataset, self.analyzer.clone(), generation)?;
        let records = state.dataset.len();

        *self.state.write() = Arc::new(state);
        info!("Model retrained successfully: generation {generation}, {records} records");
        Ok(())
    }

    pub fn get_product_info(&self, name: &str) -> String {
        self.snapshot().store.product_info(name).to_string()
    }

    pub fn get_user_info(&self, user_id: &str) -> String {
        self.snapshot().store.user_info(user_id).to_string()
    }

    pub fn get_order_info(&self, order_id: Option<&str>, product_name: Option<&str>) -> String {
        self.snapshot()
            .store
            .order_info(order_id, product_name)
            .to_string()
    }

    /// The evaluator used by [`SupportEngine::evaluate`].
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Measure retrieval accuracy on the current dataset.
    pub fn evaluate(&self) -> Result<EvaluationReport> {
        let state = self.snapshot();
        self.evaluator.evaluate(&state.dataset)
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.snapshot();
        EngineStats {
            records: state.dataset.len(),
            vocabulary_size: state.vectorizer.vocabulary_size(),
            products: state.store.product_count(),
            orders: state.store.order_count(),
            users: state.store.user_count(),
            generation: state.generation,
            trained_at: state.trained_at,
        }
    }

    pub fn source(&self) -> &Arc<dyn CorpusSource> {
        &self.source
    }
}
