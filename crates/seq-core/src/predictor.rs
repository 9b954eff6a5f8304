use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, KnownSequence, SessionMemory};
use crate::constants::{DEFAULT_DEPTH_LIMIT, DEFAULT_FAMILIARITY};
use crate::log_tree::LogTree;
use crate::matcher::LookupMatch;
use crate::search::{Budget, SearchEngine, Strategy, log_line};
use crate::sequence::{Sequence, Term};

/// Tunables for a prediction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Recursion budget for the top-level search.
    pub depth_limit: u32,
    /// Familiarity the query gets when remembered for its own session.
    pub session_familiarity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            session_familiarity: DEFAULT_FAMILIARITY,
        }
    }
}

/// Answer returned to callers.
#[derive(Clone, Debug, Serialize)]
pub struct Prediction {
    /// Predicted next term; `None` means no heuristic applied.
    pub value: Option<Term>,
    pub depth: u32,
    /// Top-level strategy that produced `value`.
    pub strategy: Option<Strategy>,
    /// Database entry when the answer came straight from a lookup.
    pub matched: Option<LookupMatch>,
    pub explanation: LogTree,
}

impl Prediction {
    /// Rendered explanation outline.
    pub fn lines(&self) -> Vec<String> {
        self.explanation.lines()
    }
}

/// Serialize a prediction for transport.
pub fn export_json(prediction: &Prediction) -> serde_json::Result<String> {
    serde_json::to_string_pretty(prediction)
}

/// Entry point: predicts with a catalog and a config, giving every call its
/// own session memory.
#[derive(Clone, Debug)]
pub struct Predictor<'a> {
    catalog: &'a Catalog,
    config: SearchConfig,
}

impl Predictor<'static> {
    /// Predictor over the standard catalog.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_catalog(Catalog::standard(), config)
    }
}

impl Default for Predictor<'static> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<'a> Predictor<'a> {
    pub fn with_catalog(catalog: &'a Catalog, config: SearchConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Predict the term following `seq`.
    ///
    /// Never fails: inputs shorter than two terms, exhausted budgets and
    /// unmatched sequences all come back with `value == None`.
    pub fn predict(&self, seq: &Sequence) -> Prediction {
        tracing::debug!(
            terms = seq.len(),
            depth_limit = self.config.depth_limit,
            "predicting next term of [{seq}]"
        );

        let mut session = SessionMemory::new();
        session.remember(KnownSequence::new(
            "query",
            seq.clone(),
            self.config.session_familiarity,
        ));

        let engine = SearchEngine::new(self.catalog, &session);
        let result = engine.search(seq, Budget::new(self.config.depth_limit));

        let mut explanation = LogTree::new();
        explanation.add_line(log_line(seq, result.value, ""));
        explanation.add_subtree(result.log_tree);

        tracing::debug!(
            value = ?result.value,
            depth = result.depth,
            strategy = result.strategy.map(Strategy::name),
            "prediction finished"
        );

        Prediction {
            value: result.value,
            depth: result.depth,
            strategy: result.strategy,
            matched: result.matched,
            explanation,
        }
    }

    /// Independent predictions; no memory is shared between them.
    pub fn predict_batch(&self, sequences: &[Sequence]) -> Vec<Prediction> {
        sequences.iter().map(|seq| self.predict(seq)).collect()
    }
}

/// Predict with the standard catalog and default configuration.
pub fn predict(seq: &Sequence) -> Prediction {
    Predictor::default().predict(seq)
}
