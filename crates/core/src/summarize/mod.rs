//! Extractive summarization by sentence centrality (LexRank).
//!
//! - Segment text into sentences and normalized term bags.
//! - Link sentences by IDF-weighted cosine similarity.
//! - Rank sentences by damped power iteration over the weighted graph.
//! - Keep the top `n` and restore document order.

pub mod graph;
pub mod rank;
pub mod segment;

pub use graph::SimilarityGraph;
pub use rank::{CentralityRanker, CentralityScores};
pub use segment::{Language, Segmenter, Sentence, UnsupportedLanguage};

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::config::AppConfig;

/// Scores closer than this are treated as ties and ordered by position.
const TIE_RESOLUTION: f64 = 1e-9;

/// A sentence chosen for the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SummarySentence {
    pub position: usize,
    pub text: String,
    pub score: f64,
}

/// Selected sentences in document order plus their joined text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Summary {
    pub sentences: Vec<SummarySentence>,
    /// Sentences joined with single spaces.
    pub text: String,
    /// Number of sentences the input segmented into.
    pub total_sentences: usize,
}

/// LexRank summarizer.
#[derive(Debug, Clone)]
pub struct Summarizer {
    segmenter: Segmenter,
    ranker: CentralityRanker,
    similarity_threshold: f64,
}

impl Summarizer {
    pub fn new(language: Language) -> Self {
        Self { segmenter: Segmenter::new(language), ranker: CentralityRanker::default(), similarity_threshold: 0.1 }
    }

    /// Build from the application config; fails if the language is unsupported.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let language: Language = config
            .language
            .parse()
            .map_err(|e: UnsupportedLanguage| Error::InvalidParameter(e.to_string()))?;
        Ok(Self {
            segmenter: Segmenter::new(language),
            ranker: CentralityRanker::from(&config.ranking),
            similarity_threshold: config.ranking.similarity_threshold,
        })
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_ranker(mut self, ranker: CentralityRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn language(&self) -> Language {
        self.segmenter.language()
    }

    /// Summarize `text` into at most `sentence_count` sentences.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` when `sentence_count` is 0
    /// - `EmptyInput` when `text` contains no sentence
    pub fn summarize(&self, text: &str, sentence_count: usize) -> Result<Summary, Error> {
        if sentence_count == 0 {
            return Err(Error::InvalidParameter("sentence_count must be at least 1".into()));
        }

        let sentences = self.segmenter.segment(text);
        if sentences.is_empty() {
            return Err(Error::EmptyInput("text contains no sentences".into()));
        }

        let graph = SimilarityGraph::build(&sentences, self.similarity_threshold);
        let ranking = self.ranker.run(&graph);

        tracing::debug!(
            sentences = sentences.len(),
            edges = graph.num_edges(),
            iterations = ranking.iterations,
            converged = ranking.converged,
            "ranked sentences"
        );

        let mut selected = select_top(&ranking.scores, sentence_count);
        selected.sort_unstable();

        let total_sentences = sentences.len();
        let mut picked: Vec<Option<Sentence>> = sentences.into_iter().map(Some).collect();
        let chosen: Vec<SummarySentence> = selected
            .into_iter()
            .filter_map(|i| {
                picked[i].take().map(|s| SummarySentence { position: s.position, text: s.text, score: ranking.score(i) })
            })
            .collect();

        let text = chosen.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" ");
        Ok(Summary { sentences: chosen, text, total_sentences })
    }
}

/// Indices of the `k` highest scores; ties go to the earlier position.
fn select_top(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<(i64, usize)> =
        scores.iter().enumerate().map(|(i, s)| ((s / TIE_RESOLUTION).round() as i64, i)).collect();
    order.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    order.into_iter().take(k).map(|(_, i)| i).collect()
}
