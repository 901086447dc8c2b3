//! Eigenvector-style centrality over the similarity graph.
//!
//! Damped power iteration with weighted transitions. Isolated sentences have
//! no outgoing weight; their mass is spread uniformly instead of divided by a
//! zero degree.

use super::graph::SimilarityGraph;
use crate::config::RankingConfig;

/// Scores produced by [`CentralityRanker::run`].
#[derive(Debug, Clone)]
pub struct CentralityScores {
    /// One score per sentence, summing to 1.
    pub scores: Vec<f64>,
    pub iterations: usize,
    /// L1 delta of the last iteration.
    pub delta: f64,
    pub converged: bool,
}

impl CentralityScores {
    pub fn score(&self, node: usize) -> f64 {
        self.scores.get(node).copied().unwrap_or(0.0)
    }
}

/// Power-iteration ranker.
#[derive(Debug, Clone)]
pub struct CentralityRanker {
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for CentralityRanker {
    fn default() -> Self {
        Self { damping: 0.85, max_iterations: 100, tolerance: 1e-6 }
    }
}

impl From<&RankingConfig> for CentralityRanker {
    fn from(config: &RankingConfig) -> Self {
        Self { damping: config.damping, max_iterations: config.max_iterations, tolerance: config.tolerance }
    }
}

impl CentralityRanker {
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Iterate until the L1 delta is within tolerance or the cap is hit.
    ///
    /// Hitting the cap is not an error: the last snapshot is returned with
    /// `converged == false`.
    pub fn run(&self, graph: &SimilarityGraph) -> CentralityScores {
        let n = graph.num_nodes();
        if n == 0 {
            return CentralityScores { scores: vec![], iterations: 0, delta: 0.0, converged: true };
        }

        let uniform = 1.0 / n as f64;
        let mut scores = vec![uniform; n];
        let mut next = vec![0.0; n];
        let isolated = graph.isolated_nodes();
        let teleport = (1.0 - self.damping) * uniform;

        let mut iterations = 0;
        let mut delta = f64::MAX;
        while iterations < self.max_iterations && delta > self.tolerance {
            iterations += 1;

            let isolated_mass: f64 = isolated.iter().map(|&node| scores[node]).sum();
            next.fill(teleport + self.damping * isolated_mass * uniform);

            for (node, &score) in scores.iter().enumerate() {
                let total = graph.weighted_degree(node);
                if total > 0.0 {
                    for (neighbor, weight) in graph.neighbors(node) {
                        next[neighbor] += self.damping * score * weight / total;
                    }
                }
            }

            delta = scores.iter().zip(next.iter()).map(|(old, new)| (old - new).abs()).sum();
            std::mem::swap(&mut scores, &mut next);
        }

        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            for score in &mut scores {
                *score /= sum;
            }
        }

        let converged = delta <= self.tolerance;
        if !converged {
            tracing::warn!(iterations, delta, "centrality did not converge; using last scores");
        }

        CentralityScores { scores, iterations, delta, converged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::segment::Sentence;

    fn graph_of(term_lists: &[&[&str]]) -> SimilarityGraph {
        let sentences: Vec<Sentence> = term_lists
            .iter()
            .enumerate()
            .map(|(position, terms)| Sentence {
                position,
                text: terms.join(" "),
                terms: terms.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        SimilarityGraph::build(&sentences, 0.0)
    }

    #[test]
    fn test_symmetric_graph_equal_scores() {
        let graph = graph_of(&[&["a", "b"], &["a", "b"], &["a", "b"]]);
        let result = CentralityRanker::default().run(&graph);
        assert!(result.converged);
        for score in &result.scores {
            assert!((score - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hub_sentence_ranks_highest() {
        // Sentence 0 shares a term with each of the others; they share nothing among themselves.
        let graph = graph_of(&[&["x", "y", "z"], &["x", "p"], &["y", "q"], &["z", "r"]]);
        let result = CentralityRanker::default().run(&graph);
        assert!(result.converged);
        for node in 1..4 {
            assert!(result.score(0) > result.score(node));
        }
    }

    #[test]
    fn test_scores_sum_to_one_with_isolated_nodes() {
        let graph = graph_of(&[&["a", "b"], &["a", "c"], &["lonely"], &[]]);
        let result = CentralityRanker::default().run(&graph);
        let sum: f64 = result.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(result.scores.iter().all(|s| s.is_finite() && *s > 0.0));
    }

    #[test]
    fn test_all_isolated_is_uniform() {
        let graph = graph_of(&[&["a"], &["b"], &["c"], &["d"]]);
        let result = CentralityRanker::default().run(&graph);
        assert!(result.converged);
        for score in &result.scores {
            assert!((score - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_graph() {
        let result = CentralityRanker::default().run(&SimilarityGraph::default());
        assert!(result.converged);
        assert!(result.scores.is_empty());
    }

    #[test]
    fn test_iteration_cap_returns_snapshot() {
        let graph = graph_of(&[&["x", "y", "z"], &["x", "p"], &["y", "q"], &["z", "r"]]);
        let result = CentralityRanker::default().with_max_iterations(1).with_tolerance(1e-15).run(&graph);
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert_eq!(result.scores.len(), 4);
        let sum: f64 = result.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_ranking_config() {
        let config = RankingConfig { damping: 0.5, max_iterations: 7, tolerance: 0.01, similarity_threshold: 0.2 };
        let ranker = CentralityRanker::from(&config);
        assert_eq!(ranker.damping, 0.5);
        assert_eq!(ranker.max_iterations, 7);
        assert_eq!(ranker.tolerance, 0.01);
    }
}
