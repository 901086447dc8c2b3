//! Sentence similarity graph.
//!
//! Nodes are sentences; an undirected edge joins two sentences whose
//! IDF-weighted cosine similarity exceeds the configured threshold.

use rustc_hash::{FxHashMap, FxHashSet};

use super::segment::Sentence;

/// L2-normalized TF-IDF vector of a sentence.
#[derive(Debug, Clone, Default)]
pub struct TermVector {
    weights: FxHashMap<String, f64>,
}

impl TermVector {
    fn from_terms(terms: &[String], idf: &FxHashMap<&str, f64>) -> Self {
        let mut weights: FxHashMap<String, f64> = FxHashMap::default();
        for term in terms {
            *weights.entry(term.clone()).or_insert(0.0) += 1.0;
        }
        for (term, tf) in weights.iter_mut() {
            *tf *= idf.get(term.as_str()).copied().unwrap_or(1.0);
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        Self { weights }
    }

    /// Cosine similarity; zero when either vector is empty.
    pub fn cosine_similarity(&self, other: &TermVector) -> f64 {
        let (small, large) =
            if self.weights.len() <= other.weights.len() { (self, other) } else { (other, self) };
        small
            .weights
            .iter()
            .filter_map(|(term, w)| large.weights.get(term).map(|o| w * o))
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Smoothed inverse document frequency, treating each sentence as a document.
fn inverse_document_frequency(sentences: &[Sentence]) -> FxHashMap<&str, f64> {
    let mut df: FxHashMap<&str, usize> = FxHashMap::default();
    for sentence in sentences {
        let unique: FxHashSet<&str> = sentence.terms.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let n = sentences.len() as f64;
    df.into_iter()
        .map(|(term, count)| (term, ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0))
        .collect()
}

/// Weighted undirected graph over sentences, stored as sorted adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct SimilarityGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    total_weight: Vec<f64>,
}

impl SimilarityGraph {
    /// Build the graph, linking pairs whose similarity is strictly above `threshold`.
    pub fn build(sentences: &[Sentence], threshold: f64) -> Self {
        let idf = inverse_document_frequency(sentences);
        let vectors: Vec<TermVector> = sentences.iter().map(|s| TermVector::from_terms(&s.terms, &idf)).collect();

        let n = vectors.len();
        let mut adjacency = vec![Vec::new(); n];
        for i in 0..n {
            for j in (i + 1)..n {
                let similarity = vectors[i].cosine_similarity(&vectors[j]);
                if similarity > threshold && similarity.is_finite() {
                    adjacency[i].push((j, similarity));
                    adjacency[j].push((i, similarity));
                }
            }
        }
        for edges in &mut adjacency {
            edges.sort_by_key(|(target, _)| *target);
        }

        let total_weight = adjacency.iter().map(|edges| edges.iter().map(|(_, w)| w).sum()).collect();
        Self { adjacency, total_weight }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Undirected edge count.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[node].iter().copied()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Sum of edge weights incident to `node`.
    pub fn weighted_degree(&self, node: usize) -> f64 {
        self.total_weight[node]
    }

    /// Nodes with no edges.
    pub fn isolated_nodes(&self) -> Vec<usize> {
        (0..self.num_nodes()).filter(|&n| self.adjacency[n].is_empty()).collect()
    }

    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.adjacency[a]
            .binary_search_by_key(&b, |(target, _)| *target)
            .ok()
            .map(|i| self.adjacency[a][i].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(position: usize, terms: &[&str]) -> Sentence {
        Sentence {
            position,
            text: terms.join(" "),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_identical_sentences_fully_similar() {
        let sentences = vec![sentence(0, &["graph", "rank"]), sentence(1, &["graph", "rank"])];
        let graph = SimilarityGraph::build(&sentences, 0.1);
        let weight = graph.edge_weight(0, 1).unwrap();
        assert!((weight - 1.0).abs() < 1e-9);
        assert_eq!(graph.edge_weight(1, 0), Some(weight));
    }

    #[test]
    fn test_no_self_edges_and_symmetry() {
        let sentences = vec![
            sentence(0, &["graph", "rank", "node"]),
            sentence(1, &["graph", "edge"]),
            sentence(2, &["rank", "node", "score"]),
        ];
        let graph = SimilarityGraph::build(&sentences, 0.0);
        for node in 0..graph.num_nodes() {
            assert!(graph.edge_weight(node, node).is_none());
            for (neighbor, weight) in graph.neighbors(node) {
                assert_eq!(graph.edge_weight(neighbor, node), Some(weight));
            }
        }
    }

    #[test]
    fn test_disjoint_sentences_are_isolated() {
        let sentences =
            vec![sentence(0, &["alpha", "beta"]), sentence(1, &["gamma"]), sentence(2, &["alpha", "delta"])];
        let graph = SimilarityGraph::build(&sentences, 0.0);
        assert_eq!(graph.isolated_nodes(), vec![1]);
        assert_eq!(graph.degree(1), 0);
        assert_eq!(graph.weighted_degree(1), 0.0);
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_empty_terms_never_link() {
        let sentences = vec![sentence(0, &[]), sentence(1, &[])];
        let graph = SimilarityGraph::build(&sentences, 0.0);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.isolated_nodes(), vec![0, 1]);
    }

    #[test]
    fn test_threshold_prunes_weak_edges() {
        let sentences = vec![
            sentence(0, &["graph", "alpha", "beta", "gamma", "delta"]),
            sentence(1, &["graph", "epsilon", "zeta", "eta", "theta"]),
        ];
        let loose = SimilarityGraph::build(&sentences, 0.0);
        assert_eq!(loose.num_edges(), 1);
        let weight = loose.edge_weight(0, 1).unwrap();

        let strict = SimilarityGraph::build(&sentences, weight);
        assert_eq!(strict.num_edges(), 0);
    }

    #[test]
    fn test_idf_downweights_common_terms() {
        // "common" appears everywhere; "rare" links only the first two sentences.
        let sentences = vec![
            sentence(0, &["common", "rare"]),
            sentence(1, &["common", "rare"]),
            sentence(2, &["common", "other"]),
        ];
        let graph = SimilarityGraph::build(&sentences, 0.0);
        let strong = graph.edge_weight(0, 1).unwrap();
        let weak = graph.edge_weight(0, 2).unwrap();
        assert!(strong > weak);
    }

    #[test]
    fn test_empty_graph() {
        let graph = SimilarityGraph::build(&[], 0.1);
        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_edges(), 0);
    }
}
