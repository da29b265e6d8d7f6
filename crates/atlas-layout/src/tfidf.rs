//! TF-IDF vectorization over a per-cluster corpus.

use crate::text::Tokenizer;
use rustc_hash::FxHashMap;

/// Sparse term weights for one document. Absent tokens weigh 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: FxHashMap<String, f64>,
}

impl TermVector {
    pub fn get(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for TermVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// `ln((1 + N) / (1 + df)) + 1`; strictly positive even when a term is in every document.
pub fn smoothed_idf(corpus_size: usize, document_frequency: usize) -> f64 {
    ((1.0 + corpus_size as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Vectorizes `documents` (one per record, same order) with raw term counts and smoothed IDF.
pub fn vectorize<S: AsRef<str>>(tokenizer: &Tokenizer<'_>, documents: &[S]) -> Vec<TermVector> {
    let counts: Vec<FxHashMap<String, usize>> = documents
        .iter()
        .map(|doc| {
            let mut tf: FxHashMap<String, usize> = FxHashMap::default();
            for token in tokenizer.tokenize(doc.as_ref()) {
                *tf.entry(token).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    let mut df: FxHashMap<&str, usize> = FxHashMap::default();
    for tf in &counts {
        for term in tf.keys() {
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let n = documents.len();
    counts
        .iter()
        .map(|tf| {
            tf.iter()
                .map(|(term, &count)| {
                    let idf = smoothed_idf(n, df.get(term.as_str()).copied().unwrap_or(0));
                    (term.clone(), count as f64 * idf)
                })
                .collect()
        })
        .collect()
}
