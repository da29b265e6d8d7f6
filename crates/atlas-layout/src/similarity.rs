use crate::tfidf::TermVector;

/// Cosine similarity of two sparse vectors, in `[0, 1]` for non-negative weights.
///
/// A zero-norm operand gives 0. The dot product walks the smaller vector; since `f64`
/// addition is not associative, callers that need `sim(a, b) == sim(b, a)` bit-for-bit should
/// compute each unordered pair once, as [`SimilarityMatrix`] does.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if small.is_empty() {
        return 0.0;
    }
    let norm = small.norm() * large.norm();
    if norm <= 0.0 || !norm.is_finite() {
        return 0.0;
    }
    let dot: f64 = small.iter().map(|(term, w)| w * large.get(term)).sum();
    (dot / norm).clamp(0.0, 1.0)
}

/// Symmetric pairwise similarity with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    // Row-major, n * n.
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_vectors(vectors: &[TermVector]) -> Self {
        let n = vectors.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let s = cosine_similarity(&vectors[i], &vectors[j]);
                values[i * n + j] = s;
                values[j * n + i] = s;
            }
        }
        Self { n, values }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity of `i` and `j`; always 0 on the diagonal.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j || i >= self.n || j >= self.n {
            return 0.0;
        }
        self.values[i * self.n + j]
    }

    /// Unordered pairs `(i, j, sim)` with `i < j` and `sim >= threshold`.
    pub fn pairs_at_least(&self, threshold: f64) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n).flat_map(move |i| {
            ((i + 1)..self.n).filter_map(move |j| {
                let s = self.values[i * self.n + j];
                (s >= threshold).then_some((i, j, s))
            })
        })
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.n.max(1))
            .take(self.n)
            .map(<[f64]>::to_vec)
            .collect()
    }
}
