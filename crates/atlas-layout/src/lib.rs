#![forbid(unsafe_code)]

//! Headless clustering layout for the term atlas.
//!
//! `atlas-layout` turns a flat list of records (an id, some free text and an optional group key)
//! into 2D positions on a percentage canvas. Records are grouped by key, each group is vectorized
//! with TF-IDF, and a small force-directed simulation pulls similar records together before the
//! groups are arranged on an outer ring.
//!
//! The whole pipeline is a pure function of its input: the same records in the same order always
//! produce bit-identical positions.

pub mod algo;
pub mod compose;
pub mod error;
pub mod model;
pub mod prng;
pub mod similarity;
pub mod text;
pub mod tfidf;

pub use algo::{ComposeOptions, LayoutOptions, SolverOptions};
pub use compose::{ClusterSimilarity, cluster_similarities, group_records};
pub use error::{Error, Result};
pub use model::{
    AtlasLayout, ClusterLayout, GroupKey, GroupNames, Link, NodePosition, Point, Record, RecordId,
    UNCLASSIFIED,
};
pub use similarity::{SimilarityMatrix, cosine_similarity};
pub use text::{STOPWORDS, Tokenizer, tokenize};
pub use tfidf::{TermVector, vectorize};

/// Headless layout entry point.
pub fn layout(
    records: &[Record],
    names: &GroupNames,
    opts: &LayoutOptions,
) -> Result<AtlasLayout> {
    opts.validate()?;
    Ok(compose::compose(records, names, opts))
}
