//! Grouping, per-cluster solving and placement onto the global percentage canvas.

use crate::algo::force::{self, Solution};
use crate::algo::{ComposeOptions, LayoutOptions};
use crate::model::{
    AtlasLayout, ClusterLayout, GroupKey, GroupNames, Link, NodePosition, Point, Record, RecordId,
};
use crate::prng::centered;
use crate::similarity::SimilarityMatrix;
use crate::text::Tokenizer;
use crate::tfidf::{TermVector, vectorize};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::f64::consts::TAU;

/// Groups record indices by key, in order of first appearance. Records without a key share the
/// `None` bucket.
pub fn group_records(records: &[Record]) -> IndexMap<Option<GroupKey>, Vec<usize>> {
    let mut groups: IndexMap<Option<GroupKey>, Vec<usize>> = IndexMap::new();
    for (idx, r) in records.iter().enumerate() {
        groups.entry(r.group.clone()).or_default().push(idx);
    }
    groups
}

/// Similarity of the laid-out members of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSimilarity {
    pub key: Option<GroupKey>,
    pub ids: Vec<RecordId>,
    pub matrix: SimilarityMatrix,
}

/// Per-cluster similarity matrices over the same (capped) members `layout` would place.
pub fn cluster_similarities(records: &[Record], opts: &LayoutOptions) -> Vec<ClusterSimilarity> {
    let tokenizer = Tokenizer::default();
    group_records(records)
        .into_iter()
        .map(|(key, members)| {
            let laid_out = &members[..members.len().min(opts.compose.node_cap)];
            let (_, matrix) = vectorize_members(&tokenizer, records, laid_out);
            ClusterSimilarity {
                key,
                ids: laid_out.iter().map(|&i| records[i].id.clone()).collect(),
                matrix,
            }
        })
        .collect()
}

fn vectorize_members(
    tokenizer: &Tokenizer<'_>,
    records: &[Record],
    members: &[usize],
) -> (Vec<TermVector>, SimilarityMatrix) {
    let documents: Vec<String> = members.iter().map(|&i| records[i].document()).collect();
    let vectors = vectorize(tokenizer, &documents);
    let matrix = SimilarityMatrix::from_vectors(&vectors);
    (vectors, matrix)
}

fn cluster_seed(index: usize) -> f64 {
    (index as f64 + 1.0) * 101.0
}

/// Anchor of cluster `index` on the centroid ring.
///
/// A lone cluster sits at the canvas center; an index on a one-point ring has no meaningful
/// angle.
pub fn centroid(index: usize, count: usize, opts: &ComposeOptions) -> Point {
    if count <= 1 {
        return Point::new(opts.center_x, opts.center_y);
    }
    let seed = cluster_seed(index);
    let angle =
        TAU * (index as f64) / (count as f64) + centered(seed + 0.3, opts.centroid_angle_jitter);
    let radius_scale = 1.0 + centered(seed + 0.9, 2.0 * opts.centroid_radius_jitter);
    Point::new(
        opts.center_x + angle.cos() * opts.ring_radius_x * radius_scale,
        opts.center_y + angle.sin() * opts.ring_radius_y * radius_scale,
    )
}

/// Visual radius (percent units) of a cluster with `member_count` members.
pub fn cluster_radius(member_count: usize, opts: &ComposeOptions) -> f64 {
    opts.base_cluster_radius + opts.growth_cap.min(member_count as f64 * opts.per_member_growth)
}

/// Highest summed TF-IDF weights across the cluster, ties broken alphabetically.
fn top_terms(vectors: &[TermVector], limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }
    let mut totals: FxHashMap<&str, f64> = FxHashMap::default();
    for v in vectors {
        for (term, w) in v.iter() {
            *totals.entry(term).or_insert(0.0) += w;
        }
    }
    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(t, _)| t.to_string())
        .collect()
}

pub(crate) fn compose(records: &[Record], names: &GroupNames, opts: &LayoutOptions) -> AtlasLayout {
    let groups = group_records(records);
    let count = groups.len();
    let _span = tracing::debug_span!("atlas_layout", records = records.len(), clusters = count)
        .entered();

    let tokenizer = Tokenizer::default();
    let c = &opts.compose;
    let mut clusters: Vec<ClusterLayout> = Vec::with_capacity(count);
    for (index, (key, members)) in groups.into_iter().enumerate() {
        let seed = cluster_seed(index);
        let anchor = centroid(index, count, c);

        let cap = members.len().min(c.node_cap);
        let (laid_out, capped) = members.split_at(cap);
        for &i in capped {
            tracing::trace!(id = %records[i].id, cluster = index, "member beyond node cap");
        }

        let (vectors, matrix) = vectorize_members(&tokenizer, records, laid_out);
        let seeds: Vec<f64> = laid_out.iter().map(|&i| records[i].id.seed()).collect();
        let Solution {
            positions,
            iterations,
            converged_early,
        } = force::solve(&seeds, &matrix, seed, &opts.solver);

        let max_dist = positions
            .iter()
            .map(|p| p.x.hypot(p.y))
            .fold(0.0f64, f64::max)
            .max(1.0);
        let scale = cluster_radius(members.len(), c) / max_dist;
        let scale_x = 1.0 + centered(seed + 1.7, c.scale_jitter);
        let scale_y = 1.0 + centered(seed + 2.3, c.scale_jitter);

        let lo = c.canvas_margin;
        let hi = 100.0 - c.canvas_margin;
        let nodes: Vec<NodePosition> = laid_out
            .iter()
            .zip(positions.iter().zip(&seeds))
            .map(|(&record_index, (local, &id_seed))| {
                let x = anchor.x
                    + local.x * scale * scale_x
                    + centered(id_seed * 5.3 + seed + 3.1, c.node_jitter);
                let y = anchor.y
                    + local.y * scale * scale_y
                    + centered(id_seed * 5.3 + seed + 4.7, c.node_jitter);
                NodePosition {
                    id: records[record_index].id.clone(),
                    record_index,
                    position: Point::new(x.clamp(lo, hi), y.clamp(lo, hi)),
                }
            })
            .collect();

        let links: Vec<Link> = matrix
            .pairs_at_least(opts.solver.similarity_threshold)
            .map(|(i, j, similarity)| Link {
                source: records[laid_out[i]].id.clone(),
                target: records[laid_out[j]].id.clone(),
                similarity,
            })
            .collect();

        tracing::debug!(
            cluster = index,
            members = members.len(),
            nodes = nodes.len(),
            links = links.len(),
            iterations,
            converged_early,
            "cluster laid out"
        );

        clusters.push(ClusterLayout {
            name: names.resolve(key.as_ref()),
            key,
            member_count: members.len(),
            centroid: anchor,
            nodes,
            links,
            top_terms: top_terms(&vectors, c.top_terms),
            iterations,
        });
    }

    AtlasLayout { clusters }
}

#[cfg(test)]
mod tests {
    use super::{centroid, cluster_radius, group_records, top_terms};
    use crate::algo::ComposeOptions;
    use crate::model::{GroupKey, Record};
    use crate::text::Tokenizer;
    use crate::tfidf::vectorize;

    #[test]
    fn groups_follow_first_appearance() {
        let records = vec![
            Record::new(1, ["a"], Some(GroupKey::Int(2))),
            Record::new(2, ["b"], None),
            Record::new(3, ["c"], Some(GroupKey::Int(1))),
            Record::new(4, ["d"], Some(GroupKey::Int(2))),
            Record::new(5, ["e"], None),
        ];
        let groups = group_records(&records);
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![Some(GroupKey::Int(2)), None, Some(GroupKey::Int(1))]
        );
        assert_eq!(groups[&Some(GroupKey::Int(2))], vec![0, 3]);
        assert_eq!(groups[&None::<GroupKey>], vec![1, 4]);
    }

    #[test]
    fn keys_with_the_same_display_form_group_together() {
        let records = vec![
            Record::new(1, ["a"], Some(GroupKey::from("7"))),
            Record::new(2, ["b"], Some(GroupKey::Int(7))),
            Record::new(3, ["c"], Some(GroupKey::Int(8))),
        ];
        let groups = group_records(&records);
        assert_eq!(groups.len(), 2);
        // The first-seen form is kept as the cluster key.
        let (key, members) = groups.get_index(0).unwrap();
        assert!(matches!(key, Some(GroupKey::Str(s)) if s == "7"));
        assert_eq!(members, &vec![0, 1]);
    }

    #[test]
    fn single_cluster_is_centered() {
        let opts = ComposeOptions::default();
        let c = centroid(0, 1, &opts);
        assert_eq!((c.x, c.y), (opts.center_x, opts.center_y));
    }

    #[test]
    fn centroids_sit_near_the_ring() {
        let opts = ComposeOptions::default();
        for i in 0..6 {
            let c = centroid(i, 6, &opts);
            let nx = (c.x - opts.center_x) / opts.ring_radius_x;
            let ny = (c.y - opts.center_y) / opts.ring_radius_y;
            let r = nx.hypot(ny);
            assert!(
                (r - 1.0).abs() <= opts.centroid_radius_jitter + 1e-9,
                "cluster {i} ring radius {r}"
            );
        }
    }

    #[test]
    fn cluster_radius_growth_is_capped() {
        let opts = ComposeOptions::default();
        assert_eq!(cluster_radius(0, &opts), 6.0);
        assert!((cluster_radius(5, &opts) - 9.0).abs() < 1e-12);
        assert_eq!(cluster_radius(500, &opts), 14.0);
    }

    #[test]
    fn top_terms_rank_by_summed_weight() {
        let docs = ["shade shade tea", "shade receipts", "tea"];
        let v = vectorize(&Tokenizer::default(), &docs);
        assert_eq!(top_terms(&v, 2), vec!["shade", "tea"]);
        assert!(top_terms(&v, 0).is_empty());
        assert_eq!(top_terms(&v, 10).len(), 3);
    }
}
