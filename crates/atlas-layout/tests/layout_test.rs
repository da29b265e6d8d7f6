use atlas_layout::{
    GroupKey, GroupNames, LayoutOptions, Record, RecordId, UNCLASSIFIED, cluster_similarities,
    layout,
};
use std::f64::consts::TAU;

fn rec(id: i64, text: &str, group: Option<i64>) -> Record {
    Record::new(id, [text], group.map(GroupKey::Int))
}

#[test]
fn layout_of_no_records_is_empty() {
    let out = layout(&[], &GroupNames::new(), &LayoutOptions::default()).unwrap();
    assert!(out.clusters.is_empty());
    assert_eq!(out.node_count(), 0);
}

#[test]
fn layout_rejects_invalid_options() {
    let mut opts = LayoutOptions::default();
    opts.solver.min_distance = 0.0;
    assert!(layout(&[rec(1, "word", None)], &GroupNames::new(), &opts).is_err());
}

#[test]
fn singleton_cluster_has_one_node_and_no_iterations() {
    let out = layout(
        &[rec(1, "lonely term", Some(4))],
        &GroupNames::new(),
        &LayoutOptions::default(),
    )
    .unwrap();
    assert_eq!(out.clusters.len(), 1);
    let c = &out.clusters[0];
    assert_eq!(c.nodes.len(), 1);
    assert_eq!(c.member_count, 1);
    assert_eq!(c.iterations, 0);
    assert!(c.links.is_empty());
    assert_eq!((c.centroid.x, c.centroid.y), (50.0, 50.0));
}

#[test]
fn shared_tokens_make_records_similar() {
    let records = vec![
        rec(1, "throw shade hard", Some(1)),
        rec(2, "throw shade often", Some(1)),
        rec(3, "completely different wording", Some(1)),
    ];
    let sims = cluster_similarities(&records, &LayoutOptions::default());
    assert_eq!(sims.len(), 1);
    let m = &sims[0].matrix;
    assert_eq!(sims[0].ids, vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)]);
    assert!(m.get(0, 1) > 0.0);
    assert!(m.get(0, 1) > m.get(0, 2));
    assert!(m.get(0, 1) > m.get(1, 2));
}

#[test]
fn near_duplicates_end_up_closer_than_unrelated_text() {
    for base in [0i64, 10, 100, 1000] {
        let records = vec![
            rec(base + 1, "throw shade hard tonight", Some(1)),
            rec(base + 2, "throw shade hard today", Some(1)),
            rec(base + 3, "completely different wording", Some(1)),
        ];
        let out = layout(&records, &GroupNames::new(), &LayoutOptions::default()).unwrap();
        let p = |i: i64| out.position_of(&RecordId::Int(base + i)).unwrap();
        let near = p(1).distance(&p(2));
        assert!(
            near < p(1).distance(&p(3)) && near < p(2).distance(&p(3)),
            "ids from {base}: near-duplicates {near} apart, unrelated {} / {}",
            p(1).distance(&p(3)),
            p(2).distance(&p(3)),
        );
        assert_eq!(out.clusters[0].links.len(), 1);
    }
}

#[test]
fn fifty_records_across_five_groups() {
    let words = ["slay", "rizz", "aura", "mid", "cheugy", "bussin", "delulu"];
    let records: Vec<Record> = (0..50)
        .map(|i| {
            let text = format!("{} {}", words[i % words.len()], words[(i / 3) % words.len()]);
            rec(i as i64 + 1, &text, Some((i % 5) as i64))
        })
        .collect();
    let opts = LayoutOptions::default();
    let out = layout(&records, &GroupNames::new(), &opts).unwrap();

    assert_eq!(out.clusters.len(), 5);
    assert_eq!(out.member_count(), 50);
    assert!(out.node_count() <= 5 * opts.compose.node_cap);
    for c in &out.clusters {
        assert_eq!(c.member_count, 10);
        assert_eq!(c.nodes.len(), 10);
        assert_eq!(c.name, UNCLASSIFIED);
    }

    let c = &opts.compose;
    let angles: Vec<f64> = out
        .clusters
        .iter()
        .map(|cl| {
            let a = ((cl.centroid.y - c.center_y) / c.ring_radius_y)
                .atan2((cl.centroid.x - c.center_x) / c.ring_radius_x);
            a.rem_euclid(TAU)
        })
        .collect();
    let ideal = TAU / 5.0;
    for i in 0..5 {
        let next = angles[(i + 1) % 5];
        let gap = (next - angles[i]).rem_euclid(TAU);
        assert!(
            (gap - ideal).abs() <= c.centroid_angle_jitter + 1e-9,
            "gap {i}: {gap}"
        );
    }
}

#[test]
fn oversized_cluster_lays_out_exactly_cap_nodes() {
    let records: Vec<Record> = (0..40).map(|i| rec(i, "same words here", Some(9))).collect();
    let opts = LayoutOptions::default();
    let out = layout(&records, &GroupNames::new(), &opts).unwrap();
    let c = &out.clusters[0];
    assert_eq!(c.member_count, 40);
    assert_eq!(c.nodes.len(), opts.compose.node_cap);
    // The first `cap` records in input order are the ones laid out.
    let indices: Vec<usize> = c.nodes.iter().map(|n| n.record_index).collect();
    assert_eq!(indices, (0..opts.compose.node_cap).collect::<Vec<_>>());
}

#[test]
fn missing_keys_share_the_unclassified_bucket() {
    let records = vec![
        rec(1, "slay", None),
        rec(2, "rizz", Some(1)),
        rec(3, "aura", None),
    ];
    let names: GroupNames = [(1, "Compliments")].into_iter().collect();
    let out = layout(&records, &names, &LayoutOptions::default()).unwrap();
    assert_eq!(out.clusters.len(), 2);
    assert_eq!(out.clusters[0].key, None);
    assert_eq!(out.clusters[0].name, UNCLASSIFIED);
    assert_eq!(out.clusters[0].member_count, 2);
    assert_eq!(out.clusters[1].name, "Compliments");
}

#[test]
fn positions_stay_on_the_canvas() {
    let records: Vec<Record> = (0..90)
        .map(|i| rec(i, &format!("term{} shared", i % 4), Some(i % 9)))
        .collect();
    let opts = LayoutOptions::default();
    let out = layout(&records, &GroupNames::new(), &opts).unwrap();
    let lo = opts.compose.canvas_margin;
    let hi = 100.0 - lo;
    for n in out.clusters.iter().flat_map(|c| &c.nodes) {
        assert!((lo..=hi).contains(&n.position.x), "{:?}", n.position);
        assert!((lo..=hi).contains(&n.position.y), "{:?}", n.position);
    }
}

#[test]
fn string_ids_and_keys_are_supported() {
    let records = vec![
        Record::new("a1", ["throw shade"], Some(GroupKey::from("slang"))),
        Record::new("a2", ["throw shade"], Some(GroupKey::from("slang"))),
    ];
    let names: GroupNames = [("slang", "Slang")].into_iter().collect();
    let out = layout(&records, &names, &LayoutOptions::default()).unwrap();
    assert_eq!(out.clusters[0].name, "Slang");
    assert_eq!(out.clusters[0].top_terms, vec!["shade", "throw"]);
    assert!(out.position_of(&RecordId::from("a2")).is_some());
}

#[test]
fn integer_and_string_keys_with_the_same_text_share_a_cluster() {
    let records = vec![
        Record::new(1, ["throw shade"], Some(GroupKey::Int(3))),
        Record::new(2, ["spill tea"], Some(GroupKey::from("3"))),
        Record::new(3, ["slay"], Some(GroupKey::from("03"))),
    ];
    let names: GroupNames = [(3, "Slang")].into_iter().collect();
    let out = layout(&records, &names, &LayoutOptions::default()).unwrap();
    assert_eq!(out.clusters.len(), 2);

    let slang = &out.clusters[0];
    assert_eq!(slang.key, Some(GroupKey::Int(3)));
    assert_eq!(slang.name, "Slang");
    assert_eq!(slang.member_count, 2);
    assert_eq!(slang.nodes.len(), 2);

    assert_eq!(out.clusters[1].name, UNCLASSIFIED);
    assert_eq!(out.clusters[1].member_count, 1);
}

#[test]
fn layout_serializes_to_camel_case_json() {
    let out = layout(
        &[rec(1, "slay", Some(2))],
        &GroupNames::new(),
        &LayoutOptions::default(),
    )
    .unwrap();
    let v = serde_json::to_value(&out).unwrap();
    let cluster = &v["clusters"][0];
    assert_eq!(cluster["key"], 2);
    assert_eq!(cluster["memberCount"], 1);
    assert_eq!(cluster["nodes"][0]["recordIndex"], 0);
    assert!(cluster["nodes"][0]["position"]["x"].is_number());
}
