use atlas_layout::{GroupKey, GroupNames, LayoutOptions, Record, layout};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "slay", "rizz", "aura", "mid", "cheugy", "bussin", "delulu", "shade", "tea", "receipts",
    "vibe", "check", "main", "character", "energy", "touch", "grass", "understood", "assignment",
];

fn records(n: usize, groups: i64) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let text = format!(
                "{} {} {}",
                WORDS[i % WORDS.len()],
                WORDS[(i * 7 + 3) % WORDS.len()],
                WORDS[(i / 5) % WORDS.len()]
            );
            Record::new(i as i64 + 1, [text], Some(GroupKey::Int(i as i64 % groups)))
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let opts = LayoutOptions::default();
    let names = GroupNames::new();

    let mut group = c.benchmark_group("atlas_layout");
    for &(n, groups) in &[(60usize, 6i64), (240, 12), (1000, 24)] {
        let input = records(n, groups);
        group.bench_with_input(
            BenchmarkId::new("records", format!("{n}x{groups}")),
            &input,
            |b, input| {
                b.iter(|| {
                    let out = layout(black_box(input), &names, &opts).expect("layout");
                    black_box(out.node_count());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
