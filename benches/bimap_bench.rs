use bidi_map::{BiMap, OrderedBiMap};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::collections::HashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (BiMap<String, u64>, Vec<String>) {
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    let m = keys.iter().cloned().zip(0u64..).collect();
    (m, keys)
}

fn bench_emplace(c: &mut Criterion) {
    c.bench_function("bimap_emplace_10k", |b| {
        b.iter_batched(
            BiMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.emplace(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    // Baseline: the same pairs kept in two std maps with cloned keys.
    c.bench_function("two_hashmaps_insert_10k", |b| {
        b.iter_batched(
            || (HashMap::<String, u64>::new(), HashMap::<u64, String>::new()),
            |(mut fwd, mut inv)| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    let k = key(x);
                    inv.insert(i as u64, k.clone());
                    fwd.insert(k, i as u64);
                }
                black_box((fwd, inv))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let (m, keys) = filled(7, 20_000);
    c.bench_function("bimap_get_hit", |b| {
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k.as_str()));
        })
    });
    c.bench_function("bimap_inverse_get_hit", |b| {
        let mut n = (0u64..20_000).cycle();
        b.iter(|| {
            let v = n.next().unwrap();
            black_box(m.inverse().get(&v));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let (m, _) = filled(11, 10_000);
    c.bench_function("bimap_get_miss", |b| {
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(m.get(k.as_str()));
        })
    });
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let (mut m, keys) = filled(13, 10_000);
    c.bench_function("bimap_remove_reinsert", |b| {
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            let h = m.find(k.as_str()).unwrap();
            let (l, r) = m.remove(h).unwrap();
            black_box(m.emplace(l, r));
        })
    });
}

fn bench_ordered(c: &mut Criterion) {
    let m: OrderedBiMap<u64, u64> = lcg(17).take(10_000).zip(0u64..).collect();
    c.bench_function("ordered_bimap_iter_10k", |b| {
        b.iter(|| black_box(m.iter().fold(0u64, |acc, (l, r)| acc ^ l ^ r)))
    });
    // Worst case for the sorted index: every insert lands at the front.
    c.bench_function("ordered_bimap_collect_descending_10k", |b| {
        b.iter(|| {
            let m: OrderedBiMap<u64, u64> = (0u64..10_000).rev().map(|i| (i, i)).collect();
            black_box(m)
        })
    });
    c.bench_function("ordered_bimap_lower_bound", |b| {
        let mut queries = lcg(19);
        b.iter(|| {
            let q = queries.next().unwrap();
            black_box(m.lower_bound(&q).next());
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_emplace, bench_get_hit, bench_get_miss, bench_remove_reinsert, bench_ordered
}
criterion_main!(benches);
