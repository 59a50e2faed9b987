use criterion::{criterion_group, criterion_main, Criterion};
use lexi_trees::lexi::{D2Map, D3Map, PLMap};
use std::collections::BTreeMap;
use std::hint::black_box;

pub fn bench_lexi_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexi_trees");

    // You can easily adjust this set
    let sizes = [10, 100, 1_000, 10_000];

    //
    // D2Map
    //
    let text = "D2Map";
    println!("\n{text}");
    underline(text.len());
    println!();

    for &n in &sizes {
        group.bench_with_input(format!("d2map_insert_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = D2Map::new(-1, "sentinel");
                for i in 0..n {
                    map.set(black_box(i), "value");
                }
                black_box(map);
            })
        });

        group.bench_with_input(format!("d2map_remove_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = {
                    let mut m = D2Map::new(-1, "sentinel");
                    for i in 0..n {
                        m.set(i, "value");
                    }
                    m
                };
                for i in 0..n {
                    black_box(map.remove(&i));
                }
            });
        });

        group.bench_with_input(format!("d2map_search_{n}"), &n, |b, &n| {
            let mut map = D2Map::new(-1, "sentinel");
            for i in 0..n {
                map.set(i, "value");
            }
            b.iter(|| {
                for i in 0..n {
                    black_box(map.contains(&i));
                }
            })
        });
    }

    //
    // D3Map
    //
    let text = "D3Map";
    println!("\n{text}");
    underline(text.len());
    println!();

    for &n in &sizes {
        group.bench_with_input(format!("d3map_insert_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = D3Map::new(-1, "sentinel");
                for i in 0..n {
                    map.set(black_box(i), "value");
                }
                black_box(map);
            })
        });

        group.bench_with_input(format!("d3map_remove_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = {
                    let mut m = D3Map::new(-1, "sentinel");
                    for i in 0..n {
                        m.set(i, "value");
                    }
                    m
                };
                for i in 0..n {
                    black_box(map.remove(&i));
                }
            });
        });

        group.bench_with_input(format!("d3map_search_{n}"), &n, |b, &n| {
            let mut map = D3Map::new(-1, "sentinel");
            for i in 0..n {
                map.set(i, "value");
            }
            b.iter(|| {
                for i in 0..n {
                    black_box(map.contains(&i));
                }
            })
        });
    }

    //
    // PLMap
    //
    let text = "PLMap";
    println!("\n{text}");
    underline(text.len());
    println!();

    for &n in &sizes {
        group.bench_with_input(format!("plmap_insert_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = PLMap::with_default_p(-1, "sentinel");
                for i in 0..n {
                    map.set(black_box(i), "value");
                }
                black_box(map);
            })
        });

        group.bench_with_input(format!("plmap_remove_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = {
                    let mut m = PLMap::with_default_p(-1, "sentinel");
                    for i in 0..n {
                        m.set(i, "value");
                    }
                    m
                };
                for i in 0..n {
                    black_box(map.remove(&i));
                }
            });
        });

        group.bench_with_input(format!("plmap_search_{n}"), &n, |b, &n| {
            let mut map = PLMap::with_default_p(-1, "sentinel");
            for i in 0..n {
                map.set(i, "value");
            }
            b.iter(|| {
                for i in 0..n {
                    black_box(map.contains(&i));
                }
            })
        });
    }

    //
    // std::collections::BTreeMap
    //
    let text = "std BTreeMap";
    println!("\n{text}");
    underline(text.len());
    println!();

    for &n in &sizes {
        group.bench_with_input(format!("std_btreemap_insert_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for i in 0..n {
                    map.insert(black_box(i), "value");
                }
                black_box(map);
            })
        });

        group.bench_with_input(format!("std_btreemap_remove_{n}"), &n, |b, &n| {
            b.iter(|| {
                let mut map = {
                    let mut m = BTreeMap::new();
                    for i in 0..n {
                        m.insert(i, "value");
                    }
                    m
                };
                for i in 0..n {
                    black_box(map.remove(&i));
                }
            });
        });

        group.bench_with_input(format!("std_btreemap_search_{n}"), &n, |b, &n| {
            let mut map = BTreeMap::new();
            for i in 0..n {
                map.insert(i, "value");
            }
            b.iter(|| {
                for i in 0..n {
                    black_box(map.contains_key(&i));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lexi_trees);
criterion_main!(benches);

fn underline(len: usize) {
    for _ in 0..len {
        print!("=");
    }
    println!();
}
