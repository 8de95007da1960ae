use criterion::{AxisScale, BatchSize, BenchmarkId, Criterion, PlotConfiguration, criterion_group};
use persigraph_core::{Graph, Record};
use std::hint::black_box;

use super::chain;

const SIZES: [i64; 4] = [1, 10, 100, 1000];

fn insert_unbatched(size: i64) -> Graph<Record> {
    let graph = (0..size).fold(Graph::new(), |g, i| g.set_node(Record::new("Task", i)));
    (1..size).fold(graph, |g, i| g.set_edge(("Task", i - 1), ("Task", i), None))
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion/unbatched");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(insert_unbatched(size)))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("insertion/batched");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(chain(size)))
        });
    }
    group.finish();
}

fn bench_removal(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_node");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || chain(size),
                |g| black_box(g.remove_node(("Task", size / 2))),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets =
        bench_insertion, bench_removal
}
