use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, criterion_group};
use persigraph_core::{Graph, Record, SerialGraph};
use std::hint::black_box;

use super::chain;

fn roundtrip(graph: &Graph<Record>) -> Graph<Record> {
    let json = serde_json::to_vec(&graph.to_serial()).unwrap();
    let serial: SerialGraph<Record> = serde_json::from_slice(&json).unwrap();
    Graph::from_serial(serial)
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_roundtrip/json");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for size in &[0, 1, 10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let graph = chain(size);
            b.iter(|| {
                black_box(roundtrip(&graph));
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets =
        bench_serialization
}
