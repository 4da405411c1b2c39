use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tapir::LayoutConfig;
use tapir::model::{DrawGraph, EdgeInfo, NodeInfo};
use tapir::rank;
use tapir_graph::{Graph, NodeId};

#[derive(Debug, Clone)]
struct GraphSpec {
    node_count: usize,
    edges: Vec<(usize, usize, i32, f64)>,
}

impl GraphSpec {
    fn build(&self) -> DrawGraph {
        let mut g = DrawGraph::with_capacity(self.node_count, self.edges.len());
        let ids: Vec<NodeId> = (0..self.node_count)
            .map(|_| g.add_node(NodeInfo::default()))
            .collect();
        for &(from, to, minlen, weight) in &self.edges {
            g.add_edge(ids[from], ids[to], EdgeInfo::new(minlen, weight));
        }
        g
    }

    fn build_caller(&self) -> Graph<(), ()> {
        let mut g: Graph<(), ()> = Graph::with_capacity(self.node_count, self.edges.len());
        let ids: Vec<NodeId> = (0..self.node_count).map(|_| g.add_node(())).collect();
        for &(from, to, _, _) in &self.edges {
            g.add_edge(ids[from], ids[to], ());
        }
        g
    }
}

fn build_dag_spec(node_count: usize, fanout: usize) -> GraphSpec {
    let mut edges: Vec<(usize, usize, i32, f64)> = Vec::new();

    // A spine to guarantee connectivity.
    for i in 0..node_count.saturating_sub(1) {
        edges.push((i, i + 1, 1, 2.0));
    }

    // Extra forward edges to create crossing pressure.
    for i in 0..node_count {
        for k in 2..=(fanout + 1) {
            let to = i + k;
            if to >= node_count {
                break;
            }
            edges.push((i, to, 1, 1.0));
        }

        // A longer edge that increases slack variation.
        let to = i + 10;
        if to < node_count {
            edges.push((i, to, 2, 0.5));
        }
    }

    GraphSpec { node_count, edges }
}

fn bench_network_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_simplex");
    group.measurement_time(Duration::from_secs(10));
    let config = LayoutConfig::default();

    let cases = [
        ("dag_50_f3", 50usize, 3usize),
        ("dag_200_f4", 200usize, 4usize),
        ("dag_400_f4", 400usize, 4usize),
    ];

    for (name, nodes, fanout) in cases {
        let spec = build_dag_spec(nodes, fanout);
        group.bench_with_input(
            BenchmarkId::new("rank::assign_ranks", name),
            &spec,
            |b, spec| {
                b.iter_batched(
                    || spec.build(),
                    |mut g| {
                        let stats = rank::assign_ranks(black_box(&mut g), &config);
                        black_box(stats.map(|s| s.iterations).unwrap_or(0));
                    },
                    BatchSize::LargeInput,
                )
            },
        );
        group.bench_with_input(BenchmarkId::new("layout", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build_caller(),
                |g| {
                    let out = tapir::layout(black_box(&g), config.clone());
                    black_box(out.map(|l| l.crossings()).unwrap_or(0));
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_network_simplex);
criterion_main!(benches);
