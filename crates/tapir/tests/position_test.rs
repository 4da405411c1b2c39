use tapir::LayoutConfig;
use tapir::model::{DrawGraph, EdgeInfo, NodeInfo};
use tapir::normalize::expand;
use tapir::order::{RankTable, order};
use tapir::position::{aux_feasible_tree, assign_y, build_aux_graph, omega, position, separation};
use tapir::rank::assign_ranks;
use tapir::rank::network_simplex::NetworkSimplex;
use tapir::rank::util::slack;
use tapir_graph::NodeId;

struct Lcg(u64);

impl Lcg {
    fn below(&mut self, n: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % n
    }
}

/// Random DAG with assorted vertex widths, ranked, expanded and ordered.
fn prepared(seed: u64, nodes: usize, edges: usize) -> (DrawGraph, RankTable) {
    let mut rng = Lcg(seed);
    let mut g = DrawGraph::new();
    let ids: Vec<NodeId> = (0..nodes)
        .map(|_| g.add_node(NodeInfo::sized(10.0 + rng.below(60) as f64, 20.0)))
        .collect();
    for _ in 0..edges {
        let a = rng.below(nodes as u64) as usize;
        let b = rng.below(nodes as u64) as usize;
        if a != b {
            let weight = 1.0 + rng.below(2) as f64;
            g.add_edge(ids[a.min(b)], ids[a.max(b)], EdgeInfo::new(1, weight));
        }
    }
    let config = LayoutConfig::default();
    assign_ranks(&mut g, &config).unwrap();
    expand(&mut g).unwrap();
    let (table, _) = order(&mut g, &config).unwrap();
    (g, table)
}

fn path(n: usize) -> (DrawGraph, RankTable) {
    let mut g = DrawGraph::new();
    let ids: Vec<NodeId> = (0..n)
        .map(|i| {
            g.add_node(NodeInfo {
                rank: i as i32,
                ..NodeInfo::sized(30.0 + 10.0 * i as f64, 20.0)
            })
        })
        .collect();
    g.set_path(&ids, EdgeInfo::default);
    let table = RankTable::from_graph(&g);
    (g, table)
}

#[test]
fn omega_favours_straight_chains() {
    assert_eq!(omega(false, false), 1.0);
    assert_eq!(omega(true, false), 2.0);
    assert_eq!(omega(false, true), 2.0);
    assert_eq!(omega(true, true), 8.0);
}

#[test]
fn separation_is_half_widths_plus_gap_rounded_up() {
    assert_eq!(separation(40.0, 60.0, 50.0), 100);
    assert_eq!(separation(0.0, 0.0, 0.5), 1);
    assert_eq!(separation(0.0, 0.0, 0.0), 0);
    assert_eq!(separation(15.0, 0.0, 10.0), 18);
}

#[test]
fn aux_graph_has_an_edge_vertex_per_edge_and_a_separation_edge_per_neighbour_pair() {
    let (g, table) = prepared(4, 20, 35);
    let aux = build_aux_graph(&g, &table, 50.0).unwrap();
    let neighbour_pairs: usize = table
        .ranks()
        .iter()
        .map(|r| r.len().saturating_sub(1))
        .sum();
    assert_eq!(aux.graph.node_count(), g.node_count() + g.edge_count());
    assert_eq!(aux.edge_nodes.len(), g.edge_count());
    assert_eq!(
        aux.graph.edge_count(),
        2 * g.edge_count() + neighbour_pairs
    );

    for en in &aux.edge_nodes {
        assert!(aux.graph[en.node].aux);
        let (u, v) = g.endpoints(en.edge).unwrap();
        assert_eq!(aux.graph.endpoints(en.to_source), Some((en.node, u)));
        assert_eq!(aux.graph.endpoints(en.to_target), Some((en.node, v)));
        let expected = g[en.edge].weight * omega(g[u].virt, g[v].virt);
        assert_eq!(aux.graph[en.to_source].weight, expected);
        assert_eq!(aux.graph[en.to_source].minlen, 0);
    }
    for rank in table.ranks() {
        for pair in rank.windows(2) {
            let e = aux.graph.find_edge(pair[0], pair[1]).expect("separation edge");
            assert_eq!(aux.graph[e].weight, 0.0);
            assert_eq!(
                aux.graph[e].minlen,
                separation(g[pair[0]].width, g[pair[1]].width, 50.0)
            );
        }
    }
}

#[test]
fn aux_tree_is_a_tight_spanning_forest() {
    for seed in 1..=12 {
        let (g, table) = prepared(seed, 25, 40);
        let mut aux = build_aux_graph(&g, &table, 25.0).unwrap();
        let roots = aux_feasible_tree(&mut aux, &g, &table);

        let tree = aux.graph.edge_ids().filter(|&e| aux.graph[e].tree).count();
        assert_eq!(tree + roots.len(), aux.graph.node_count(), "seed {seed}");
        for e in aux.graph.edge_ids() {
            assert!(slack(&aux.graph, e) >= 0, "seed {seed}: {e} is infeasible");
            if aux.graph[e].tree {
                assert_eq!(slack(&aux.graph, e), 0, "seed {seed}: {e} is loose");
            }
        }
        // Numbering fails unless the forest reaches every vertex from the roots.
        assert!(NetworkSimplex::new(&mut aux.graph, &roots, 20).is_ok());
    }
}

#[test]
fn a_path_is_drawn_straight() {
    let (mut g, table) = path(5);
    position(&mut g, &table, &LayoutConfig::default()).unwrap();
    for (_, n) in g.nodes() {
        assert_eq!(n.x, 0.0);
    }
}

#[test]
fn y_is_one_rank_separation_per_rank_below_the_top_margin() {
    let (mut g, _) = path(4);
    let config = LayoutConfig {
        rank_sep: 30.0,
        ..Default::default()
    };
    assign_y(&mut g, &config);
    let ys: Vec<f64> = g.nodes().map(|(_, n)| n.y).collect();
    assert_eq!(ys, vec![30.0, 60.0, 90.0, 120.0]);
}

#[test]
fn positions_respect_separation_and_start_at_zero() {
    for seed in 20..=30 {
        let (mut g, table) = prepared(seed, 25, 40);
        let config = LayoutConfig {
            node_sep: 20.0,
            ..Default::default()
        };
        position(&mut g, &table, &config).unwrap();

        let min = g.nodes().map(|(_, n)| n.x).fold(f64::INFINITY, f64::min);
        assert_eq!(min, 0.0, "seed {seed}");
        for rank in table.ranks() {
            for pair in rank.windows(2) {
                let (l, r) = (&g[pair[0]], &g[pair[1]]);
                let gap = f64::from(separation(l.width, r.width, config.node_sep));
                assert!(r.x - l.x >= gap, "seed {seed}: {} and {} overlap", pair[0], pair[1]);
            }
        }
        for (_, n) in g.nodes() {
            assert_eq!(n.x.fract(), 0.0);
            assert_eq!(n.y, f64::from(n.rank + 1) * config.rank_sep);
        }
    }
}

#[test]
fn long_edge_chains_run_vertically() {
    // a -> b -> c -> d with a -> d: the chain of a -> d must not bend between its two
    // virtual vertices.
    let mut g = DrawGraph::new();
    let ids: Vec<NodeId> = (0..4).map(|_| g.add_node(NodeInfo::sized(50.0, 30.0))).collect();
    g.set_path(&ids, EdgeInfo::default);
    g.add_edge(ids[0], ids[3], EdgeInfo::default());

    let config = LayoutConfig::default();
    assign_ranks(&mut g, &config).unwrap();
    let chains = expand(&mut g).unwrap();
    let (table, _) = order(&mut g, &config).unwrap();
    position(&mut g, &table, &config).unwrap();

    let virtuals = &chains[0].nodes;
    assert_eq!(virtuals.len(), 2);
    assert_eq!(g[virtuals[0]].x, g[virtuals[1]].x);
    let (b, c) = (ids[1], ids[2]);
    assert_eq!(g[b].x, g[c].x);
    assert!((g[virtuals[0]].x - g[b].x).abs() >= 75.0);
}
