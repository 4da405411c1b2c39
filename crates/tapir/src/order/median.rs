use super::RankTable;
use crate::model::{DrawGraph, NO_MEDIAN};
use tapir_graph::NodeId;

/// Which neighbours a sweep looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Top-down: order each rank by its predecessors in the rank above.
    Down,
    /// Bottom-up: order each rank by its successors in the rank below.
    Up,
}

impl Sweep {
    pub fn for_iteration(iteration: usize) -> Self {
        if iteration % 2 == 0 { Self::Down } else { Self::Up }
    }
}

/// Weighted median of neighbour positions. Sorts `positions` in place.
///
/// No neighbours gives [`NO_MEDIAN`]; two give their average. With an even count of four or
/// more the two middle values are averaged, weighted towards the side whose positions are more
/// tightly packed.
pub fn median_value(positions: &mut [usize]) -> f64 {
    positions.sort_unstable();
    let p = |i: usize| positions[i] as f64;
    match positions.len() {
        0 => NO_MEDIAN,
        1 => p(0),
        2 => (p(0) + p(1)) / 2.0,
        n if n % 2 == 1 => p(n / 2),
        n => {
            let rm = n / 2;
            let lm = rm - 1;
            let rspan = p(n - 1) - p(rm);
            let lspan = p(lm) - p(0);
            if lspan == rspan {
                (p(lm) + p(rm)) / 2.0
            } else {
                (p(lm) * rspan + p(rm) * lspan) / (lspan + rspan)
            }
        }
    }
}

/// Recomputes the medians of rank `r` and stably re-sorts it by them. Vertices without
/// neighbours on the fixed side keep their slot.
pub fn wmedian(g: &mut DrawGraph, table: &mut RankTable, r: usize, sweep: Sweep) {
    let rank: Vec<NodeId> = table.rank(r).to_vec();
    for &v in &rank {
        let mut positions: Vec<usize> = match sweep {
            Sweep::Down => g.predecessors(v).map(|u| g[u].order).collect(),
            Sweep::Up => g.successors(v).map(|w| g[w].order).collect(),
        };
        g[v].median = median_value(&mut positions);
    }

    let movable: Vec<bool> = rank.iter().map(|&v| g[v].median >= 0.0).collect();
    let mut sorted: Vec<NodeId> = rank
        .iter()
        .zip(&movable)
        .filter(|(_, m)| **m)
        .map(|(&v, _)| v)
        .collect();
    sorted.sort_by(|&a, &b| g[a].median.total_cmp(&g[b].median));

    let mut sorted = sorted.into_iter();
    let next: Vec<NodeId> = rank
        .iter()
        .zip(&movable)
        .map(|(&v, &m)| if m { sorted.next().unwrap_or(v) } else { v })
        .collect();
    table.set_rank(g, r, next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_odd_degree_is_the_middle_position() {
        assert_eq!(median_value(&mut [7, 1, 3]), 3.0);
        assert_eq!(median_value(&mut [4]), 4.0);
    }

    #[test]
    fn median_of_two_is_their_average() {
        assert_eq!(median_value(&mut [1, 4]), 2.5);
    }

    #[test]
    fn median_of_nothing_is_the_sentinel() {
        assert_eq!(median_value(&mut []), NO_MEDIAN);
    }

    #[test]
    fn even_median_leans_towards_the_denser_side() {
        // lspan = 1 - 0 = 1, rspan = 9 - 2 = 7: (1 * 7 + 2 * 1) / 8.
        assert_eq!(median_value(&mut [0, 1, 2, 9]), 9.0 / 8.0);
        // Equal spans: plain average of the middle pair.
        assert_eq!(median_value(&mut [0, 2, 4, 6]), 3.0);
    }
}
