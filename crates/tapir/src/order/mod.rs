//! Vertex ordering / crossing minimization.
//!
//! A breadth-first initial order is improved by alternating weighted-median sweeps, each
//! followed by adjacent transpositions. The best ordering seen is kept; the loop stops early
//! once further sweeps are unlikely to pay off.

mod rank_table;
pub use rank_table::RankTable;

mod init_order;
pub use init_order::init_order;

mod cross_count;
pub use cross_count::{cross_count, two_layer_cross_count};

mod median;
pub use median::{Sweep, median_value, wmedian};

mod transpose;
pub use transpose::transpose;

use crate::Result;
use crate::config::LayoutConfig;
use crate::model::DrawGraph;
use tracing::{debug, debug_span, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderStats {
    /// Crossings of the breadth-first initial order.
    pub initial_crossings: u64,
    /// Crossings of the returned order.
    pub crossings: u64,
    /// Median/transpose iterations run.
    pub iterations: usize,
}

/// Runs one improvement iteration: a median sweep in the iteration's direction, then
/// transposition. Ties may swap on the first two of every four iterations, so symmetric
/// configurations can still move.
pub fn order_step(g: &mut DrawGraph, table: &mut RankTable, iteration: usize) {
    let sweep = Sweep::for_iteration(iteration);
    let len = table.len();
    match sweep {
        Sweep::Down => {
            for r in 1..len {
                wmedian(g, table, r, sweep);
            }
        }
        Sweep::Up => {
            for r in (0..len.saturating_sub(1)).rev() {
                wmedian(g, table, r, sweep);
            }
        }
    }
    transpose(g, table, allows_ties(iteration));
}

/// Orders every rank of `g`, storing positions in `NodeInfo::order`.
///
/// Expects ranked vertices whose edges all connect adjacent ranks.
pub fn order(g: &mut DrawGraph, config: &LayoutConfig) -> Result<(RankTable, OrderStats)> {
    let _span = debug_span!("order").entered();
    let rank_count = g
        .nodes()
        .map(|(_, n)| n.rank.max(0) as usize + 1)
        .max()
        .unwrap_or(0);
    let mut table = init_order(g, rank_count)?;

    let initial = cross_count(g, &table);
    let mut stats = OrderStats {
        initial_crossings: initial,
        crossings: initial,
        iterations: 0,
    };
    let mut best = initial;
    let mut best_order = table.snapshot();
    let (mut best4, mut best8) = (best, best);

    for iteration in 0..config.max_order_iterations {
        if best == 0 {
            break;
        }
        order_step(g, &mut table, iteration);
        stats.iterations = iteration + 1;

        let current = cross_count(g, &table);
        trace!(iteration, crossings = current, best, "ordering iteration");
        if current <= best {
            best = current;
            best_order = table.snapshot();
        }
        if best == 0 {
            break;
        }

        match iteration + 1 {
            4 => best4 = best,
            8 => {
                best8 = best;
                if best8 <= 20 || ratio(best8, best4) <= 0.88 {
                    break;
                }
            }
            12 => {
                let best12 = best;
                if best12 < 200 && (ratio(best12, best8) < 0.99 || ratio(best8, best4) > 0.9) {
                    break;
                }
            }
            _ => {}
        }
    }

    table.restore(g, best_order);
    stats.crossings = best;
    debug!(
        ranks = table.len(),
        initial_crossings = stats.initial_crossings,
        crossings = stats.crossings,
        iterations = stats.iterations,
        "ranks ordered"
    );
    Ok((table, stats))
}

/// Whether transposition of `iteration` may swap pairs whose crossings would not change.
pub fn allows_ties(iteration: usize) -> bool {
    iteration % 4 < 2
}

fn ratio(a: u64, b: u64) -> f64 {
    if b == 0 { 1.0 } else { a as f64 / b as f64 }
}
