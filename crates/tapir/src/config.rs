//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Which ranking algorithm assigns layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    /// Optimal ranks by network simplex, followed by balancing.
    #[default]
    NetworkSimplex,
    /// Initial ranks tightened into a feasible spanning tree, no optimization.
    TightTree,
    /// Initial (longest-path) ranks only.
    LongestPath,
}

/// Geometric constants and tuning knobs for one layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Minimum horizontal gap between neighbouring vertices of a rank (pixels).
    pub node_sep: f64,
    /// Vertical distance between ranks (pixels).
    pub rank_sep: f64,
    pub default_width: f64,
    pub default_height: f64,
    pub ranker: Ranker,
    /// How many negative cut values the simplex scans before picking the most negative one.
    pub search_size: usize,
    /// Stop the simplex after this many edge exchanges even if not yet optimal.
    pub max_simplex_iterations: Option<usize>,
    /// Upper bound on median/transpose sweeps during crossing minimization.
    pub max_order_iterations: usize,
    /// Move vertices with equal in/out weight to sparser ranks after ranking.
    pub balance: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_sep: 50.0,
            rank_sep: 50.0,
            default_width: 50.0,
            default_height: 30.0,
            ranker: Ranker::NetworkSimplex,
            search_size: 20,
            max_simplex_iterations: None,
            max_order_iterations: 18,
            balance: true,
        }
    }
}

impl LayoutConfig {
    /// Parses a JSON document; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !finite_non_negative(self.node_sep) {
            return Err(crate::Error::Config(format!(
                "node-sep must be finite and non-negative, got {}",
                self.node_sep
            )));
        }
        if !finite_non_negative(self.rank_sep) {
            return Err(crate::Error::Config(format!(
                "rank-sep must be finite and non-negative, got {}",
                self.rank_sep
            )));
        }
        if !finite_non_negative(self.default_width) || !finite_non_negative(self.default_height)
        {
            return Err(crate::Error::Config(
                "default node size must be finite and non-negative".to_string(),
            ));
        }
        if self.search_size == 0 {
            return Err(crate::Error::Config(
                "search-size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_overrides_only_the_given_keys() {
        let config = LayoutConfig::from_json_str(r#"{"node-sep": 12, "ranker": "longest-path"}"#)
            .unwrap();
        assert_eq!(config.node_sep, 12.0);
        assert_eq!(config.ranker, Ranker::LongestPath);
        assert_eq!(config.rank_sep, 50.0);
        assert_eq!(config.search_size, 20);
    }

    #[test]
    fn json_rejects_a_zero_search_window() {
        let err = LayoutConfig::from_json_str(r#"{"search-size": 0}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn json_rejects_unknown_rankers() {
        assert!(LayoutConfig::from_json_str(r#"{"ranker": "coffman-graham"}"#).is_err());
    }
}
