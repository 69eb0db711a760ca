//! Configuration for triangulation runs.

use std::collections::HashMap;

use crate::error::TriangulationError;
use crate::graph::{NodeId, UndiGraph};

/// Default minimum edge density among neighbours for a quasi-simplicial node.
pub const DEFAULT_QUASI_RATIO: f64 = 0.99;
/// Default relative slack allowed above the current tree width.
pub const DEFAULT_WEIGHT_THRESHOLD: f64 = 0.0;

/// Per-node cardinality of the variable a node stands for.
pub type DomainSizes = HashMap<NodeId, usize>;

/// Options recognised by [`StaticTriangulation`](crate::triangulation::StaticTriangulation)
/// and the default elimination strategy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TriangulationConfig {
    /// Minimum `(edges among neighbours) / (possible edges)` for a node to be
    /// classified quasi-simplicial. Must lie in `[0, 1]`.
    pub quasi_ratio: f64,
    /// Relative slack: almost/quasi-simplicial candidates are accepted while
    /// their clique weight stays below `tree_width * (1 + threshold)`.
    pub threshold: f64,
    /// Run recursive thinning after elimination to drop redundant fill-ins.
    pub minimality: bool,
    /// Materialise the fill-in edge set during elimination.
    pub ask_fill_ins: bool,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            quasi_ratio: DEFAULT_QUASI_RATIO,
            threshold: DEFAULT_WEIGHT_THRESHOLD,
            minimality: false,
            ask_fill_ins: false,
        }
    }
}

impl TriangulationConfig {
    pub fn with_quasi_ratio(mut self, ratio: f64) -> Self {
        self.quasi_ratio = ratio;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_minimality(mut self, minimality: bool) -> Self {
        self.minimality = minimality;
        self
    }

    pub fn with_fill_ins(mut self, ask: bool) -> Self {
        self.ask_fill_ins = ask;
        self
    }

    /// Reject ratios outside `[0, 1]` and negative or non-finite thresholds.
    pub fn validate(&self) -> Result<(), TriangulationError> {
        if !(0.0..=1.0).contains(&self.quasi_ratio) {
            return Err(TriangulationError::InvalidConfig(format!(
                "quasi_ratio must lie in [0, 1], got {}",
                self.quasi_ratio
            )));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(TriangulationError::InvalidConfig(format!(
                "threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Natural-log domain sizes for every node of `graph`.
///
/// # Errors
/// - [`TriangulationError::MissingDomainSize`] for an unmapped node.
/// - [`TriangulationError::InvalidDomainSize`] for a zero cardinality.
pub fn log_domain_sizes(
    graph: &UndiGraph,
    domain_sizes: &DomainSizes,
) -> Result<HashMap<NodeId, f64>, TriangulationError> {
    graph
        .nodes()
        .map(|v| match domain_sizes.get(&v) {
            None => Err(TriangulationError::MissingDomainSize(v)),
            Some(0) => Err(TriangulationError::InvalidDomainSize(v)),
            Some(&d) => Ok((v, (d as f64).ln())),
        })
        .collect()
}

/// Domain map assigning the same cardinality to every node of `graph`.
pub fn uniform_domain_sizes(graph: &UndiGraph, size: usize) -> DomainSizes {
    graph.nodes().map(|v| (v, size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = TriangulationConfig::default();
        assert_eq!(cfg.quasi_ratio, DEFAULT_QUASI_RATIO);
        assert!(!cfg.minimality);
        cfg.validate().unwrap();
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bad_ratio = TriangulationConfig::default().with_quasi_ratio(1.5);
        assert!(matches!(
            bad_ratio.validate(),
            Err(TriangulationError::InvalidConfig(_))
        ));
        let bad_threshold = TriangulationConfig::default().with_threshold(f64::NAN);
        assert!(bad_threshold.validate().is_err());
        let negative = TriangulationConfig::default().with_threshold(-0.1);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn log_domain_sizes_report_bad_entries() {
        let g = UndiGraph::from_edges(&[(0, 1)]).unwrap();
        let mut dom = DomainSizes::new();
        dom.insert(0, 4);
        assert_eq!(
            log_domain_sizes(&g, &dom),
            Err(TriangulationError::MissingDomainSize(1))
        );
        dom.insert(1, 0);
        assert_eq!(
            log_domain_sizes(&g, &dom),
            Err(TriangulationError::InvalidDomainSize(1))
        );
        dom.insert(1, 1);
        let logs = log_domain_sizes(&g, &dom).unwrap();
        assert!((logs[&0] - 4f64.ln()).abs() < 1e-12);
        assert_eq!(logs[&1], 0.0);
    }

    #[test]
    fn config_deserialises_with_defaults() {
        let cfg: TriangulationConfig = serde_json::from_str(r#"{"minimality": true}"#).unwrap();
        assert!(cfg.minimality);
        assert_eq!(cfg.quasi_ratio, DEFAULT_QUASI_RATIO);
        assert_eq!(cfg.threshold, DEFAULT_WEIGHT_THRESHOLD);
    }
}
