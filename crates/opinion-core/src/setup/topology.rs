//! Topology Generation
//!
//! Stochastic block model over equal-size communities.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::components::network::Network;
use crate::error::ConfigError;

/// Stochastic block model parameters.
///
/// Agents are split into `n_communities` blocks of `n_agents / n_communities`
/// nodes. Remainder nodes are dropped, so the generated network has
/// `n_communities * block_size` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyGenerator {
    pub n_agents: usize,
    pub n_communities: usize,
    /// Expected same-community degree of a node
    pub target_intra_degree: f64,
    /// `p_inter / p_intra`
    pub inter_intra_ratio: f64,
}

impl Default for TopologyGenerator {
    fn default() -> Self {
        Self {
            n_agents: 100,
            n_communities: 3,
            target_intra_degree: 10.0,
            inter_intra_ratio: 0.05,
        }
    }
}

impl TopologyGenerator {
    pub fn new(n_agents: usize, n_communities: usize) -> Self {
        Self {
            n_agents,
            n_communities,
            ..Self::default()
        }
    }

    /// Nodes per community, zero when the community count is zero.
    pub fn block_size(&self) -> usize {
        self.n_agents.checked_div(self.n_communities).unwrap_or(0)
    }

    /// Nodes in the generated network.
    pub fn node_count(&self) -> usize {
        self.n_communities * self.block_size()
    }

    /// Agents that do not fit into equal blocks.
    pub fn dropped_nodes(&self) -> usize {
        self.n_agents - self.node_count()
    }

    /// Same-community edge probability.
    pub fn p_intra(&self) -> f64 {
        self.target_intra_degree / (self.block_size() as f64 - 1.0)
    }

    /// Cross-community edge probability.
    pub fn p_inter(&self) -> f64 {
        self.inter_intra_ratio * self.p_intra()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.n_communities == 0 || self.n_communities > self.n_agents {
            return Err(ConfigError::InvalidCommunityCount {
                n_communities: self.n_communities,
                num_agents: self.n_agents,
            });
        }
        let block_size = self.block_size();
        if block_size <= 1 {
            return Err(ConfigError::DegenerateBlock { block_size });
        }
        if !self.target_intra_degree.is_finite() || self.target_intra_degree < 0.0 {
            return Err(ConfigError::invalid(
                "target_intra_degree",
                format!("must be non-negative, got {}", self.target_intra_degree),
            ));
        }
        if !self.inter_intra_ratio.is_finite() || self.inter_intra_ratio < 0.0 {
            return Err(ConfigError::invalid(
                "inter_intra_ratio",
                format!("must be non-negative, got {}", self.inter_intra_ratio),
            ));
        }
        for (name, value) in [("p_intra", self.p_intra()), ("p_inter", self.p_inter())] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Generates a network from a seed. The same seed yields the same edge set.
    pub fn generate(&self, seed: u64) -> Result<Network, ConfigError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.generate_with_rng(&mut rng)
    }

    /// Generates a network drawing from the given stream.
    ///
    /// Pairs are visited in lexicographic order `(0,1), (0,2), .., (n-2,n-1)`
    /// with one uniform draw each.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network, ConfigError> {
        self.validate()?;

        let dropped = self.dropped_nodes();
        if dropped > 0 {
            tracing::warn!(
                n_agents = self.n_agents,
                n_communities = self.n_communities,
                dropped,
                "agents do not divide evenly into communities, dropping remainder"
            );
        }

        let block_size = self.block_size();
        let nodes = self.node_count();
        let p_intra = self.p_intra();
        let p_inter = self.p_inter();

        let mut edges = Vec::new();
        for u in 0..nodes {
            for v in (u + 1)..nodes {
                let p = if u / block_size == v / block_size {
                    p_intra
                } else {
                    p_inter
                };
                if rng.gen::<f64>() < p {
                    edges.push((u, v));
                }
            }
        }

        let network = Network::from_edges(self.n_communities, block_size, edges);
        tracing::debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            p_intra,
            p_inter,
            "generated block model"
        );
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities() {
        let gen = TopologyGenerator::new(100, 3);

        assert_eq!(gen.block_size(), 33);
        assert_eq!(gen.node_count(), 99);
        assert_eq!(gen.dropped_nodes(), 1);
        assert!((gen.p_intra() - 10.0 / 32.0).abs() < 1e-12);
        assert!((gen.p_inter() - 0.05 * 10.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            TopologyGenerator::new(0, 1).validate(),
            Err(ConfigError::NoAgents)
        ));
        assert!(matches!(
            TopologyGenerator::new(10, 0).validate(),
            Err(ConfigError::InvalidCommunityCount { .. })
        ));
        assert!(matches!(
            TopologyGenerator::new(10, 11).validate(),
            Err(ConfigError::InvalidCommunityCount { .. })
        ));
        assert!(matches!(
            TopologyGenerator::new(10, 6).validate(),
            Err(ConfigError::DegenerateBlock { block_size: 1 })
        ));
        // 10 expected neighbors among 4 candidates
        assert!(matches!(
            TopologyGenerator::new(10, 2).validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "p_intra", .. })
        ));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let gen = TopologyGenerator::new(90, 3);
        let a: Vec<_> = gen.generate(42).unwrap().edges().collect();
        let b: Vec<_> = gen.generate(42).unwrap().edges().collect();
        let c: Vec<_> = gen.generate(43).unwrap().edges().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_single_community_is_complete_at_full_probability() {
        let gen = TopologyGenerator {
            n_agents: 12,
            n_communities: 1,
            target_intra_degree: 11.0,
            inter_intra_ratio: 0.05,
        };
        let net = gen.generate(7).unwrap();

        assert_eq!(net.edge_count(), 12 * 11 / 2);
        assert_eq!(net.summary().inter_edges, 0);
    }

    #[test]
    fn test_zero_ratio_keeps_communities_disconnected() {
        let gen = TopologyGenerator {
            inter_intra_ratio: 0.0,
            ..TopologyGenerator::new(60, 3)
        };
        let net = gen.generate(1).unwrap();

        assert!(net.edges().all(|(u, v)| net.same_community(u, v)));
    }

    #[test]
    fn test_remainder_nodes_are_dropped() {
        let net = TopologyGenerator::new(100, 3).generate(42).unwrap();

        assert_eq!(net.node_count(), 99);
        assert!(net.edges().all(|(u, v)| u < 99 && v < 99));
    }

    #[test]
    fn test_mean_intra_degree_near_target() {
        let gen = TopologyGenerator::new(600, 3);
        let summary = gen.generate(5).unwrap().summary();

        // 200 nodes per block, expected intra degree 10
        let intra_degree = 2.0 * summary.intra_edges as f64 / summary.nodes as f64;
        assert!((intra_degree - 10.0).abs() < 1.0, "intra degree {}", intra_degree);
    }
}
