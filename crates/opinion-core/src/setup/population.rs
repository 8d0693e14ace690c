//! Population Spawning
//!
//! Draws per-agent attributes and seeds patient zero.

use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::{Beta, Distribution, Triangular};

use opinion_events::Opinion;

use crate::components::agent::Agent;
use crate::components::network::Network;
use crate::config::{NewsConfig, PopulationConfig};
use crate::error::ConfigError;
use crate::policy::OpinionPolicy;

/// Samplers for the three drawn attributes.
#[derive(Debug, Clone)]
pub struct AttributeSamplers {
    knowledge: Triangular<f64>,
    reputation: Beta<f64>,
    threshold: Uniform<f64>,
}

impl AttributeSamplers {
    pub fn new(config: &PopulationConfig) -> Result<Self, ConfigError> {
        let knowledge = Triangular::new(0.0, 1.0, config.knowledge_mode)
            .map_err(|e| ConfigError::invalid("knowledge_mode", e.to_string()))?;
        let reputation = Beta::new(config.reputation_alpha, config.reputation_beta)
            .map_err(|e| ConfigError::invalid("reputation beta parameters", e.to_string()))?;
        if !(0.0..=1.0).contains(&config.threshold_low)
            || !(0.0..=1.0).contains(&config.threshold_high)
            || config.threshold_low > config.threshold_high
        {
            return Err(ConfigError::invalid(
                "threshold range",
                format!(
                    "[{}, {}] is not a sub-range of [0, 1]",
                    config.threshold_low, config.threshold_high
                ),
            ));
        }
        let threshold = Uniform::new_inclusive(config.threshold_low, config.threshold_high);

        Ok(Self {
            knowledge,
            reputation,
            threshold,
        })
    }

    /// Draws knowledge, reputation and threshold, in that order.
    pub fn spawn<R: Rng + ?Sized>(&self, id: usize, rng: &mut R) -> Agent {
        let knowledge = self.knowledge.sample(rng);
        let reputation = self.reputation.sample(rng);
        let threshold = self.threshold.sample(rng);
        Agent::new(id, knowledge, reputation, threshold)
    }
}

/// One undecided agent per network node, in node order.
pub fn spawn_population<R: Rng + ?Sized>(
    network: &Network,
    config: &PopulationConfig,
    rng: &mut R,
) -> Result<Vec<Agent>, ConfigError> {
    let samplers = AttributeSamplers::new(config)?;
    Ok((0..network.node_count())
        .map(|id| samplers.spawn(id, rng))
        .collect())
}

/// Forces an agent to believe and spread the false claim from step one.
pub fn seed_patient_zero(agent: &mut Agent, policy: &dyn OpinionPolicy, news: &NewsConfig) {
    agent.opinion = Opinion::Positive;
    agent.involvement_threshold = 0.0;
    agent.knowledge = 0.0;
    agent.has_heard = true;
    policy.seed_patient_zero(agent, news);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{NumericAccumulation, OracleCredibility, ReferenceOracle};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ring(n: usize) -> Network {
        Network::from_edges(1, n, (0..n).map(|i| (i, (i + 1) % n)))
    }

    #[test]
    fn test_spawn_population_bounds() {
        let mut rng = SmallRng::seed_from_u64(42);
        let agents = spawn_population(&ring(200), &PopulationConfig::default(), &mut rng).unwrap();

        assert_eq!(agents.len(), 200);
        for (i, agent) in agents.iter().enumerate() {
            assert_eq!(agent.id, i);
            assert!((0.0..=1.0).contains(&agent.knowledge));
            assert!((0.0..=1.0).contains(&agent.reputation));
            assert!((0.0..=1.0).contains(&agent.involvement_threshold));
            assert_eq!(agent.opinion, Opinion::Neutral);
            assert_eq!(agent.involvement, 1.0);
            assert!(!agent.has_heard);
        }
    }

    #[test]
    fn test_knowledge_skews_low() {
        let mut rng = SmallRng::seed_from_u64(1);
        let agents = spawn_population(&ring(2000), &PopulationConfig::default(), &mut rng).unwrap();

        // Triangular(0, 0.05, 1) has mean 0.35, Beta(4, 10) has mean ~0.286
        let mean_knowledge = agents.iter().map(|a| a.knowledge).sum::<f64>() / 2000.0;
        let mean_reputation = agents.iter().map(|a| a.reputation).sum::<f64>() / 2000.0;
        assert!((mean_knowledge - 0.35).abs() < 0.03, "mean knowledge {}", mean_knowledge);
        assert!((mean_reputation - 4.0 / 14.0).abs() < 0.02, "mean reputation {}", mean_reputation);
    }

    #[test]
    fn test_threshold_range_respected() {
        let config = PopulationConfig {
            threshold_low: 0.4,
            threshold_high: 0.6,
            ..PopulationConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let agents = spawn_population(&ring(100), &config, &mut rng).unwrap();

        assert!(agents
            .iter()
            .all(|a| (0.4..=0.6).contains(&a.involvement_threshold)));
    }

    #[test]
    fn test_invalid_beta_rejected() {
        let config = PopulationConfig {
            reputation_beta: -1.0,
            ..PopulationConfig::default()
        };
        assert!(AttributeSamplers::new(&config).is_err());
    }

    #[test]
    fn test_seed_patient_zero_numeric() {
        let mut agent = Agent::new(30, 0.7, 0.2, 0.9);
        seed_patient_zero(&mut agent, &NumericAccumulation::default(), &NewsConfig::default());

        assert_eq!(agent.opinion, Opinion::Positive);
        assert_eq!(agent.knowledge, 0.0);
        assert_eq!(agent.involvement_threshold, 0.0);
        assert!(agent.has_heard);
        assert_eq!(agent.opinion_raw, 1.0);
        assert!(agent.should_spread());
    }

    #[test]
    fn test_seed_patient_zero_oracle() {
        let news = NewsConfig::default();
        let policy = OracleCredibility::new(Box::new(ReferenceOracle::new(0)), &news);
        let mut agent = Agent::new(30, 0.7, 0.2, 0.9);
        seed_patient_zero(&mut agent, &policy, &news);

        assert_eq!(agent.pending_message.as_deref(), Some(news.claim.as_str()));
        assert_eq!(agent.opinion_raw, 0.0);
    }
}
