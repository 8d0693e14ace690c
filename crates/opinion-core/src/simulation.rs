//! Simulation Orchestrator
//!
//! Owns the network, the population and the policy, and advances the run one
//! three-phase step at a time:
//!
//! 1. Spread: every agent, in a fresh random order, may pass a payload to one
//!    random neighbor. Deliveries land immediately.
//! 2. Metrics: the opinion tally is recorded.
//! 3. Update: every agent, in a second independent order, decays its
//!    involvement and re-decides its opinion.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use opinion_events::{DistributionSnapshot, Opinion, StepRecord};

use crate::components::agent::Agent;
use crate::components::network::Network;
use crate::config::{DynamicsConfig, NewsConfig, PolicyKind, SimConfig};
use crate::error::ConfigError;
use crate::output::stats::{FailureCounters, MetricsCollector};
use crate::policy::{CredibilityOracle, NumericAccumulation, OpinionPolicy, OracleCredibility};
use crate::rng::{StepRngs, Stream};
use crate::setup::{seed_patient_zero, spawn_population};

/// Builds the policy named by `dynamics.policy`.
///
/// The oracle policy needs an oracle; the numeric policy ignores one if given.
pub fn build_policy(
    dynamics: &DynamicsConfig,
    news: &NewsConfig,
    oracle: Option<Box<dyn CredibilityOracle>>,
) -> Result<Box<dyn OpinionPolicy>, ConfigError> {
    match dynamics.policy {
        PolicyKind::Numeric => Ok(Box::new(NumericAccumulation::from_config(dynamics))),
        PolicyKind::Oracle => {
            let oracle = oracle.ok_or(ConfigError::OracleRequired)?;
            Ok(Box::new(
                OracleCredibility::new(oracle, news)
                    .with_fact_check_knowledge(dynamics.fact_check_knowledge),
            ))
        }
    }
}

/// A single run of the diffusion model.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    network: Network,
    agents: Vec<Agent>,
    policy: Box<dyn OpinionPolicy>,
    rngs: StepRngs,
    current_step: u64,
    metrics: MetricsCollector,
}

impl Simulation {
    /// Builds a run with the policy from the config. Fails with
    /// [`ConfigError::OracleRequired`] if that policy is the oracle one.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let policy = build_policy(&config.dynamics, &config.news, None)?;
        Self::with_policy(config, policy)
    }

    /// Builds a run whose oracle policy, if selected, consults `oracle`.
    pub fn with_oracle(
        config: SimConfig,
        oracle: Box<dyn CredibilityOracle>,
    ) -> Result<Self, ConfigError> {
        let policy = build_policy(&config.dynamics, &config.news, Some(oracle))?;
        Self::with_policy(config, policy)
    }

    /// Generates the network from the config and runs with `policy`.
    pub fn with_policy(
        config: SimConfig,
        policy: Box<dyn OpinionPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let network = config
            .topology()
            .generate(config.seeds.stream_seed(Stream::Topology))?;
        Self::from_network(config, network, policy)
    }

    /// Runs on a prebuilt network. The `[network]` section is not consulted.
    pub fn from_network(
        mut config: SimConfig,
        network: Network,
        policy: Box<dyn OpinionPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate_agents(network.node_count())?;
        config.dynamics.policy = policy.kind();

        let mut population_rng: SmallRng = config.seeds.rng(Stream::Population);
        let mut agents = spawn_population(&network, &config.population, &mut population_rng)?;

        let patient_zero = config.simulation.patient_zero;
        if let Some(agent) = agents.get_mut(patient_zero) {
            seed_patient_zero(agent, policy.as_ref(), &config.news);
        }

        let summary = network.summary();
        info!(
            nodes = summary.nodes,
            edges = summary.edges,
            mean_degree = summary.mean_degree,
            communities = summary.communities,
            policy = %policy.kind(),
            patient_zero,
            "Simulation initialized"
        );

        Ok(Self {
            rngs: StepRngs::from_seeds(&config.seeds),
            config,
            network,
            agents,
            policy,
            current_step: 0,
            metrics: MetricsCollector::new(),
        })
    }

    /// Advances one step and returns the tally recorded between the spread
    /// and update phases.
    pub fn step(&mut self) -> StepRecord {
        self.current_step += 1;
        let step = self.current_step;

        let order = self.permutation();
        for id in order {
            let spread = self.agents[id].spread_step(
                &self.network,
                self.policy.as_mut(),
                &mut self.rngs.neighbor,
            );
            match spread {
                Ok(Some(delivery)) => {
                    self.agents[delivery.to]
                        .receive_payload(delivery.payload, self.policy.as_ref());
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(step, agent = id, error = %e, "Spread failed, delivery dropped");
                    self.metrics.record_compose_failure();
                }
            }
        }

        let record = self.metrics.record_step(step, &self.agents);

        let decay_rate = self.config.dynamics.decay_rate;
        let order = self.permutation();
        for id in order {
            if let Err(e) = self.agents[id].update_step(decay_rate, self.policy.as_mut()) {
                warn!(step, agent = id, error = %e, "Update failed, opinion unchanged");
                self.metrics.record_decide_failure();
            }
        }

        debug!(
            step,
            positive = record.positive,
            negative = record.negative,
            neutral = record.neutral,
            "Step complete"
        );
        record
    }

    /// Runs `steps` more steps and returns the whole history.
    pub fn run(&mut self, steps: u64) -> &[StepRecord] {
        for _ in 0..steps {
            self.step();
        }
        self.metrics.history()
    }

    fn permutation(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.shuffle(&mut self.rngs.schedule);
        order
    }

    /// Number of agents currently holding `opinion`.
    pub fn count_opinions(&self, opinion: Opinion) -> usize {
        self.agents.iter().filter(|a| a.opinion == opinion).count()
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: usize) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn history(&self) -> &[StepRecord] {
        self.metrics.history()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn failures(&self) -> FailureCounters {
        self.metrics.failures()
    }

    /// Per-agent attributes and histograms at the current step.
    pub fn distribution_snapshot(&self) -> DistributionSnapshot {
        MetricsCollector::distribution(self.current_step, &self.agents, &self.network)
    }
}
