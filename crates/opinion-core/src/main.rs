//! Opinion Diffusion Simulator
//!
//! Runs the model from a TOML config plus command-line overrides and writes a
//! step log and a run report to the output directory.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use opinion_core::config::{default_config_toml, PolicyKind, SimConfig, DEFAULT_CONFIG_PATH};
use opinion_core::output::report::{REPORT_FILE, STEPS_FILE};
use opinion_core::output::{RunReport, StepLogger};
use opinion_core::policy::ReferenceOracle;
use opinion_core::{Opinion, SimError, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "opinion_sim")]
#[command(about = "Agent-based simulation of a false claim spreading through communities")]
struct Args {
    /// TOML config file (defaults to ./opinion_sim.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of steps to simulate
    #[arg(long)]
    steps: Option<u64>,

    /// Requested population size
    #[arg(long)]
    agents: Option<usize>,

    /// Number of communities
    #[arg(long)]
    communities: Option<usize>,

    /// Opinion update policy
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Node seeded with the false claim
    #[arg(long)]
    patient_zero: Option<usize>,

    /// Directory for the step log and reports
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Print the default config file and exit
    #[arg(long)]
    print_config: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn load_config(&self) -> Result<SimConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                SimConfig::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => SimConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seeds.master = seed;
        }
        if let Some(steps) = self.steps {
            config.simulation.steps = steps;
        }
        if let Some(agents) = self.agents {
            config.network.num_agents = agents;
        }
        if let Some(communities) = self.communities {
            config.network.n_communities = communities;
        }
        if let Some(policy) = self.policy {
            config.dynamics.policy = policy;
        }
        if let Some(index) = self.patient_zero {
            config.simulation.patient_zero = index;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = args.load_config()?;
    let steps = config.simulation.steps;

    println!("Opinion Diffusion Simulator");
    println!("===========================");
    println!("Seed: {}", config.seeds.master);
    println!("Steps: {}", steps);
    println!(
        "Agents: {} in {} communities",
        config.network.num_agents, config.network.n_communities
    );
    println!("Policy: {}", config.dynamics.policy);
    println!();

    let oracle = Box::new(ReferenceOracle::new(config.seeds.master));
    let mut sim = Simulation::with_oracle(config, oracle)?;

    let summary = sim.network().summary();
    println!(
        "Network: {} nodes, {} edges, mean degree {:.2}",
        summary.nodes, summary.edges, summary.mean_degree
    );
    println!();

    std::fs::create_dir_all(&args.output)?;
    let mut logger = StepLogger::new(args.output.join(STEPS_FILE))?;

    println!("{:>6} {:>9} {:>9} {:>9}", "step", "positive", "negative", "neutral");
    for _ in 0..steps {
        let record = sim.step();
        logger.log(&record)?;
        println!(
            "{:>6} {:>9} {:>9} {:>9}",
            record.step, record.positive, record.negative, record.neutral
        );
    }
    logger.flush()?;

    println!();
    for opinion in [Opinion::Positive, Opinion::Negative] {
        if let Some((step, count)) = sim.metrics().peak(opinion) {
            println!("Peak {}: {} agents at step {}", opinion, count, step);
        }
    }

    let failures = sim.failures();
    if failures.total() > 0 {
        println!();
        println!(
            "Oracle failures: {} compose, {} decide",
            failures.compose, failures.decide
        );
    }

    let report = RunReport::from_simulation(&sim);
    report.write_to(&args.output)?;
    info!(run_id = %report.run_id, dir = %args.output.display(), "Run complete");

    println!();
    println!("Simulation complete!");
    println!(
        "Step log: {} ({} records)",
        args.output.join(STEPS_FILE).display(),
        logger.record_count()
    );
    println!("Report:   {}", args.output.join(REPORT_FILE).display());

    Ok(())
}
