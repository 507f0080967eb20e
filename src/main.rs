//! @ai:module:intent CLI for the prime sieve benchmark harness
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prime_bench::{create_executor, BenchmarkConfig, MissingSamplePolicy, ReportGenerator};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "prime-bench.toml";

#[derive(Parser)]
#[command(name = "prime-bench")]
#[command(about = "Measure the average run time of an external prime sieve")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Maximum prime number [default: 10000]
    #[arg(long)]
    max_number: Option<u64>,

    /// Number of measurements [default: 10]
    #[arg(long)]
    tests: Option<u32>,

    /// Sieve short name, one of: default, optimized [default: default]
    #[arg(long)]
    sieve: Option<String>,

    /// Path to the sieve program [default: examples/primes]
    #[arg(long)]
    program: Option<PathBuf>,

    /// What to do with runs that report no result [default: exclude]
    #[arg(long, value_enum)]
    missing: Option<Missing>,

    /// Path to configuration file [default: prime-bench.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write results.json and charts into a timestamped directory here
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Missing {
    Exclude,
    Fail,
}

impl From<Missing> for MissingSamplePolicy {
    fn from(m: Missing) -> Self {
        match m {
            Missing::Exclude => MissingSamplePolicy::Exclude,
            Missing::Fail => MissingSamplePolicy::Fail,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prime_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { output }) => init_config(output),
        None => run_benchmark(cli).await,
    }
}

/// @ai:intent Run the benchmark and print the four-line summary
/// @ai:effects io, fs:write
async fn run_benchmark(cli: Cli) -> Result<()> {
    let mut config = load_or_default_config(cli.config)?;

    if let Some(max_number) = cli.max_number {
        config.max_number = max_number;
    }
    if let Some(tests) = cli.tests {
        config.repetitions = tests;
    }
    if let Some(sieve) = cli.sieve {
        config.sieve_name = sieve;
    }
    if let Some(program) = cli.program {
        config.command.program = program;
    }
    if let Some(missing) = cli.missing {
        config.missing_samples = missing.into();
    }

    let executor = create_executor(&config);
    let results = executor.run(&config).await?;

    if let Some(output) = cli.output {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let output_dir = output.join(timestamp.to_string());
        ReportGenerator::new().generate_all(&results, &output_dir)?;
    }

    print!("{}", results.summary);
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => Ok(BenchmarkConfig::load(&p)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                Ok(BenchmarkConfig::load(&default_path)?)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}
