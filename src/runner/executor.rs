//! @ai:module:intent Sequential repetition loop for benchmark runs
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkExecutor, create_executor
//! @ai:module:stateless true

use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::invoker::{Invoker, MarkerParser, OutputParserTrait, ProcessSieveCommand, SieveCommandTrait};
use crate::metrics::{BenchmarkResults, MetricsAggregator, MetricsAggregatorTrait, Sample};

/// @ai:intent Runs the sieve repeatedly and aggregates the samples
pub struct BenchmarkExecutor<C: SieveCommandTrait, P: OutputParserTrait = MarkerParser> {
    invoker: Invoker<C, P>,
    aggregator: MetricsAggregator,
}

impl<C: SieveCommandTrait, P: OutputParserTrait> BenchmarkExecutor<C, P> {
    /// @ai:intent Create a new benchmark executor
    /// @ai:effects pure
    pub fn new(invoker: Invoker<C, P>) -> Self {
        Self {
            invoker,
            aggregator: MetricsAggregator::new(),
        }
    }

    /// @ai:intent Invoke the sieve `repetitions` times, one after another
    /// @ai:post returned samples are ordered by run number, one per repetition
    /// @ai:effects io
    pub async fn collect(&self, config: &BenchmarkConfig) -> Result<Vec<Sample>> {
        let mut samples = Vec::with_capacity(config.repetitions as usize);

        for run in 1..=config.repetitions {
            let result = self
                .invoker
                .invoke(config.max_number, &config.sieve_name)
                .await?;

            match result {
                Some(r) => tracing::info!(
                    "[{}/{}] {} primes in {:.6}ms",
                    run,
                    config.repetitions,
                    r.prime_count,
                    r.duration_ms
                ),
                None => tracing::warn!("[{}/{}] sieve output carried no result", run, config.repetitions),
            }

            samples.push(Sample { run, result });
        }

        Ok(samples)
    }

    /// @ai:intent Run the full benchmark and summarize it
    /// @ai:effects io
    pub async fn run(&self, config: &BenchmarkConfig) -> Result<BenchmarkResults> {
        config.validate()?;

        tracing::info!(
            "Benchmarking {} (sieve={}, max={}, repetitions={})",
            config.command.program.display(),
            config.sieve_name,
            config.max_number,
            config.repetitions
        );

        let samples = self.collect(config).await?;
        let summary = self.aggregator.aggregate(config, &samples)?;

        Ok(BenchmarkResults {
            timestamp: chrono::Utc::now().to_rfc3339(),
            program: config.command.program.display().to_string(),
            summary,
            samples,
        })
    }
}

/// @ai:intent Create an executor that spawns the configured sieve program
/// @ai:effects pure
pub fn create_executor(config: &BenchmarkConfig) -> BenchmarkExecutor<ProcessSieveCommand> {
    let command = ProcessSieveCommand::new(config.command.program.clone());
    BenchmarkExecutor::new(Invoker::new(command))
}
