//! @ai:module:intent Prime sieve benchmark harness library
//! @ai:module:layer application
//! @ai:module:public_api config, error, invoker, metrics, report, runner
//!
//! Runs an external sieve program `repetitions` times, scrapes the prime
//! count and calculation time from its stdout, and reports the average
//! duration.

pub mod config;
pub mod error;
pub mod invoker;
pub mod metrics;
pub mod report;
pub mod runner;

pub use config::{BenchmarkConfig, CommandConfig, MissingSamplePolicy};
pub use error::{Error, Result};
pub use invoker::{Invoker, MarkerParser, OutputParserTrait, ProcessSieveCommand, SieveCommandTrait};
pub use metrics::{BenchmarkResults, BenchmarkSummary, MetricsAggregator, RunResult, Sample};
pub use report::ReportGenerator;
pub use runner::{create_executor, BenchmarkExecutor};
