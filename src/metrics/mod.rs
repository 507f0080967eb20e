//! @ai:module:intent Metrics collection and aggregation
//! @ai:module:layer application
//! @ai:module:public_api RunResult, Sample, BenchmarkSummary, BenchmarkResults, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use types::{BenchmarkResults, BenchmarkSummary, RunResult, Sample};
