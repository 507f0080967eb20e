//! @ai:module:intent Statistical aggregation for benchmark samples
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator
//! @ai:module:stateless true

use crate::config::{BenchmarkConfig, MissingSamplePolicy};
use crate::error::{Error, Result};
use crate::metrics::types::{BenchmarkSummary, Sample};

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Reduce collected samples into a summary
    fn aggregate(&self, config: &BenchmarkConfig, samples: &[Sample]) -> Result<BenchmarkSummary>;
}

/// @ai:intent Aggregates samples into the reported average
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> Option<f64> {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Aggregate samples according to the configured missing-sample policy
    /// @ai:effects pure
    fn aggregate(&self, config: &BenchmarkConfig, samples: &[Sample]) -> Result<BenchmarkSummary> {
        let missing: Vec<u32> = samples
            .iter()
            .filter(|s| s.result.is_none())
            .map(|s| s.run)
            .collect();

        if !missing.is_empty() {
            match config.missing_samples {
                MissingSamplePolicy::Exclude => {
                    tracing::warn!(
                        "Excluding {} run(s) without a result from the average: {:?}",
                        missing.len(),
                        missing
                    );
                }
                MissingSamplePolicy::Fail => {
                    return Err(Error::MissingSamples {
                        missing: missing.len(),
                        repetitions: config.repetitions,
                    });
                }
            }
        }

        let last_prime_count = samples
            .iter()
            .rev()
            .find_map(|s| s.result.map(|r| r.prime_count));

        Ok(BenchmarkSummary {
            max_number: config.max_number,
            sieve_name: config.sieve_name.clone(),
            last_prime_count,
            sample_count: samples.len() - missing.len(),
            missing_count: missing.len(),
            average_duration_ms: average(samples.iter().filter_map(Sample::duration_ms)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::RunResult;

    fn hit(run: u32, prime_count: u64, duration_ms: f64) -> Sample {
        Sample {
            run,
            result: Some(RunResult {
                prime_count,
                duration_ms,
            }),
        }
    }

    fn config(repetitions: u32) -> BenchmarkConfig {
        BenchmarkConfig {
            repetitions,
            ..Default::default()
        }
    }

    #[test]
    fn test_average() {
        let values = vec![10.0, 20.0, 30.0];
        assert!((average(values.into_iter()).unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_empty() {
        let values: Vec<f64> = vec![];
        assert_eq!(average(values.into_iter()), None);
    }

    #[test]
    fn test_aggregate_all_successful() {
        let samples = vec![hit(1, 1229, 10.0), hit(2, 1229, 20.0), hit(3, 1229, 30.0)];
        let summary = MetricsAggregator::new()
            .aggregate(&config(3), &samples)
            .unwrap();

        assert_eq!(summary.max_number, 10_000);
        assert_eq!(summary.last_prime_count, Some(1229));
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.missing_count, 0);
        assert!((summary.average_duration_ms.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_run_average_is_exact() {
        let samples = vec![hit(1, 168, 0.123456)];
        let summary = MetricsAggregator::new()
            .aggregate(&config(1), &samples)
            .unwrap();

        assert_eq!(summary.average_duration_ms, Some(0.123456));
    }

    #[test]
    fn test_exclude_policy_skips_missing_runs() {
        let samples = vec![
            hit(1, 1229, 10.0),
            Sample { run: 2, result: None },
            hit(3, 1229, 30.0),
        ];
        let summary = MetricsAggregator::new()
            .aggregate(&config(3), &samples)
            .unwrap();

        assert_eq!(summary.sample_count, 2);
        assert_eq!(summary.missing_count, 1);
        assert!((summary.average_duration_ms.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_prime_count_skips_trailing_miss() {
        let samples = vec![hit(1, 1229, 10.0), Sample { run: 2, result: None }];
        let summary = MetricsAggregator::new()
            .aggregate(&config(2), &samples)
            .unwrap();

        assert_eq!(summary.last_prime_count, Some(1229));
    }

    #[test]
    fn test_all_missing_leaves_average_undefined() {
        let samples = vec![Sample { run: 1, result: None }, Sample { run: 2, result: None }];
        let summary = MetricsAggregator::new()
            .aggregate(&config(2), &samples)
            .unwrap();

        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.average_duration_ms, None);
        assert_eq!(summary.last_prime_count, None);
    }

    #[test]
    fn test_fail_policy_rejects_missing_runs() {
        let config = BenchmarkConfig {
            repetitions: 2,
            missing_samples: MissingSamplePolicy::Fail,
            ..Default::default()
        };
        let samples = vec![hit(1, 1229, 10.0), Sample { run: 2, result: None }];

        let err = MetricsAggregator::new().aggregate(&config, &samples).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingSamples {
                missing: 1,
                repetitions: 2
            }
        ));
    }
}
