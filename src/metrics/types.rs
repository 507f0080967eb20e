//! @ai:module:intent Metric types for benchmark results
//! @ai:module:layer domain
//! @ai:module:public_api RunResult, Sample, BenchmarkSummary, BenchmarkResults
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent Facts extracted from one sieve invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub prime_count: u64,
    pub duration_ms: f64,
}

/// @ai:intent Outcome of one repetition, in execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 1-based repetition number
    pub run: u32,
    /// None when the output carried no result
    pub result: Option<RunResult>,
}

impl Sample {
    /// @ai:intent Duration of this sample, if the run produced one
    /// @ai:effects pure
    pub fn duration_ms(&self) -> Option<f64> {
        self.result.map(|r| r.duration_ms)
    }
}

/// @ai:intent Aggregated statistics across all repetitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub max_number: u64,
    pub sieve_name: String,
    pub last_prime_count: Option<u64>,
    pub sample_count: usize,
    pub missing_count: usize,
    pub average_duration_ms: Option<f64>,
}

impl fmt::Display for BenchmarkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "max. number is {}", self.max_number)?;

        match self.last_prime_count {
            Some(count) => writeln!(f, "primes found: {}", count)?,
            None => writeln!(f, "primes found: n/a")?,
        }

        writeln!(f, "{} measurements", self.sample_count)?;

        match self.average_duration_ms {
            Some(avg) => writeln!(f, "avg duration: {:.6}ms", avg),
            None => writeln!(f, "avg duration: n/a"),
        }
    }
}

/// @ai:intent Complete benchmark results as persisted in reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub timestamp: String,
    pub program: String,
    pub summary: BenchmarkSummary,
    pub samples: Vec<Sample>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary() -> BenchmarkSummary {
        BenchmarkSummary {
            max_number: 10_000,
            sieve_name: "default".to_string(),
            last_prime_count: Some(1229),
            sample_count: 3,
            missing_count: 0,
            average_duration_ms: Some(20.0),
        }
    }

    #[test]
    fn test_display_prints_four_lines() {
        let text = summary().to_string();
        assert_eq!(
            text,
            "max. number is 10000\n\
             primes found: 1229\n\
             3 measurements\n\
             avg duration: 20.000000ms\n"
        );
    }

    #[test]
    fn test_display_without_samples() {
        let empty = BenchmarkSummary {
            last_prime_count: None,
            sample_count: 0,
            missing_count: 3,
            average_duration_ms: None,
            ..summary()
        };

        let text = empty.to_string();
        assert!(text.contains("primes found: n/a"));
        assert!(text.contains("0 measurements"));
        assert!(text.contains("avg duration: n/a"));
    }

    #[test]
    fn test_sample_duration() {
        let hit = Sample {
            run: 1,
            result: Some(RunResult {
                prime_count: 25,
                duration_ms: 0.5,
            }),
        };
        let miss = Sample { run: 2, result: None };

        assert_eq!(hit.duration_ms(), Some(0.5));
        assert_eq!(miss.duration_ms(), None);
    }
}
