//! @ai:module:intent Extract prime count and duration from sieve output
//! @ai:module:layer domain
//! @ai:module:public_api OutputParserTrait, MarkerParser, MarkerState, ScanStep
//! @ai:module:stateless true

use crate::metrics::RunResult;
use regex::Regex;

/// Line containing the number of primes the sieve found.
pub const PRIMES_MARKER: &str = "primes found";
/// Terminal line containing the measured calculation time in milliseconds.
pub const DURATION_MARKER: &str = "calculation took";

/// @ai:intent Outcome of feeding one line to a parser
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanStep {
    /// Keep reading lines
    Continue,
    /// Stop reading; None when the terminal line was malformed
    Done(Option<RunResult>),
}

/// @ai:intent Trait for turning a line stream into a run result
pub trait OutputParserTrait: Send + Sync {
    /// Per-invocation scan state
    type State: Default + Send;

    /// @ai:intent Consume one line of output
    fn feed(&self, state: &mut Self::State, line: &str) -> ScanStep;

    /// @ai:intent Parse a complete set of lines
    /// @ai:effects pure
    fn parse<I, S>(&self, lines: I) -> Option<RunResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = Self::State::default();

        for line in lines {
            if let ScanStep::Done(result) = self.feed(&mut state, line.as_ref()) {
                return result;
            }
        }

        None
    }
}

/// @ai:intent Scan state for the marker-line format
#[derive(Debug, Default)]
pub struct MarkerState {
    prime_count: Option<u64>,
}

/// @ai:intent Parses the "primes found" / "calculation took" marker lines
pub struct MarkerParser {
    count: Regex,
    duration: Regex,
}

impl MarkerParser {
    /// @ai:intent Create a new marker parser
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            count: Regex::new(r"[0-9]+").expect("static regex"),
            duration: Regex::new(r"[0-9]+\.[0-9]+").expect("static regex"),
        }
    }
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputParserTrait for MarkerParser {
    type State = MarkerState;

    /// @ai:intent Record the count marker, finish on the duration marker
    /// @ai:effects pure
    fn feed(&self, state: &mut MarkerState, line: &str) -> ScanStep {
        if line.contains(PRIMES_MARKER) {
            // a digit run too large for u64 keeps the previous count
            if let Some(count) = self
                .count
                .find(line)
                .and_then(|m| m.as_str().parse::<u64>().ok())
            {
                state.prime_count = Some(count);
            }
        }

        if line.contains(DURATION_MARKER) {
            let result = self
                .duration
                .find(line)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .map(|duration_ms| RunResult {
                    prime_count: state.prime_count.unwrap_or(0),
                    duration_ms,
                });

            if result.is_none() {
                tracing::warn!("Duration marker without a fractional number: {}", line);
            }

            return ScanStep::Done(result);
        }

        ScanStep::Continue
    }
}
