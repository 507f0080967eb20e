//! @ai:module:intent Run one sieve invocation and extract its result
//! @ai:module:layer application
//! @ai:module:public_api Invoker, SieveCommandTrait, ProcessSieveCommand, MockSieveCommand, MarkerParser

pub mod command;
pub mod parser;

pub use command::{MockSieveCommand, ProcessSieveCommand, SieveCommandTrait, SieveOutput};
pub use parser::{MarkerParser, MarkerState, OutputParserTrait, ScanStep};

use crate::error::Result;
use crate::metrics::RunResult;

/// @ai:intent Spawns the sieve, scans its output, and reaps the process
pub struct Invoker<C: SieveCommandTrait, P: OutputParserTrait = MarkerParser> {
    command: C,
    parser: P,
}

impl<C: SieveCommandTrait> Invoker<C, MarkerParser> {
    /// @ai:intent Create an invoker using the marker-line parser
    /// @ai:effects pure
    pub fn new(command: C) -> Self {
        Self::with_parser(command, MarkerParser::new())
    }
}

impl<C: SieveCommandTrait, P: OutputParserTrait> Invoker<C, P> {
    /// @ai:intent Create an invoker with a custom output parser
    /// @ai:effects pure
    pub fn with_parser(command: C, parser: P) -> Self {
        Self { command, parser }
    }

    /// @ai:intent Run the sieve once
    /// @ai:post Ok(None) when the output carried no result
    /// @ai:effects io
    pub async fn invoke(&self, max_number: u64, sieve_name: &str) -> Result<Option<RunResult>> {
        let mut output = self.command.spawn(max_number, sieve_name).await?;
        let mut state = P::State::default();
        let mut result = None;

        while let Some(line) = output.next_line().await {
            tracing::trace!("sieve: {}", line);

            if let ScanStep::Done(found) = self.parser.feed(&mut state, &line) {
                result = found;
                break;
            }
        }

        output.close().await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_invoke_extracts_result() {
        let invoker = Invoker::new(MockSieveCommand::new([
            "2 3 5 7\n ... 4 primes found.\n ... calculation took 0.002000ms.\n",
        ]));

        let result = invoker.invoke(10, "default").await.unwrap();
        assert_eq!(
            result,
            Some(RunResult {
                prime_count: 4,
                duration_ms: 0.002
            })
        );
    }

    #[tokio::test]
    async fn test_invoke_without_duration_is_no_result() {
        let invoker = Invoker::new(MockSieveCommand::new(["1229 primes found\n"]));
        assert_eq!(invoker.invoke(10_000, "default").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invoke_is_repeatable() {
        let invoker = Invoker::new(MockSieveCommand::with_durations(1229, &[4.5, 6.25]));

        let first = invoker.invoke(10_000, "default").await.unwrap().unwrap();
        let second = invoker.invoke(10_000, "default").await.unwrap().unwrap();

        assert_eq!(first.prime_count, second.prime_count);
        assert!(first.duration_ms >= 0.0 && second.duration_ms >= 0.0);
    }

    struct KeyValueParser;

    impl OutputParserTrait for KeyValueParser {
        type State = Option<u64>;

        fn feed(&self, state: &mut Option<u64>, line: &str) -> ScanStep {
            if let Some(count) = line.strip_prefix("count=") {
                *state = count.parse().ok();
            }

            match line.strip_prefix("ms=").and_then(|v| v.parse::<f64>().ok()) {
                Some(duration_ms) => ScanStep::Done(state.map(|prime_count| RunResult {
                    prime_count,
                    duration_ms,
                })),
                None => ScanStep::Continue,
            }
        }
    }

    #[tokio::test]
    async fn test_custom_parser() {
        let invoker = Invoker::with_parser(
            MockSieveCommand::new(["count=25\nms=1.5\n"]),
            KeyValueParser,
        );

        let result = invoker.invoke(100, "default").await.unwrap();
        assert_eq!(
            result,
            Some(RunResult {
                prime_count: 25,
                duration_ms: 1.5
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_real_process_drains_trailing_output() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("primes");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             echo \" ... 1229 primes found.\"\n\
             echo \" ... calculation took 12.345ms.\"\n\
             i=0\n\
             while [ $i -lt 2000 ]; do echo \"trailing line $i\"; i=$((i+1)); done\n\
             exit 3\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let invoker = Invoker::new(ProcessSieveCommand::new(&script));
        let result = invoker.invoke(10_000, "default").await.unwrap();

        assert_eq!(
            result,
            Some(RunResult {
                prime_count: 1229,
                duration_ms: 12.345
            })
        );
    }
}
