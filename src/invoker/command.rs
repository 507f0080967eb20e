//! @ai:module:intent Launch the external sieve program and stream its stdout
//! @ai:module:layer infrastructure
//! @ai:module:public_api SieveCommandTrait, ProcessSieveCommand, MockSieveCommand, SieveOutput
//! @ai:module:stateless false

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

/// @ai:intent Trait for starting one sieve run
#[allow(async_fn_in_trait)]
pub trait SieveCommandTrait: Send + Sync {
    /// @ai:intent Start the sieve for the given limit and variant
    async fn spawn(&self, max_number: u64, sieve_name: &str) -> Result<SieveOutput>;
}

/// @ai:intent Line stream over the stdout of one sieve run
pub struct SieveOutput {
    reader: Pin<Box<dyn AsyncBufRead + Send>>,
    child: Option<Child>,
    buf: Vec<u8>,
}

impl SieveOutput {
    /// @ai:intent Wrap any buffered reader
    /// @ai:effects pure
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + 'static,
    {
        Self {
            reader: Box::pin(reader),
            child: None,
            buf: Vec::new(),
        }
    }

    /// @ai:intent Canned output, used in place of a real process
    /// @ai:effects pure
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_reader(std::io::Cursor::new(text.into().into_bytes()))
    }

    /// @ai:intent Take ownership of a spawned child and its piped stdout
    /// @ai:pre child was spawned with Stdio::piped() stdout
    fn from_child(mut child: Child, program: &Path) -> Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::MissingStdout(program.to_path_buf()))?;

        let mut output = Self::from_reader(BufReader::new(stdout));
        output.child = Some(child);
        Ok(output)
    }

    /// @ai:intent Read the next line, without its line terminator
    /// @ai:effects io
    ///
    /// Returns None at end of stream. Read errors end the stream; bytes that
    /// are not valid UTF-8 are replaced rather than rejected.
    pub async fn next_line(&mut self) -> Option<String> {
        self.buf.clear();

        match self.reader.read_until(b'\n', &mut self.buf).await {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                Some(line.trim_end_matches(['\n', '\r']).to_string())
            }
            Err(e) => {
                tracing::warn!("Failed to read sieve output, treating as end of stream: {}", e);
                None
            }
        }
    }

    /// @ai:intent Discard remaining output and reap the process
    /// @ai:effects io
    pub async fn close(mut self) {
        if let Err(e) = tokio::io::copy_buf(&mut self.reader, &mut tokio::io::sink()).await {
            tracing::debug!("Failed to drain sieve output: {}", e);
        }

        if let Some(mut child) = self.child.take() {
            match child.wait().await {
                Ok(status) => tracing::debug!("Sieve process exited with {}", status),
                Err(e) => tracing::warn!("Failed to wait for sieve process: {}", e),
            }
        }
    }
}

/// @ai:intent Runs the sieve as `<program> --max-number=<N> --sieve=<name>`
pub struct ProcessSieveCommand {
    program: PathBuf,
}

impl ProcessSieveCommand {
    /// @ai:intent Create a command for the given sieve program
    /// @ai:effects pure
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// @ai:intent Build the argument list passed to the sieve
    /// @ai:effects pure
    fn args(max_number: u64, sieve_name: &str) -> [String; 2] {
        [
            format!("--max-number={}", max_number),
            format!("--sieve={}", sieve_name),
        ]
    }
}

impl SieveCommandTrait for ProcessSieveCommand {
    /// @ai:intent Spawn the sieve process with stdout piped
    /// @ai:effects io
    async fn spawn(&self, max_number: u64, sieve_name: &str) -> Result<SieveOutput> {
        let mut cmd = Command::new(&self.program);

        cmd.args(Self::args(max_number, sieve_name));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::inherit());

        tracing::debug!(
            "Running {} --max-number={} --sieve={}",
            self.program.display(),
            max_number,
            sieve_name
        );

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;

        SieveOutput::from_child(child, &self.program)
    }
}

/// @ai:intent Mock command replaying canned outputs, one per spawn
pub struct MockSieveCommand {
    outputs: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(u64, String)>>,
}

impl MockSieveCommand {
    /// @ai:intent Create a mock that replays the given outputs in order
    /// @ai:effects pure
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: Mutex::new(outputs.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Create a mock emitting the usual two marker lines per duration
    /// @ai:effects pure
    pub fn with_durations(prime_count: u64, durations: &[f64]) -> Self {
        Self::new(durations.iter().map(|d| {
            format!(
                " ... {} primes found.\n ... calculation took {:.6}ms.\n",
                prime_count, d
            )
        }))
    }

    /// @ai:intent Arguments of every spawn so far
    pub fn calls(&self) -> Vec<(u64, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SieveCommandTrait for MockSieveCommand {
    /// @ai:intent Return the next canned output, or an empty stream once exhausted
    /// @ai:effects pure
    async fn spawn(&self, max_number: u64, sieve_name: &str) -> Result<SieveOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((max_number, sieve_name.to_string()));
        }

        let text = self
            .outputs
            .lock()
            .ok()
            .and_then(|mut outputs| outputs.pop_front())
            .unwrap_or_default();

        Ok(SieveOutput::from_text(text))
    }
}
