//! @ai:module:intent Configuration structs for benchmark runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, CommandConfig, MissingSamplePolicy
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for a benchmark run
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default = "default_max_number")]
    pub max_number: u64,
    #[serde(default = "default_sieve_name")]
    pub sieve_name: String,
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,
    #[serde(default)]
    pub missing_samples: MissingSamplePolicy,
    #[serde(default)]
    pub command: CommandConfig,
}

/// @ai:intent Location of the external sieve program
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_program")]
    pub program: PathBuf,
}

/// @ai:intent What to do with runs whose output carried no result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSamplePolicy {
    /// Drop the run from the mean and the sample count.
    #[default]
    Exclude,
    /// Fail the whole benchmark once all repetitions ran.
    Fail,
}

impl MissingSamplePolicy {
    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingSamplePolicy::Exclude => "exclude",
            MissingSamplePolicy::Fail => "fail",
        }
    }
}

impl std::fmt::Display for MissingSamplePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            max_number: default_max_number(),
            sieve_name: default_sieve_name(),
            repetitions: default_repetitions(),
            missing_samples: MissingSamplePolicy::default(),
            command: CommandConfig::default(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_max_number() -> u64 {
    10_000
}

fn default_sieve_name() -> String {
    "default".to_string()
}

fn default_repetitions() -> u32 {
    10
}

fn default_program() -> PathBuf {
    PathBuf::from("examples/primes")
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Reject configurations the sieve program cannot be run with
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.max_number == 0 {
            return Err(Error::InvalidConfig(
                "max_number must be greater than zero".to_string(),
            ));
        }

        if self.repetitions == 0 {
            return Err(Error::InvalidConfig(
                "repetitions must be greater than zero".to_string(),
            ));
        }

        if self.sieve_name.trim().is_empty() {
            return Err(Error::InvalidConfig("sieve_name must not be empty".to_string()));
        }

        if self.command.program.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "command.program must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
