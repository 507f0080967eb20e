//! @ai:module:intent Benchmark execution
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkExecutor, create_executor

pub mod executor;

pub use executor::{create_executor, BenchmarkExecutor};
