//! curlprobe-runner: mutation generation and sequential execution

pub mod executor;
pub mod mutate;
pub mod runner;

pub use executor::{HttpExecutor, Transport};
pub use mutate::{GenerationOptions, generate_cases};
pub use runner::ProbeRunner;

use curlprobe_core::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("HTTP client error: {0}")]
    Http(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
