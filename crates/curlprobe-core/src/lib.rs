//! curlprobe-core: Core types and classification logic for request mutation testing
//!
//! This crate turns pasted `curl` text into a structured request, defines the
//! test cases generated from it, and judges and aggregates their outcomes.
//! Generation and execution live in `curlprobe-runner`.

pub mod aggregate;
pub mod case;
pub mod catalog;
pub mod config;
pub mod dryrun;
pub mod extract;
pub mod outcome;
pub mod payload;
pub mod reproduce;
pub mod request;
pub mod schema;
pub mod status;
pub mod verdict;

pub use aggregate::{ResultAggregator, RunResult, RunSummary, Tally};
pub use case::{Category, ExpectedStatus, TestCase};
pub use catalog::{Attack, EdgeKind};
pub use config::{CategoryToggles, Config, ConfigError};
pub use dryrun::DryRunPlan;
pub use extract::{ExtractError, ExtractOptions, extract, extract_with};
pub use outcome::{Outcome, ResponseBody};
pub use payload::{LeafPath, Mapping, PathError, PathSegment, Payload, Scalar};
pub use reproduce::{request_summary, to_curl_command};
pub use request::{Method, RequestDescriptor, url_scheme};
pub use verdict::{Verdict, VerdictPolicy, VerdictStatus};
