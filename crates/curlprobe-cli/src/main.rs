//! curlprobe CLI - mutation test battery from one example curl request

mod report;
mod storage;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use curlprobe_core::{Config, RunResult, request_summary};
use curlprobe_runner::ProbeRunner;

#[derive(Parser)]
#[command(name = "curlprobe")]
#[command(about = "Generate and run a mutation test battery from one example curl request")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (debug logs, curl reproductions of failures)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the request, generate the battery and send it
    Run {
        /// File holding the curl command (stdin when omitted or `-`)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Status the unmodified request should return
        #[arg(short, long)]
        expected_status: Option<u16>,

        /// Config file (default: .curlprobe.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fixed seed for the fuzz passes
        #[arg(long)]
        seed: Option<u64>,

        /// Show the battery without sending requests
        #[arg(long)]
        dry_run: bool,

        /// Do not save the report under ~/.curlprobe/reports
        #[arg(long)]
        no_save: bool,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the run report
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("cannot read input {}", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

fn print_result(result: &RunResult, output: OutputFormat, verbose: bool) -> Result<()> {
    match output {
        OutputFormat::Terminal => print!("{}", report::render(result, verbose)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Silent => {}
    }
    Ok(())
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Run {
            input,
            expected_status,
            config,
            seed,
            dry_run,
            no_save,
        } => {
            let mut cfg = if let Some(path) = config {
                Config::load(&path)?
            } else {
                Config::load_default()?
            };
            if let Some(status) = expected_status {
                cfg.expected_status = status;
            }
            if seed.is_some() {
                cfg.seed = seed;
            }

            let text = read_input(input.as_deref())?;
            let runner = ProbeRunner::from_config(&cfg);

            if dry_run {
                let plan = runner.plan(&text)?;
                match cli.output {
                    OutputFormat::Terminal => println!("{}", plan.to_terminal()),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                    OutputFormat::Silent => {}
                }
                return Ok(u8::from(plan.has_errors()));
            }

            let (base, cases) = match runner.prepare(&text) {
                Ok(prepared) => prepared,
                Err(e) => {
                    print_result(&RunResult::aborted(e.to_string()), cli.output, cli.verbose)?;
                    return Ok(3);
                }
            };
            if cli.output != OutputFormat::Silent {
                eprintln!("Request: {}", request_summary(&base));
                eprintln!("Cases:   {}", cases.len());
                eprintln!();
            }

            let executor = runner.http_executor()?;
            let start = Instant::now();
            let result = runner.run_prepared(&base, cases, &executor);
            let duration_secs = start.elapsed().as_secs_f64();

            print_result(&result, cli.output, cli.verbose)?;

            if !no_save {
                let data = storage::ReportData {
                    config: &cfg,
                    result: &result,
                    target: &base.url,
                    duration_secs,
                };
                match storage::save_report(&data) {
                    Ok(path) => {
                        if cli.output != OutputFormat::Silent {
                            eprintln!("Report saved: {}", path.display());
                        }
                    }
                    Err(e) => eprintln!("Warning: failed to save report: {e}"),
                }
            }

            Ok(if result.summary.all_passed() { 0 } else { 1 })
        }

        Commands::Init => {
            let config_path = ".curlprobe.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - expected_status: status of the unmodified request");
            println!("  - headers: auth tokens, API keys");
            println!("  - categories: which mutations to generate");
            Ok(0)
        }

        Commands::Schema => {
            println!("{}", curlprobe_core::schema::generate_schema());
            Ok(0)
        }
    }
}
