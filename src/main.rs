use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod accel;
mod error;
mod ir;
mod parser;
mod semantics;
#[cfg(test)]
mod validation;

use accel::{discover, AccelConfig, Driver, RunStatistics};
use ir::{Program, REGISTER_COUNT};
use parser::parse_program_file;
use semantics::{run_concrete, ConcreteState, RegisterFile, SolverConfig};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "loopjump")]
#[command(about = "loopjump - loop acceleration for six-register programs")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Enable verbose (debug) logging; RUST_LOG overrides
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that run discovery
#[derive(clap::Args)]
struct AccelOptions {
    /// Steps per symbolic discovery probe
    #[arg(long, default_value = "12")]
    discovery_window: usize,
    /// Iterations per fast-replay call
    #[arg(long, default_value = "200")]
    replay_budget: u64,
    /// Outer discovery/replay alternations
    #[arg(long, default_value = "2000")]
    cycles: u64,
    /// Ceiling for the jump-length search
    #[arg(long, default_value = "1000000000")]
    k_search_upper_bound: i64,
    /// Solver timeout per query, in seconds
    #[arg(long)]
    solver_timeout: Option<u64>,
    /// Trust the jump-length search without re-checking the target state
    #[arg(long)]
    no_verify_jumps: bool,
}

impl From<&AccelOptions> for AccelConfig {
    fn from(opts: &AccelOptions) -> Self {
        AccelConfig::default()
            .with_discovery_window(opts.discovery_window)
            .with_replay_budget(opts.replay_budget)
            .with_cycles(opts.cycles)
            .with_k_search_upper_bound(opts.k_search_upper_bound)
            .with_verify_jumps(!opts.no_verify_jumps)
            .with_solver(
                opts.solver_timeout
                    .map_or_else(SolverConfig::default, SolverConfig::with_timeout_secs),
            )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a program with the plain concrete interpreter
    Run {
        /// Path to the program text
        program: PathBuf,
        /// Initial register values, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        registers: Option<Vec<i64>>,
        /// Maximum number of instructions to execute
        #[arg(long, default_value = "100000000")]
        limit: u64,
    },
    /// Execute a program, jumping over loops found by symbolic discovery
    Accelerate {
        /// Path to the program text
        program: PathBuf,
        /// Initial register values, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        registers: Option<Vec<i64>>,
        #[command(flatten)]
        options: AccelOptions,
        /// Print the pattern library after the run
        #[arg(long)]
        show_patterns: bool,
    },
    /// Run a single discovery probe and print what it found
    Discover {
        /// Path to the program text
        program: PathBuf,
        /// Initial register values, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        registers: Option<Vec<i64>>,
        #[command(flatten)]
        options: AccelOptions,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn initial_state(registers: Option<Vec<i64>>) -> Result<ConcreteState, String> {
    let Some(values) = registers else {
        return Ok(ConcreteState::zeroed());
    };
    let values: [i64; REGISTER_COUNT] = values.try_into().map_err(|v: Vec<i64>| {
        format!(
            "expected {} register values, got {}",
            REGISTER_COUNT,
            v.len()
        )
    })?;
    Ok(RegisterFile(values))
}

fn load(path: &Path) -> Result<Program, Box<dyn std::error::Error>> {
    parse_program_file(path).map_err(|e| format!("{}: {}", path.display(), e).into())
}

// --- Commands ---

fn run_command(
    path: &Path,
    registers: Option<Vec<i64>>,
    limit: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let program = load(path)?;
    let state = initial_state(registers)?;

    let run = run_concrete(&program, state, limit)?;
    println!("Registers: {}", run.state);
    println!("Halted: {}", run.halted);
    println!("Steps: {}", run.steps);
    Ok(())
}

fn accelerate_command(
    path: &Path,
    registers: Option<Vec<i64>>,
    options: &AccelOptions,
    show_patterns: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let program = load(path)?;
    let state = initial_state(registers)?;

    let mut driver = Driver::new(program, AccelConfig::from(options));
    let report = driver.run(state)?;

    println!("Registers: {}", report.state);
    println!("Halted: {}", report.halted);
    println!("Cycles: {}", report.cycles);
    print_statistics(&report.statistics);

    if show_patterns {
        let library = driver.library();
        println!(
            "\nPatterns ({}, library version {}):",
            library.len(),
            library.version()
        );
        if library.is_empty() {
            println!("  (none)");
        }
        for (i, pattern) in library.iter().enumerate() {
            println!("  [{}] {}", i, pattern);
        }
    }
    Ok(())
}

fn discover_command(
    path: &Path,
    registers: Option<Vec<i64>>,
    options: &AccelOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let program = load(path)?;
    let state = initial_state(registers)?;
    let config = AccelConfig::from(options);

    let mut stats = RunStatistics::new();
    let discovery = discover(&program, &state, &config, &mut stats)?;

    println!("Steps probed: {}", discovery.history.len());
    println!("Path condition:");
    for condition in &discovery.path_condition {
        println!("  {}", condition);
    }
    match &discovery.pattern {
        Some(pattern) => {
            println!("Pattern found:");
            println!("  start: {}", pattern.start());
            println!("  guard: {}", pattern.guard());
            println!("  shift: {}", RegisterFile(*pattern.shift()));
        }
        None => println!("No pattern found"),
    }
    println!("Solver queries: {}", stats.solver_queries);
    Ok(())
}

fn print_statistics(stats: &RunStatistics) {
    println!("\nStatistics:");
    println!("  Elapsed time: {:?}", stats.elapsed_time);
    println!("  Concrete steps: {}", stats.concrete_steps);
    println!("  Symbolic steps: {}", stats.symbolic_steps);
    println!("  Discovery runs: {}", stats.discovery_runs);
    println!("  Patterns found: {}", stats.patterns_found);
    println!("  Solver queries: {}", stats.solver_queries);
    println!("  Pattern matches: {}", stats.pattern_matches);
    println!(
        "  Jumps taken: {} ({:.1}% of matches)",
        stats.jumps_taken,
        stats.jump_rate() * 100.0
    );
    println!("  Jumps declined: {}", stats.jumps_declined);
    println!("  Iterations skipped: {}", stats.iterations_skipped);
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.command {
        Commands::Run {
            program,
            registers,
            limit,
        } => run_command(program, registers.clone(), *limit),
        Commands::Accelerate {
            program,
            registers,
            options,
            show_patterns,
        } => accelerate_command(program, registers.clone(), options, *show_patterns),
        Commands::Discover {
            program,
            registers,
            options,
        } => discover_command(program, registers.clone(), options),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
