//! Bug Slayer balance simulator CLI.
//!
//! Run Monte Carlo battles to analyze class and chapter balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # Default: 1000 battles
//!   cargo run --bin simulate -- -n 100 -c debugger    # 100 Debugger battles
//!   cargo run --bin simulate -- --chapters 1,2 --seed 7

use std::env;

use bug_slayer::data::GameData;
use bug_slayer::simulator::{run_simulation, SimConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();
    let (config, write_json) = parse_args(&args);
    init_tracing(config.verbosity);

    let data = GameData::builtin();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              BUG SLAYER BALANCE SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Battles:        {}", config.num_battles);
    println!("  Classes:        {}", list_or_all(&config.classes));
    let chapters: Vec<String> = config.chapters.iter().map(|c| c.to_string()).collect();
    println!("  Chapters:       {}", list_or_all(&chapters));
    println!("  Max Turns:      {}", config.max_turns);
    println!("  Seed:           {}", config.seed);
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&data, &config);

    println!("{}", report.to_text());

    if write_json {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default = if verbosity >= 2 { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_or_all(items: &[String]) -> String {
    if items.is_empty() {
        "all".to_string()
    } else {
        items.join(", ")
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut write_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--battles" => {
                if i + 1 < args.len() {
                    config.num_battles = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-c" | "--classes" => {
                if i + 1 < args.len() {
                    config.classes = split_list(&args[i + 1]);
                    i += 1;
                }
            }
            "--chapters" => {
                if i + 1 < args.len() {
                    config.chapters = split_list(&args[i + 1])
                        .iter()
                        .filter_map(|c| c.parse().ok())
                        .collect();
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    if let Ok(seed) = args[i + 1].parse() {
                        config.seed = seed;
                    }
                    i += 1;
                }
            }
            "-t" | "--turns" => {
                if i + 1 < args.len() {
                    if let Ok(turns) = args[i + 1].parse() {
                        config.max_turns = turns;
                    }
                    i += 1;
                }
            }
            "--sequential" => {
                config.parallel = false;
            }
            "--json" => {
                write_json = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    (config, write_json)
}

fn print_help() {
    println!("Bug Slayer Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --battles <N>     Number of battles (default: 1000)");
    println!("    -c, --classes <a,b>   Classes to sample (default: all)");
    println!("    --chapters <1,2>      Chapters to sample (default: all)");
    println!("    -s, --seed <S>        Base seed; battle i uses S + i (default: 42)");
    println!("    -t, --turns <T>       Turn cap per battle (default: 50)");
    println!("    --sequential          Run on a single thread");
    println!("    -v, --verbose         Log every battle");
    println!("    --json                Save JSON report");
    println!("    -h, --help            Show this help");
    println!();
    println!("Logging honours RUST_LOG when set.");
}
