//! cap-table-engine CLI
//!
//! Run cap table scenarios from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Calculate a scenario from a JSON file
//! cap-table-engine calculate --input scenario.json
//!
//! # Output the full response as JSON
//! cap-table-engine calculate --input scenario.json --format json
//!
//! # Payouts at several exit valuations
//! cap-table-engine sweep --input scenario.json --valuations 50000000,100000000
//!
//! # Generate a random scenario for testing
//! cap-table-engine generate --founders 3 --rounds 4 --seed 7
//! ```

use cap_table_engine::analysis::ownership_history::{category_totals, OwnershipHistory};
use cap_table_engine::core::scenario::ScenarioInput;
use cap_table_engine::engine::config::EngineConfig;
use cap_table_engine::engine::CapTableEngine;
use cap_table_engine::simulation::exit_sweep::ExitSweep;
use cap_table_engine::simulation::scenario_gen::{generate_scenario, ScenarioGenConfig};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"cap-table-engine — startup cap table and exit payout calculator

USAGE:
    cap-table-engine <COMMAND> [OPTIONS]

COMMANDS:
    calculate   Run a scenario through every round and the exit
    sweep       Exit payouts for a list of exit valuations
    history     Ownership per stakeholder across every round
    generate    Generate a random valid scenario (for testing)
    help        Show this message

OPTIONS (calculate, sweep, history):
    --input <FILE>        Path to JSON scenario file

OPTIONS (calculate):
    --format <FORMAT>     Output format: text (default) or json
    --tolerance <PCT>     Allowed deviation of founders + ESOP from 100% (default: 0.01)

OPTIONS (sweep):
    --valuations <LIST>   Comma-separated exit valuations

OPTIONS (generate):
    --founders <N>        Number of founders (default: 2)
    --rounds <N>          Number of rounds (default: 3)
    --seed <N>            Random seed (default: 42)
    --output <FILE>       Write to file instead of stdout

Set RUST_LOG=debug to trace each round step.

EXAMPLES:
    cap-table-engine calculate --input scenario.json
    cap-table-engine calculate --input scenario.json --format json
    cap-table-engine sweep --input scenario.json --valuations 10000000,50000000,250000000
    cap-table-engine history --input scenario.json
    cap-table-engine generate --founders 3 --rounds 5 --output test.json"#
    );
}

fn require_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn load_scenario(path: &str) -> ScenarioInput {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "founders": [ {{ "name": "Alice", "equityPercent": 90 }} ],
  "initialShares": 10000000,
  "initialEsopPoolPercent": 10,
  "rounds": [ {{ "name": "Seed", "preMoneyValuation": 8000000, "capitalRaised": 2000000 }} ],
  "exitValuation": 100000000
}}"#);
        process::exit(1);
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

fn input_only(args: &[String]) -> String {
    let mut input_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(require_value(args, i, "--input", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    })
}

fn cmd_calculate(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = EngineConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(require_value(args, i, "--input", "a file path"));
            }
            "--format" => {
                i += 1;
                format = require_value(args, i, "--format", "'text' or 'json'");
            }
            "--tolerance" => {
                i += 1;
                config.equity_sum_tolerance = require_value(args, i, "--tolerance", "a percentage")
                    .parse()
                    .unwrap_or_else(|e| {
                        eprintln!("Invalid tolerance: {}", e);
                        process::exit(1);
                    });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let scenario = load_scenario(&path);
    let response = CapTableEngine::new(config).run(&scenario);

    if format == "json" {
        println!("{}", to_json(&response));
    } else {
        print!("{}", response);
    }

    if !response.is_ok() {
        process::exit(1);
    }
}

fn cmd_sweep(args: &[String]) {
    let mut input_path = None;
    let mut valuations_str = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(require_value(args, i, "--input", "a file path"));
            }
            "--valuations" => {
                i += 1;
                valuations_str = Some(require_value(args, i, "--valuations", "a comma-separated list"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (path, valuations_str) = match (input_path, valuations_str) {
        (Some(p), Some(v)) => (p, v),
        _ => {
            eprintln!("Error: --input <FILE> and --valuations <LIST> are required");
            process::exit(1);
        }
    };

    let valuations: Vec<Decimal> = valuations_str
        .split(',')
        .map(|s| {
            s.trim().parse().unwrap_or_else(|e| {
                eprintln!("Invalid valuation '{}': {}", s, e);
                process::exit(1);
            })
        })
        .collect();

    let response = CapTableEngine::calculate(&load_scenario(&path));
    match ExitSweep::from_response(&response, &valuations) {
        Ok(sweep) => print!("{}", sweep),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_history(args: &[String]) {
    let path = input_only(args);
    let response = CapTableEngine::calculate(&load_scenario(&path));
    if let Some(error) = &response.error {
        eprintln!("Error: {}", error);
        process::exit(1);
    }

    print!("{}", OwnershipHistory::from_response(&response));

    println!("\n=== Ownership by Category ===");
    for total in category_totals(&response.summary.final_ownership) {
        println!(
            "  {:<9} {:>18} {:>8}%",
            total.category.as_str(),
            total.shares.round_dp(2),
            total.percentage.round_dp(2)
        );
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = ScenarioGenConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--founders" => {
                i += 1;
                config.founder_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--founders requires a number");
                    process::exit(1);
                });
            }
            "--rounds" => {
                i += 1;
                config.round_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--rounds requires a number");
                    process::exit(1);
                });
            }
            "--seed" => {
                i += 1;
                config.seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a number");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(require_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let scenario = generate_scenario(&config);
    let json = to_json(&scenario);

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} founders and {} rounds → {}",
            scenario.founders.len(),
            scenario.rounds.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "calculate" => cmd_calculate(rest),
        "sweep" => cmd_sweep(rest),
        "history" => cmd_history(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
