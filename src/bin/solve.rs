//! promo-solve: optimal expected score and per-round policy summary.
//!
//! Prints the root value followed by one line per round. Optional reports:
//! - `--tiers` — retire probability per tier and the gain of promoting
//! - `--forward` — exact forward pass under optimal play
//! - `--json` — emit everything as one JSON document

use std::time::Instant;

use log::info;
use serde::Serialize;

use promo::env_config::{self, OutputFormat};
use promo::error::PromoError;
use promo::forward_pass::{forward_pass, ForwardPassResult};
use promo::policy_summary::{build_report, SolveReport};
use promo::probability_tables::{promotion_gains, TierRow};
use promo::state_computation::Solver;

struct Args {
    format: Option<OutputFormat>,
    tiers: bool,
    forward: bool,
}

fn print_usage() {
    println!("Usage: promo-solve [--json] [--tiers] [--forward]");
    println!();
    println!("Options:");
    println!("  --json      Print the report as JSON (env: PROMO_OUTPUT=json)");
    println!("  --tiers     Include the tier promotion table");
    println!("  --forward   Include the exact forward pass under optimal play");
    println!();
    println!("Logging is controlled by PROMO_LOG (default: info).");
}

fn parse_args() -> Result<Option<Args>, PromoError> {
    let mut args = Args {
        format: None,
        tiers: false,
        forward: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.format = Some(OutputFormat::Json),
            "--tiers" => args.tiers = true,
            "--forward" => args.forward = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(PromoError::UnknownArgument(other.to_string())),
        }
    }
    Ok(Some(args))
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a SolveReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    tiers: Option<&'a [TierRow]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forward: Option<&'a ForwardPassResult>,
}

fn print_text(report: &SolveReport, tiers: Option<&[TierRow]>, forward: Option<&ForwardPassResult>) {
    println!("{}", report.expected_score);
    for summary in &report.per_round {
        println!("{}", summary);
    }

    if let Some(rows) = tiers {
        println!();
        println!("tier | faces | retire p | promotion reduction");
        for row in rows {
            println!(
                "{:>4} | {:>5} | {:>8.3} | {:>19.4}",
                row.name, row.faces, row.retire_probability, row.promotion_reduction
            );
        }
    }

    if let Some(fp) = forward {
        println!();
        println!("round | states  | E[score] | P(react) | P(acq)  | P(promo) | P(bust)");
        for r in &fp.rounds {
            println!(
                "  {:2}  | {:7} | {:8.4} | {:8.4} | {:7.4} | {:8.4} | {:7.4}",
                r.round,
                r.reachable_states,
                r.expected_score,
                r.p_reactivate,
                r.p_acquire,
                r.p_promote,
                r.p_bust
            );
        }
        println!("forward pass E[final score] = {:.9}", fp.expected_final_score);
    }
}

fn run(args: Args) -> Result<(), PromoError> {
    let format = match args.format {
        Some(f) => f,
        None => env_config::output_format()?,
    };

    let mut solver = Solver::new();
    let root = solver.solve();
    let report = build_report(&solver, root);

    let tiers = args.tiers.then(promotion_gains);
    let forward = if args.forward {
        let t0 = Instant::now();
        let fp = forward_pass(&solver)?;
        info!("Forward pass in {:.2}s", t0.elapsed().as_secs_f64());
        Some(fp)
    } else {
        None
    };

    match format {
        OutputFormat::Text => print_text(&report, tiers.as_deref(), forward.as_ref()),
        OutputFormat::Json => {
            let out = JsonOutput {
                report: &report,
                tiers: tiers.as_deref(),
                forward: forward.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn main() {
    env_config::init_logging();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
