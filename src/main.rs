use anyhow::{bail, Context};
use log::info;
use sharebalance::config::ConfigManager;
use sharebalance::data::encode_message;
use sharebalance::engines::generation::{ProgressMessage, SearchOutcome};
use sharebalance::services::{ConfigBridge, RequestLoader, SearchRunner, SolutionHistory};
use std::env;
use std::path::PathBuf;

const USAGE: &str = "\
Usage: sharebalance [options]

Options:
  --config <path>         Load settings from a TOML or JSON file
  --request <path>        Run a JSON search request instead of the settings
  --runs <n>              Run the search n times and list the distinct solutions
  --json                  Print every progress message as JSON
  --manifest              Print the settings manifest as JSON and exit
  --write-default <path>  Write the default settings as TOML and exit
  -h, --help              Show this help";

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    request: Option<PathBuf>,
    write_default: Option<PathBuf>,
    runs: usize,
    json: bool,
    manifest: bool,
    help: bool,
}

impl CliArgs {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> anyhow::Result<Self> {
        let mut parsed = CliArgs {
            runs: 1,
            ..Default::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(next_value(&mut args, &arg)?.into()),
                "--request" => parsed.request = Some(next_value(&mut args, &arg)?.into()),
                "--write-default" => parsed.write_default = Some(next_value(&mut args, &arg)?.into()),
                "--runs" => {
                    parsed.runs = next_value(&mut args, &arg)?
                        .parse()
                        .context("--runs expects a positive integer")?;
                    if parsed.runs == 0 {
                        bail!("--runs expects a positive integer");
                    }
                }
                "--json" => parsed.json = true,
                "--manifest" => parsed.manifest = true,
                "-h" | "--help" => parsed.help = true,
                other => bail!("Unknown argument '{}'\n\n{}", other, USAGE),
            }
        }
        Ok(parsed)
    }
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> anyhow::Result<String> {
    args.next()
        .with_context(|| format!("{} expects a value", flag))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse(env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let manager = ConfigManager::new();

    if let Some(path) = &args.write_default {
        manager
            .save_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    if let Some(path) = &args.config {
        manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    }

    if args.manifest {
        println!("{}", serde_json::to_string_pretty(&manager.get().manifest())?);
        return Ok(());
    }

    let request = match &args.request {
        Some(path) => RequestLoader::load_json(path)
            .with_context(|| format!("Failed to load request from {}", path.display()))?,
        None => ConfigBridge::to_search_request(&manager.get()),
    };

    let mut history = SolutionHistory::default();

    for run in 0..args.runs {
        let mut run_request = request.clone();
        if let Some(seed) = request.seed {
            run_request.seed = Some(seed.wrapping_add(run as u64));
        }

        let runner = SearchRunner::start(run_request).context("Search could not start")?;
        while let Some(message) = runner.wait_progress() {
            if args.json {
                println!("{}", encode_message(&message, runner.catalog())?);
            } else if let ProgressMessage::Generation { generation, best } = &message {
                info!("Generation {}: best fitness {}", generation, best.fitness());
            }
        }

        let outcome = runner.join().context("Search did not finish")?;
        if !args.json {
            print_report(&outcome);
        }
        if !history.try_add(outcome) {
            info!("Run {} repeated an earlier solution", run + 1);
        }
    }

    if args.runs > 1 && !args.json {
        println!("\nDistinct solutions: {}", history.len());
        for (i, solution) in history.iter().enumerate() {
            let shares: Vec<String> = solution
                .share_counts()
                .iter()
                .map(|(name, count)| format!("{}: {}", name, count))
                .collect();
            println!(
                "  {}. {} | left over {} (found {})",
                i + 1,
                shares.join(", "),
                solution.left_over().round_dp(2),
                solution.recorded_at.format("%H:%M:%S")
            );
        }
    }

    Ok(())
}

fn print_report(outcome: &SearchOutcome) {
    println!(
        "\nBest strategy after {} generations (fitness {})",
        outcome.generation,
        outcome.best.fitness()
    );
    println!(
        "{:<24} {:>9} {:>10} {:>8} {:>13} {:>12}",
        "Asset", "Target %", "Current %", "Shares", "Rebalanced %", "Investment"
    );
    for row in &outcome.stats.stats {
        println!(
            "{:<24} {:>9} {:>10} {:>8} {:>13} {:>12}",
            row.asset_name,
            row.target_percentage.round_dp(2),
            row.current_percentage.round_dp(2),
            row.shares_count,
            row.rebalanced_percentage.round_dp(2),
            row.projected_investment.round_dp(2)
        );
    }
    println!(
        "Total investment {} of {}",
        outcome.stats.total_projected_investment.round_dp(2),
        outcome.investment_limit
    );
}
