// Simulation harness entry point.
//
// Startup sequence:
// 1. Parse CLI arguments (--config, --seed, --json)
// 2. Initialize tracing (stderr; stdout carries the report)
// 3. Load config and the source player pool
// 4. Run the simulation for the chosen seed
// 5. Print the balance report; optionally dump the full result as JSON

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use auction_engine::config::{self, Config};
use auction_engine::sim::engine::{SimulationEngine, SimulationResult};
use auction_engine::sim::pool;

struct CliArgs {
    config_path: PathBuf,
    seed: Option<u64>,
    json_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    init_tracing();

    let config = config::load_config_from(&args.config_path)
        .context("failed to load configuration")?;
    info!(
        "Config loaded: {}, budget {}, target squad size {}",
        config.auction.name, config.auction.starting_budget, config.auction.target_squad_size
    );

    let players = pool::load_players(Path::new(&config.data.players), &config.tiers())
        .context("failed to load player pool")?;

    let seed = args
        .seed
        .or(config.simulation.default_seed)
        .unwrap_or(42);

    let engine = SimulationEngine::new(&config, players);
    let result = engine.run(seed);

    print_report(&result, &config);

    if let Some(path) = &args.json_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result).context("failed to write JSON result")?;
        info!("Full result written to {}", path.display());
    }

    Ok(())
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = CliArgs {
        config_path: PathBuf::from("config/auction.toml"),
        seed: None,
        json_path: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().context("--config requires a path")?;
                args.config_path = PathBuf::from(value);
            }
            "--seed" => {
                let value = iter.next().context("--seed requires an integer")?;
                args.seed = Some(value.parse().context("--seed must be an integer")?);
            }
            "--json" => {
                let value = iter.next().context("--json requires a path")?;
                args.json_path = Some(PathBuf::from(value));
            }
            other => anyhow::bail!(
                "unknown argument `{}` (usage: gavel [--config <path>] [--seed <n>] [--json <path>])",
                other
            ),
        }
    }
    Ok(args)
}

/// Log to stderr so stdout carries only the report.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("auction_engine=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_report(result: &SimulationResult, config: &Config) {
    let balance = &result.balance;

    println!("=== Balance Report (seed {}) ===", result.seed);
    println!("Overall score: {:.1} / 100", balance.overall_score);
    println!("  Player-count balance:  {:>5.1}", balance.player_count_score);
    println!("  Top-tier distribution: {:>5.1}", balance.top_tier_score);
    println!("  Spend balance:         {:>5.1}", balance.spend_score);
    println!("  Role coverage:         {:>5.1}", balance.role_balance_score);
    println!();

    println!(
        "{:<16} {:>5} {:>7} {:>10}",
        "Team", "Squad", "Spent", "Remaining"
    );
    for team in &result.teams {
        println!(
            "{:<16} {:>5} {:>7} {:>10}",
            team.team_name,
            team.squad.len(),
            team.total_spent,
            team.budget_remaining
        );
    }
    println!();

    println!("Tier distribution (per team):");
    for tier in config.tiers() {
        if let Some(counts) = balance.tier_distribution.get(&tier.name) {
            let rendered: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
            println!("  {:<10} {}", tier.display_name, rendered.join(" / "));
        }
    }
    println!();

    if !result.unsold_players.is_empty() {
        let names: Vec<&str> = result
            .unsold_players
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        println!("Unsold players: {}", names.join(", "));
        println!();
    }

    println!("Recommendations:");
    for note in &balance.recommendations {
        println!("  - {}", note);
    }
}
