// Integration tests for the auction engine.
//
// These tests exercise the full system end-to-end using the library
// crate's public API: configuration loading, pool import, the simulation
// engine with all four personalities, the balance scorer, and the live
// session path, verifying the cross-cutting invariants along the way.

use std::path::Path;

use auction_engine::auction::session::{AuctionEvent, AuctionSession, SessionError};
use auction_engine::config::{self, Config};
use auction_engine::model::player::Player;
use auction_engine::sim::engine::{LogPhase, SimulationEngine, SimulationResult};
use auction_engine::sim::pool;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURE_CONFIG: &str = "tests/fixtures/auction.toml";

fn fixture_config() -> Config {
    config::load_config_from(Path::new(FIXTURE_CONFIG)).expect("fixture config loads")
}

fn fixture_players(config: &Config) -> Vec<Player> {
    pool::load_players(Path::new(&config.data.players), &config.tiers())
        .expect("fixture players load")
}

fn run_fixture(seed: u64) -> SimulationResult {
    let config = fixture_config();
    let players = fixture_players(&config);
    SimulationEngine::new(&config, players).run(seed)
}

// ===========================================================================
// Configuration and pool loading
// ===========================================================================

#[test]
fn fixture_config_loads_and_validates() {
    let config = fixture_config();
    assert_eq!(config.auction.starting_budget, 6_000);
    assert_eq!(config.auction.target_squad_size, 7);
    assert_eq!(config.tier_specs.len(), 4);
    assert_eq!(config.simulation.default_seed, Some(7));

    let tiers = config.tiers();
    assert_eq!(tiers[0].name, "marquee");
    assert_eq!(tiers[0].base_price, 1_000);
    assert_eq!(tiers[3].base_price, 100);
}

#[test]
fn fixture_pool_loads_with_tier_prices() {
    let config = fixture_config();
    let players = fixture_players(&config);
    assert_eq!(players.len(), 32);
    assert!(players
        .iter()
        .filter(|p| p.tier == "marquee")
        .all(|p| p.base_price == 1_000));
    assert_eq!(players.iter().filter(|p| p.tier == "emerging").count(), 10);
}

// ===========================================================================
// Simulation determinism and invariants
// ===========================================================================

#[test]
fn identical_seeds_reproduce_the_run_bit_for_bit() {
    // Two engines built from scratch, same seed: identical winners, prices,
    // order, and report.
    let a = run_fixture(42);
    let b = run_fixture(42);
    assert_eq!(a, b);
}

#[test]
fn result_survives_a_json_round_trip() {
    let result = run_fixture(42);
    let text = serde_json::to_string(&result).unwrap();
    let back: SimulationResult = serde_json::from_str(&text).unwrap();
    assert_eq!(result, back);
}

#[test]
fn no_team_ever_outspends_its_budget() {
    for seed in 0..20 {
        let result = run_fixture(seed);
        for team in &result.teams {
            let paid: u32 = team.squad.iter().map(|m| m.paid_price).sum();
            assert!(paid <= 6_000, "seed {}: {} paid {}", seed, team.team_id, paid);
            assert_eq!(paid, team.total_spent);
            assert_eq!(team.total_spent + team.budget_remaining, 6_000);
        }
    }
}

#[test]
fn every_sold_round_pays_the_top_bid_at_or_above_base() {
    let result = run_fixture(11);
    for entry in &result.auction_log {
        if entry.phase != LogPhase::Auction {
            continue;
        }
        let res = &entry.resolution;
        if res.winning_team_id.is_some() {
            let max_bid = res.bids.iter().map(|b| b.amount).max().unwrap();
            assert_eq!(res.winning_bid, max_bid);
            assert!(res.winning_bid >= res.player.base_price);
        } else {
            assert_eq!(res.winning_bid, 0);
            assert!(res.bids.iter().all(|b| b.amount == 0));
        }
    }
}

#[test]
fn fill_pass_fills_or_has_a_reason_not_to() {
    // After the fill pass each team is full, or the unsold pool is empty,
    // or the team cannot afford the clearance price.
    let clearance = 100;
    for seed in [1u64, 7, 42, 1337] {
        let result = run_fixture(seed);
        for team in &result.teams {
            let full = team.squad.len() == 7;
            let pool_dry = result.unsold_players.is_empty();
            let broke = team.budget_remaining < clearance;
            assert!(
                full || pool_dry || broke,
                "seed {}: {} stuck at {} players with {} left and {} unsold",
                seed,
                team.team_id,
                team.squad.len(),
                team.budget_remaining,
                result.unsold_players.len()
            );
        }
    }
}

#[test]
fn fill_entries_pay_the_clearance_price() {
    for seed in 0..10 {
        let result = run_fixture(seed);
        for entry in &result.auction_log {
            if entry.phase == LogPhase::Fill {
                assert_eq!(entry.resolution.winning_bid, 100);
                assert!(entry.resolution.winning_team_id.is_some());
                assert!(entry.resolution.bids.is_empty());
            }
        }
    }
}

#[test]
fn players_are_conserved_across_squads_and_unsold() {
    let result = run_fixture(3);
    // 4 marquee + 5 premium + 10 core + 10 emerging sampled into the pool.
    let pool_size = 29;
    let squad_total: usize = result.teams.iter().map(|t| t.squad.len()).sum();
    assert_eq!(squad_total + result.unsold_players.len(), pool_size);

    // No player appears twice anywhere.
    let mut names: Vec<&str> = result
        .teams
        .iter()
        .flat_map(|t| t.squad.iter().map(|m| m.player.name.as_str()))
        .chain(result.unsold_players.iter().map(|p| p.name.as_str()))
        .collect();
    names.sort();
    let before = names.len();
    names.dedup();
    assert_eq!(names.len(), before);
}

#[test]
fn balance_report_is_complete() {
    let config = fixture_config();
    let result = run_fixture(42);
    let balance = &result.balance;

    for sub in [
        balance.overall_score,
        balance.player_count_score,
        balance.top_tier_score,
        balance.spend_score,
        balance.role_balance_score,
    ] {
        assert!((0.0..=100.0).contains(&sub), "score {} out of range", sub);
    }
    for tier in config.tiers() {
        let counts = &balance.tier_distribution[&tier.name];
        assert_eq!(counts.len(), result.teams.len());
    }
    assert_eq!(balance.team_spend.len(), result.teams.len());
    assert!(!balance.recommendations.is_empty());
}

// ===========================================================================
// Live session path
// ===========================================================================

#[test]
fn live_session_runs_a_short_auction() {
    let config = fixture_config();
    let players = fixture_players(&config);
    let mut session = AuctionSession::new(
        vec![
            ("team_1".into(), "Chennai Chargers".into()),
            ("team_2".into(), "Mumbai Mavericks".into()),
        ],
        config.auction.starting_budget,
        config.auction.target_squad_size,
        config.tiers(),
        42,
    );

    // Round 1: contested marquee player.
    let marquee = players.iter().find(|p| p.tier == "marquee").unwrap();
    let r1 = session.queue_player(marquee.clone()).unwrap();
    session.open_round(r1).unwrap();
    session.submit_bid(r1, "team_1", 1_400).unwrap();
    session.submit_bid(r1, "team_2", 1_900).unwrap();
    let res1 = session.close_round(r1).unwrap();
    assert_eq!(res1.winning_team_id.as_deref(), Some("team_2"));

    // Round 2: nobody wants the emerging player.
    let emerging = players.iter().find(|p| p.tier == "emerging").unwrap();
    let r2 = session.queue_player(emerging.clone()).unwrap();
    session.open_round(r2).unwrap();
    session.submit_bid(r2, "team_1", 0).unwrap();
    let res2 = session.close_round(r2).unwrap();
    assert!(res2.is_unsold());

    // Budgets reflect exactly one sale.
    assert_eq!(session.team("team_1").unwrap().budget_remaining, 6_000);
    assert_eq!(session.team("team_2").unwrap().budget_remaining, 4_100);
    assert_eq!(session.team("team_2").unwrap().squad_size, 1);

    // The event stream tells the whole story in order.
    let events = session.drain_events();
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            AuctionEvent::RoundQueued { .. } => "queued",
            AuctionEvent::RoundOpened { .. } => "opened",
            AuctionEvent::BidSubmitted { .. } => "bid",
            AuctionEvent::RoundClosed { .. } => "closed",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["queued", "opened", "bid", "bid", "closed", "queued", "opened", "bid", "closed"]
    );
}

#[test]
fn live_session_enforces_the_reserve_cap_as_budget_shrinks() {
    let config = fixture_config();
    let players = fixture_players(&config);
    let marquee: Vec<&Player> = players.iter().filter(|p| p.tier == "marquee").collect();

    let mut session = AuctionSession::new(
        vec![("team_1".into(), "Chennai Chargers".into())],
        config.auction.starting_budget,
        config.auction.target_squad_size,
        config.tiers(),
        1,
    );

    // Empty squad, target 7, floor 100: cap = 6000 - 6*100 = 5400.
    let r1 = session.queue_player(marquee[0].clone()).unwrap();
    session.open_round(r1).unwrap();
    assert!(matches!(
        session.submit_bid(r1, "team_1", 5_401),
        Err(SessionError::BidExceedsReserveCap { max_bid: 5_400, .. })
    ));
    session.submit_bid(r1, "team_1", 5_400).unwrap();
    session.close_round(r1).unwrap();

    // One slot filled at 5400: cap = 600 - 5*100 = 100 < marquee base, so
    // any legal marquee bid is now impossible for this team.
    let r2 = session.queue_player(marquee[1].clone()).unwrap();
    session.open_round(r2).unwrap();
    assert!(matches!(
        session.submit_bid(r2, "team_1", 1_000),
        Err(SessionError::BidExceedsReserveCap { max_bid: 100, .. })
    ));
}
