// Simulation engine: a full synthetic closed auction from a single seed.
//
// The run is a fixed phase sequence -- build pool, shuffle order, init
// teams, per-round loop, supplemental fill, score -- with every draw of
// randomness routed through one SeededRng in algorithm-determined order,
// so an identical seed reproduces the run bit for bit.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auction::resolve::{resolve, BidResolution, SealedBid, TeamBudget};
use crate::config::Config;
use crate::model::player::{Player, PlayerRole};
use crate::model::team::{SquadMember, TeamState};
use crate::model::tier::{self, Tier};
use crate::sim::balance::{self, BalanceReport};
use crate::sim::pool;
use crate::sim::rng::SeededRng;
use crate::sim::strategy::{compute_bid, BidContext, CaptainStrategy};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Which phase produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogPhase {
    /// A sealed-bid round from the main loop.
    Auction,
    /// A clearance-price assignment from the supplemental fill pass.
    Fill,
}

/// One resolved round (or fill assignment) in the auction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionLogEntry {
    pub round: usize,
    pub phase: LogPhase,
    pub resolution: BidResolution,
}

/// Final per-team outcome of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    pub team_id: String,
    pub team_name: String,
    pub personality: CaptainStrategy,
    pub squad: Vec<SquadMember>,
    pub total_spent: u32,
    pub budget_remaining: u32,
    /// Players acquired per tier name.
    pub tier_counts: HashMap<String, usize>,
    /// Players acquired per role display name.
    pub role_counts: HashMap<String, usize>,
}

impl TeamResult {
    fn from_team(team: &TeamState) -> Self {
        let mut role_counts = HashMap::new();
        for role in PlayerRole::ALL {
            role_counts.insert(role.display_str().to_string(), team.role_count(role));
        }
        TeamResult {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            personality: team.personality,
            squad: team.squad.clone(),
            total_spent: team.total_spent(),
            budget_remaining: team.budget_remaining,
            tier_counts: team.tier_counts.clone(),
            role_counts,
        }
    }
}

/// Everything a simulation run produces, entirely in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub teams: Vec<TeamResult>,
    pub auction_log: Vec<AuctionLogEntry>,
    /// Players nobody bought, even during the fill pass.
    pub unsold_players: Vec<Player>,
    pub balance: BalanceReport,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs synthetic auctions against a fixed tier/budget configuration.
///
/// The engine is immutable between runs; each `run()` builds fresh team
/// state, so concurrent runs with separate seeds are safe.
pub struct SimulationEngine {
    tiers: Vec<Tier>,
    tier_samples: HashMap<String, usize>,
    source_players: Vec<Player>,
    starting_budget: u32,
    target_squad_size: usize,
    targets_per_tier: usize,
}

impl SimulationEngine {
    pub fn new(config: &Config, source_players: Vec<Player>) -> Self {
        let tier_samples = config
            .tier_specs
            .iter()
            .filter_map(|s| s.sample_count.map(|n| (s.name.clone(), n)))
            .collect();
        SimulationEngine {
            tiers: config.tiers(),
            tier_samples,
            source_players,
            starting_budget: config.auction.starting_budget,
            target_squad_size: config.auction.target_squad_size,
            targets_per_tier: config.simulation.targets_per_tier,
        }
    }

    /// Run one complete auction for the given seed.
    pub fn run(&self, seed: u64) -> SimulationResult {
        let mut rng = SeededRng::new(seed);
        info!(seed, "simulation starting");

        // BuildPool + ShuffleOrder: one shuffle fixes the auction order for
        // the whole run.
        let mut auction_pool = self.build_pool(&mut rng);
        rng.shuffle(&mut auction_pool);
        info!(pool_size = auction_pool.len(), "auction pool built");

        let mut teams = self.init_teams(&auction_pool, &mut rng);

        let (mut auction_log, unsold) = self.run_rounds(&auction_pool, &mut teams, &mut rng);

        let unsold_players = self.supplemental_fill(unsold, &mut teams, &mut auction_log);

        let team_results: Vec<TeamResult> = teams.iter().map(TeamResult::from_team).collect();
        let balance = balance::score(&team_results, &self.tiers, self.target_squad_size);
        info!(
            score = balance.overall_score,
            unsold = unsold_players.len(),
            "simulation finished"
        );

        SimulationResult {
            seed,
            teams: team_results,
            auction_log,
            unsold_players,
            balance,
        }
    }

    /// Sample the configured count from each tier (absent count = whole
    /// tier), in configured tier order.
    fn build_pool(&self, rng: &mut SeededRng) -> Vec<Player> {
        let mut pool = Vec::new();
        for tier in &self.tiers {
            let in_tier = pool::players_in_tier(&self.source_players, &tier.name);
            let picked = match self.tier_samples.get(&tier.name) {
                Some(&count) => rng.sample(&in_tier, count),
                None => in_tier,
            };
            pool.extend(picked);
        }
        pool
    }

    /// One team per personality, equal budgets. Snipers draw their target
    /// lists here, before the first round.
    fn init_teams(&self, auction_pool: &[Player], rng: &mut SeededRng) -> Vec<TeamState> {
        CaptainStrategy::ALL
            .iter()
            .enumerate()
            .map(|(i, &personality)| {
                let mut team = TeamState::new(
                    format!("team_{}", i + 1),
                    personality.team_name().to_string(),
                    personality,
                    self.starting_budget,
                );
                if personality == CaptainStrategy::Sniper {
                    team.targets = self.draw_targets(auction_pool, rng);
                    debug!(targets = ?team.targets, "sniper targets drawn");
                }
                team
            })
            .collect()
    }

    fn draw_targets(&self, auction_pool: &[Player], rng: &mut SeededRng) -> Vec<String> {
        let mut targets = Vec::new();
        for tier in &self.tiers {
            let in_tier: Vec<&Player> = auction_pool
                .iter()
                .filter(|p| p.tier == tier.name)
                .collect();
            let n = self.targets_per_tier.min(in_tier.len());
            targets.extend(rng.sample(&in_tier, n).into_iter().map(|p| p.name.clone()));
        }
        targets
    }

    /// The per-round loop over an immutable pool snapshot. The remaining
    /// pool a captain sees is the untouched tail of the auction order.
    fn run_rounds(
        &self,
        auction_pool: &[Player],
        teams: &mut [TeamState],
        rng: &mut SeededRng,
    ) -> (Vec<AuctionLogEntry>, Vec<Player>) {
        let price_floor = tier::price_floor(&self.tiers);
        let mut log = Vec::with_capacity(auction_pool.len());
        let mut unsold = Vec::new();

        for (idx, player) in auction_pool.iter().enumerate() {
            let (tier_index, player_tier) = self
                .tiers
                .iter()
                .enumerate()
                .find(|(_, t)| t.name == player.tier)
                .unwrap_or_else(|| {
                    panic!(
                        "pool player {} references unknown tier {}",
                        player.name, player.tier
                    )
                });

            // Sealed bids: every captain sees pool and budgets, never the
            // other bids for this round.
            let mut bids = Vec::with_capacity(teams.len());
            {
                let ctx = BidContext {
                    player,
                    tier: player_tier,
                    tier_index,
                    tier_count: self.tiers.len(),
                    remaining_pool: &auction_pool[idx + 1..],
                    teams: &*teams,
                    target_squad_size: self.target_squad_size,
                    price_floor,
                };
                for team in teams.iter() {
                    bids.push(SealedBid {
                        team_id: team.id.clone(),
                        amount: compute_bid(team.personality, team, &ctx, rng),
                    });
                }
            }

            let budgets: Vec<TeamBudget> = teams
                .iter()
                .map(|t| TeamBudget {
                    team_id: t.id.clone(),
                    budget: t.budget_remaining,
                })
                .collect();

            let resolution = resolve(player, &bids, &budgets, rng);
            match &resolution.winning_team_id {
                Some(winner_id) => {
                    let team = teams
                        .iter_mut()
                        .find(|t| &t.id == winner_id)
                        .unwrap_or_else(|| panic!("resolution names unknown team {}", winner_id));
                    team.award(player.clone(), resolution.winning_bid);
                }
                None => unsold.push(player.clone()),
            }

            log.push(AuctionLogEntry {
                round: idx + 1,
                phase: LogPhase::Auction,
                resolution,
            });
        }

        (log, unsold)
    }

    /// Hand leftover unsold players to short squads at the clearance price
    /// (the lowest tier base price), smallest squad first, overriding tier
    /// caps. Terminates when every team is full or nobody can afford the
    /// clearance price or the pool runs dry; a shortfall is data, not an
    /// error.
    fn supplemental_fill(
        &self,
        unsold: Vec<Player>,
        teams: &mut [TeamState],
        log: &mut Vec<AuctionLogEntry>,
    ) -> Vec<Player> {
        let clearance = tier::price_floor(&self.tiers);
        let mut queue: VecDeque<Player> = unsold.into();
        let mut round = log.len();

        loop {
            if queue.is_empty() {
                break;
            }
            let candidate = teams
                .iter()
                .enumerate()
                .filter(|(_, t)| {
                    t.squad_size() < self.target_squad_size && t.budget_remaining >= clearance
                })
                .min_by_key(|&(i, t)| (t.squad_size(), i))
                .map(|(i, _)| i);
            let team_idx = match candidate {
                Some(i) => i,
                None => break,
            };
            let player = match queue.pop_front() {
                Some(p) => p,
                None => break,
            };

            debug!(
                team = %teams[team_idx].id,
                player = %player.name,
                price = clearance,
                "fill assignment"
            );
            teams[team_idx].award(player.clone(), clearance);
            round += 1;
            log.push(AuctionLogEntry {
                round,
                phase: LogPhase::Fill,
                resolution: BidResolution {
                    player,
                    winning_team_id: Some(teams[team_idx].id.clone()),
                    winning_bid: clearance,
                    bids: Vec::new(),
                },
            });
        }

        queue.into_iter().collect()
    }
}
