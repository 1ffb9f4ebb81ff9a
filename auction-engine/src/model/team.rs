// Team state during one auction or simulation run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerRole};
use crate::sim::strategy::CaptainStrategy;

/// A player on a team's squad together with the price paid for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    pub player: Player,
    pub paid_price: u32,
}

/// The state of a single team over the lifetime of one auction run.
///
/// Budgets are mutated only through `award()`; the original budget is kept
/// immutable for spend reporting. TeamStates are never shared across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    /// Team identifier (e.g., "team_1").
    pub id: String,
    /// Display name of the team.
    pub name: String,
    /// The bidding personality driving this team in simulation.
    pub personality: CaptainStrategy,
    /// Remaining budget.
    pub budget_remaining: u32,
    /// Starting budget, immutable for the lifetime of the run.
    pub original_budget: u32,
    /// Acquired players in acquisition order.
    pub squad: Vec<SquadMember>,
    /// Players acquired per tier name.
    pub tier_counts: HashMap<String, usize>,
    /// Player names a Sniper team has pre-selected. Empty for other
    /// personalities.
    #[serde(default)]
    pub targets: Vec<String>,
}

impl TeamState {
    /// Create a new team with a full budget and an empty squad.
    pub fn new(id: String, name: String, personality: CaptainStrategy, budget: u32) -> Self {
        TeamState {
            id,
            name,
            personality,
            budget_remaining: budget,
            original_budget: budget,
            squad: Vec::new(),
            tier_counts: HashMap::new(),
            targets: Vec::new(),
        }
    }

    /// Current squad size.
    pub fn squad_size(&self) -> usize {
        self.squad.len()
    }

    /// Total paid across the squad. Always equal to
    /// `original_budget - budget_remaining`.
    pub fn total_spent(&self) -> u32 {
        self.squad.iter().map(|m| m.paid_price).sum()
    }

    /// Players acquired from the given tier.
    pub fn tier_count(&self, tier_name: &str) -> usize {
        self.tier_counts.get(tier_name).copied().unwrap_or(0)
    }

    /// Players on the squad with the given role.
    pub fn role_count(&self, role: PlayerRole) -> usize {
        self.squad.iter().filter(|m| m.player.role == role).count()
    }

    /// Award a player to this team at the given price.
    ///
    /// Debits the budget and records the acquisition. A price exceeding the
    /// remaining budget is a caller bug: bids are validated against the
    /// reserve cap before resolution, so this fails loudly.
    pub fn award(&mut self, player: Player, price: u32) {
        assert!(
            price <= self.budget_remaining,
            "team {} awarded {} at {} with only {} remaining",
            self.id,
            player.name,
            price,
            self.budget_remaining
        );
        self.budget_remaining -= price;
        *self.tier_counts.entry(player.tier.clone()).or_insert(0) += 1;
        self.squad.push(SquadMember {
            player,
            paid_price: price,
        });
    }
}
