// Captain bidding personalities.
//
// Each personality computes a sealed bid for its team given the player on
// the block and the public auction state: remaining pool composition and
// every team's budget and squad are visible, other teams' bids for the
// current round are not. Personalities are a closed set dispatched through
// a single match so each one stays independently testable.

use serde::{Deserialize, Serialize};

use crate::auction::reserve::max_allowable_bid;
use crate::model::player::Player;
use crate::model::team::TeamState;
use crate::model::tier::Tier;
use crate::sim::rng::SeededRng;

/// The bidding personality assigned to a simulated team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptainStrategy {
    /// Front-loads spend on the top tiers, risking a tight budget late.
    Aggressive,
    /// Moderate premium everywhere for a smooth spend curve.
    Balanced,
    /// Pre-selects targets and bids near-maximum only on those.
    Sniper,
    /// Concedes the top tiers to compete hard on the cheap ones.
    ValueHunter,
}

impl CaptainStrategy {
    /// All personalities in fixed order; the simulation fields one team per
    /// entry.
    pub const ALL: [CaptainStrategy; 4] = [
        CaptainStrategy::Aggressive,
        CaptainStrategy::Balanced,
        CaptainStrategy::Sniper,
        CaptainStrategy::ValueHunter,
    ];

    pub fn display_str(&self) -> &'static str {
        match self {
            CaptainStrategy::Aggressive => "aggressive",
            CaptainStrategy::Balanced => "balanced",
            CaptainStrategy::Sniper => "sniper",
            CaptainStrategy::ValueHunter => "value_hunter",
        }
    }

    /// Display name for the simulated team fielded with this personality.
    pub fn team_name(&self) -> &'static str {
        match self {
            CaptainStrategy::Aggressive => "Aggressive XI",
            CaptainStrategy::Balanced => "Balanced XI",
            CaptainStrategy::Sniper => "Sniper XI",
            CaptainStrategy::ValueHunter => "Value XI",
        }
    }
}

/// Public auction state visible to a bidding captain.
pub struct BidContext<'a> {
    pub player: &'a Player,
    pub tier: &'a Tier,
    /// Index of the player's tier in configured order (0 = most expensive).
    pub tier_index: usize,
    /// Number of configured tiers.
    pub tier_count: usize,
    /// Players still to come under the hammer, in auction order.
    pub remaining_pool: &'a [Player],
    /// All teams, the bidder included. Budgets and squads are public.
    pub teams: &'a [TeamState],
    pub target_squad_size: usize,
    pub price_floor: u32,
}

/// Compute a team's sealed bid for the current player.
///
/// Common gates apply before any personality logic: a full squad or an
/// exhausted tier cap abstains outright, and every computed amount is
/// clamped into `[0, max_allowable_bid]`. An amount that cannot reach the
/// tier base price becomes an abstention, keeping every emitted bid legal.
pub fn compute_bid(
    strategy: CaptainStrategy,
    team: &TeamState,
    ctx: &BidContext,
    rng: &mut SeededRng,
) -> u32 {
    if team.squad_size() >= ctx.target_squad_size {
        return 0;
    }
    if let Some(max) = ctx.tier.max_per_team {
        if team.tier_count(&ctx.tier.name) >= max {
            return 0;
        }
    }

    let cap = max_allowable_bid(
        team.budget_remaining,
        team.squad_size(),
        ctx.target_squad_size,
        ctx.price_floor,
    );

    let desired = match strategy {
        CaptainStrategy::Aggressive => aggressive_bid(ctx, rng),
        CaptainStrategy::Balanced => balanced_bid(ctx),
        CaptainStrategy::Sniper => sniper_bid(team, ctx, cap),
        CaptainStrategy::ValueHunter => value_hunter_bid(ctx),
    };

    clamp_bid(desired, ctx.tier.base_price, cap)
}

fn clamp_bid(desired: u32, base_price: u32, cap: u32) -> u32 {
    let amount = desired.min(cap);
    if amount < base_price {
        0
    } else {
        amount
    }
}

/// Double base on the top tier, 1.5x on the second, base below. The jitter
/// keeps two aggressive-leaning rounds from producing identical bids.
fn aggressive_bid(ctx: &BidContext, rng: &mut SeededRng) -> u32 {
    let base = ctx.tier.base_price;
    match ctx.tier_index {
        0 => base * 2 + rng.next_int(0, base / 4),
        1 => base * 3 / 2 + rng.next_int(0, base / 8),
        _ => base,
    }
}

/// Flat 15% premium over base on every tier.
fn balanced_bid(ctx: &BidContext) -> u32 {
    let base = ctx.tier.base_price;
    base + base * 15 / 100
}

/// Near-maximum (90% of the reserve-capped budget) on pre-selected
/// targets, base price on everyone else.
fn sniper_bid(team: &TeamState, ctx: &BidContext, cap: u32) -> u32 {
    if team.targets.iter().any(|t| t == &ctx.player.name) {
        (cap as u64 * 9 / 10) as u32
    } else {
        ctx.tier.base_price
    }
}

/// Base price on the top two tiers; a 40% premium on the bottom two,
/// raised to 60% once the tier is running out relative to unfilled teams.
fn value_hunter_bid(ctx: &BidContext) -> u32 {
    let base = ctx.tier.base_price;
    let in_bottom_two = ctx.tier_index + 2 >= ctx.tier_count;
    if ctx.tier_index < 2 || !in_bottom_two {
        return base;
    }
    let left_in_tier = ctx
        .remaining_pool
        .iter()
        .filter(|p| p.tier == ctx.tier.name)
        .count();
    let unfilled_teams = ctx
        .teams
        .iter()
        .filter(|t| t.squad_size() < ctx.target_squad_size)
        .count();
    if left_in_tier < unfilled_teams {
        base + base * 60 / 100
    } else {
        base + base * 40 / 100
    }
}
