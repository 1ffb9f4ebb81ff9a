// Sealed-bid round resolution.
//
// Given the frozen set of hidden bids for one player, pick a deterministic
// winner. The tie-break chain is: highest bid, then deepest remaining
// budget, then a uniform pick from the supplied seeded RNG. Randomness
// never enters resolution anywhere else.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::player::Player;
use crate::sim::rng::SeededRng;

/// A hidden per-team bid for the current player. Amount 0 means abstain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBid {
    pub team_id: String,
    pub amount: u32,
}

/// Remaining-budget snapshot supplied by the caller at round close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBudget {
    pub team_id: String,
    pub budget: u32,
}

/// Outcome of resolving one player's round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidResolution {
    pub player: Player,
    /// None means the player went unsold.
    pub winning_team_id: Option<String>,
    pub winning_bid: u32,
    /// All submitted bids, abstains included, retained for audit.
    pub bids: Vec<SealedBid>,
}

impl BidResolution {
    pub fn is_unsold(&self) -> bool {
        self.winning_team_id.is_none()
    }
}

/// Resolve one sealed-bid round.
///
/// Bids with amount 0 are abstentions and never considered. A round with no
/// active bids resolves to unsold -- a normal outcome, not an error. A tied
/// bidder missing from the budget snapshot is a caller bug and fails loudly.
pub fn resolve(
    player: &Player,
    bids: &[SealedBid],
    team_budgets: &[TeamBudget],
    rng: &mut SeededRng,
) -> BidResolution {
    let active: Vec<&SealedBid> = bids.iter().filter(|b| b.amount > 0).collect();

    if active.is_empty() {
        debug!(player = %player.name, "no active bids, unsold");
        return BidResolution {
            player: player.clone(),
            winning_team_id: None,
            winning_bid: 0,
            bids: bids.to_vec(),
        };
    }

    let max_amount = active.iter().map(|b| b.amount).max().unwrap_or(0);
    let top: Vec<&SealedBid> = active
        .into_iter()
        .filter(|b| b.amount == max_amount)
        .collect();

    let winner = if top.len() == 1 {
        top[0]
    } else {
        // Tie-break #1: deepest remaining budget, a proxy for staying power
        // later in the auction.
        let budget_of = |team_id: &str| -> u32 {
            team_budgets
                .iter()
                .find(|t| t.team_id == team_id)
                .map(|t| t.budget)
                .unwrap_or_else(|| panic!("no budget snapshot for team {}", team_id))
        };
        let best_budget = top
            .iter()
            .map(|b| budget_of(&b.team_id))
            .max()
            .unwrap_or(0);
        let deepest: Vec<&SealedBid> = top
            .into_iter()
            .filter(|b| budget_of(&b.team_id) == best_budget)
            .collect();

        if deepest.len() == 1 {
            deepest[0]
        } else {
            // Tie-break #2: uniform seeded pick, the last resort.
            deepest[rng.next_index(deepest.len())]
        }
    };

    debug!(
        player = %player.name,
        winner = %winner.team_id,
        bid = winner.amount,
        "round resolved"
    );

    BidResolution {
        player: player.clone(),
        winning_team_id: Some(winner.team_id.clone()),
        winning_bid: max_amount,
        bids: bids.to_vec(),
    }
}
