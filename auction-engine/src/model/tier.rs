// Tier definitions: price brackets with per-team acquisition bounds.

use serde::{Deserialize, Serialize};

/// A named bracket of players sharing a base price.
///
/// Tiers define the legality constraints for bidding and fill: the base
/// price is the minimum legal bid for any player in the tier, and the
/// per-team counts bound how many players from the tier a team may acquire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    /// Human-facing label for report output.
    pub display_name: String,
    pub base_price: u32,
    /// Minimum players per team the configuration expects from this tier.
    pub min_per_team: usize,
    /// Acquisition cap per team. None means unlimited.
    pub max_per_team: Option<usize>,
}

/// Look up a tier by name.
pub fn find<'a>(tiers: &'a [Tier], name: &str) -> Option<&'a Tier> {
    tiers.iter().find(|t| t.name == name)
}

/// The lowest base price in the configuration.
///
/// This doubles as the clearance price for the supplemental fill pass and
/// as the price floor for mandatory-reserve calculations.
pub fn price_floor(tiers: &[Tier]) -> u32 {
    tiers.iter().map(|t| t.base_price).min().unwrap_or(0)
}
