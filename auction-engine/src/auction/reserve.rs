// Mandatory-reserve bid cap.

/// Compute the maximum amount a team may legally bid on the current player.
///
/// The team must keep enough budget in reserve to fill every remaining
/// mandatory squad slot at the cheapest legal price:
///
/// - `mandatory = max(0, target_squad_size - current_squad_size - 1)` --
///   the `-1` excludes the slot the current bid would fill;
/// - `reserve = mandatory * price_floor`;
/// - result `= max(0, budget_remaining - reserve)`.
///
/// Pure function; clamps to 0 rather than erroring on a short budget.
pub fn max_allowable_bid(
    budget_remaining: u32,
    current_squad_size: usize,
    target_squad_size: usize,
    price_floor: u32,
) -> u32 {
    let mandatory = target_squad_size.saturating_sub(current_squad_size + 1) as u32;
    let reserve = mandatory.saturating_mul(price_floor);
    budget_remaining.saturating_sub(reserve)
}
