// Squad balance scoring for simulated auction outcomes.
//
// Turns the final team compositions of a run into a 0-100 fairness score
// with four weighted sub-metrics, plus plain-sentence recommendations a
// downstream UI or CLI prints verbatim.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::player::PlayerRole;
use crate::model::tier::Tier;
use crate::sim::engine::TeamResult;

// Sub-score weights. They sum to 1.0.
const WEIGHT_PLAYER_COUNT: f64 = 0.25;
const WEIGHT_TOP_TIER: f64 = 0.30;
const WEIGHT_SPEND: f64 = 0.25;
const WEIGHT_ROLE_BALANCE: f64 = 0.20;

// Recommendation thresholds.
const TOP_TIER_FLAG: f64 = 60.0;
const SPEND_FLAG: f64 = 60.0;
const PLAYER_COUNT_FLAG: f64 = 70.0;

/// The full fairness report for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Weighted overall score, 0-100.
    pub overall_score: f64,
    /// Deviation of squad sizes from the target, 0-100.
    pub player_count_score: f64,
    /// Evenness of the top two tiers across teams, 0-100.
    pub top_tier_score: f64,
    /// Coefficient-of-variation of total spend, 0-100.
    pub spend_score: f64,
    /// Role coverage across the four playing roles, 0-100.
    pub role_balance_score: f64,
    /// Per-tier player counts, one entry per team in team order.
    pub tier_distribution: HashMap<String, Vec<usize>>,
    /// Total spend per team, in team order.
    pub team_spend: Vec<u32>,
    /// Plain-sentence findings from threshold checks on each sub-score.
    pub recommendations: Vec<String>,
}

/// Score the final team compositions against the tier configuration.
///
/// An all-empty input (e.g., zero total spend by construction) is trivially
/// balanced and short-circuits to a perfect score with a positive message.
pub fn score(teams: &[TeamResult], tiers: &[Tier], target_squad_size: usize) -> BalanceReport {
    let tier_distribution = distribution(teams, tiers);
    let team_spend: Vec<u32> = teams.iter().map(|t| t.total_spent).collect();

    if teams.iter().all(|t| t.squad.is_empty()) {
        return BalanceReport {
            overall_score: 100.0,
            player_count_score: 100.0,
            top_tier_score: 100.0,
            spend_score: 100.0,
            role_balance_score: 100.0,
            tier_distribution,
            team_spend,
            recommendations: vec![
                "All squads are empty; the configuration is trivially balanced.".to_string(),
            ],
        };
    }

    let player_count_score = player_count_score(teams, target_squad_size);
    let top_tier_score = top_tier_score(teams, tiers, &tier_distribution);
    let spend_score = spend_score(&team_spend);
    let role_balance_score = role_balance_score(teams);

    let overall_score = WEIGHT_PLAYER_COUNT * player_count_score
        + WEIGHT_TOP_TIER * top_tier_score
        + WEIGHT_SPEND * spend_score
        + WEIGHT_ROLE_BALANCE * role_balance_score;

    let recommendations = recommendations(
        teams,
        tiers,
        player_count_score,
        top_tier_score,
        spend_score,
    );

    BalanceReport {
        overall_score,
        player_count_score,
        top_tier_score,
        spend_score,
        role_balance_score,
        tier_distribution,
        team_spend,
        recommendations,
    }
}

fn distribution(teams: &[TeamResult], tiers: &[Tier]) -> HashMap<String, Vec<usize>> {
    tiers
        .iter()
        .map(|tier| {
            let counts = teams
                .iter()
                .map(|t| t.tier_counts.get(&tier.name).copied().unwrap_or(0))
                .collect();
            (tier.name.clone(), counts)
        })
        .collect()
}

/// Average deviation of squad sizes from the target, normalized by the
/// worst case (an empty squad).
fn player_count_score(teams: &[TeamResult], target_squad_size: usize) -> f64 {
    if teams.is_empty() || target_squad_size == 0 {
        return 100.0;
    }
    let avg_deviation: f64 = teams
        .iter()
        .map(|t| (t.squad.len() as f64 - target_squad_size as f64).abs())
        .sum::<f64>()
        / teams.len() as f64;
    (100.0 * (1.0 - avg_deviation / target_squad_size as f64)).clamp(0.0, 100.0)
}

/// How evenly the top two tiers are spread versus a perfectly even split,
/// averaged across those tiers.
fn top_tier_score(
    teams: &[TeamResult],
    tiers: &[Tier],
    tier_distribution: &HashMap<String, Vec<usize>>,
) -> f64 {
    let n = teams.len();
    if n <= 1 {
        return 100.0;
    }
    let top_tiers: Vec<&Tier> = tiers.iter().take(2).collect();
    if top_tiers.is_empty() {
        return 100.0;
    }

    let per_tier: Vec<f64> = top_tiers
        .iter()
        .map(|tier| {
            let counts = &tier_distribution[&tier.name];
            let total: usize = counts.iter().sum();
            if total == 0 {
                return 100.0;
            }
            let even = total as f64 / n as f64;
            let deviation: f64 = counts.iter().map(|&c| (c as f64 - even).abs()).sum();
            // Worst case: one team holds the whole tier.
            let worst = 2.0 * total as f64 * (n - 1) as f64 / n as f64;
            (100.0 * (1.0 - deviation / worst)).clamp(0.0, 100.0)
        })
        .collect();

    per_tier.iter().sum::<f64>() / per_tier.len() as f64
}

/// Coefficient of variation of total spend, mapped so that zero variance
/// scores 100 and a relative spread of 50% or more scores 0.
fn spend_score(team_spend: &[u32]) -> f64 {
    if team_spend.is_empty() {
        return 100.0;
    }
    let mean = team_spend.iter().map(|&s| s as f64).sum::<f64>() / team_spend.len() as f64;
    if mean == 0.0 {
        return 100.0;
    }
    let variance = team_spend
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / team_spend.len() as f64;
    let cv = variance.sqrt() / mean;
    (100.0 * (1.0 - cv / 0.5)).clamp(0.0, 100.0)
}

/// Per team: 25 points per role with two or more players, 20 for exactly
/// one, nothing for a missing role; averaged over all teams.
fn role_balance_score(teams: &[TeamResult]) -> f64 {
    if teams.is_empty() {
        return 100.0;
    }
    let per_team: Vec<f64> = teams
        .iter()
        .map(|team| {
            PlayerRole::ALL
                .iter()
                .map(|role| {
                    let count = team
                        .role_counts
                        .get(role.display_str())
                        .copied()
                        .unwrap_or(0);
                    match count {
                        0 => 0.0,
                        1 => 20.0,
                        _ => 25.0,
                    }
                })
                .sum()
        })
        .collect();
    per_team.iter().sum::<f64>() / per_team.len() as f64
}

fn recommendations(
    teams: &[TeamResult],
    tiers: &[Tier],
    player_count_score: f64,
    top_tier_score: f64,
    spend_score: f64,
) -> Vec<String> {
    let mut notes = Vec::new();

    for team in teams {
        for role in PlayerRole::ALL {
            let count = team
                .role_counts
                .get(role.display_str())
                .copied()
                .unwrap_or(0);
            if count == 0 {
                notes.push(format!(
                    "{} ended with no {}; consider raising that role's presence in the pool or loosening tier caps.",
                    team.team_name,
                    role.display_str().to_lowercase()
                ));
            }
        }
        for tier in tiers {
            let count = team.tier_counts.get(&tier.name).copied().unwrap_or(0);
            if count < tier.min_per_team {
                notes.push(format!(
                    "{} holds {} {} players, below the configured minimum of {}.",
                    team.team_name, count, tier.display_name, tier.min_per_team
                ));
            }
        }
    }

    if top_tier_score < TOP_TIER_FLAG {
        notes.push(
            "Top-tier players are concentrated on too few teams; consider raising the top-tier base price or tightening its per-team maximum.".to_string(),
        );
    }
    if spend_score < SPEND_FLAG {
        notes.push(
            "Total spend varies widely between teams; consider narrowing the gap between tier base prices.".to_string(),
        );
    }
    if player_count_score < PLAYER_COUNT_FLAG {
        notes.push(
            "Some teams finished well short of the target squad size; consider a larger budget or a lower price floor.".to_string(),
        );
    }

    if notes.is_empty() {
        notes.push(
            "Tier and budget configuration produces balanced squads across all personalities.".to_string(),
        );
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::Player;
    use crate::model::team::SquadMember;
    use crate::sim::strategy::CaptainStrategy;

    fn test_tiers() -> Vec<Tier> {
        ["marquee", "premium", "core", "emerging"]
            .iter()
            .enumerate()
            .map(|(i, name)| Tier {
                name: name.to_string(),
                display_name: name.to_string(),
                base_price: [1000, 600, 300, 100][i],
                min_per_team: 0,
                max_per_team: None,
            })
            .collect()
    }

    fn member(tier: &str, role: PlayerRole, price: u32) -> SquadMember {
        SquadMember {
            player: Player {
                name: "p".into(),
                role,
                batting_style: None,
                bowling_style: None,
                tier: tier.into(),
                base_price: price,
            },
            paid_price: price,
        }
    }

    /// Build a TeamResult from (tier, role, price) triples.
    fn team(name: &str, members: Vec<SquadMember>) -> TeamResult {
        let mut tier_counts: HashMap<String, usize> = HashMap::new();
        let mut role_counts: HashMap<String, usize> = HashMap::new();
        for role in PlayerRole::ALL {
            role_counts.insert(role.display_str().to_string(), 0);
        }
        for m in &members {
            *tier_counts.entry(m.player.tier.clone()).or_insert(0) += 1;
            *role_counts
                .entry(m.player.role.display_str().to_string())
                .or_insert(0) += 1;
        }
        TeamResult {
            team_id: name.to_lowercase().replace(' ', "_"),
            team_name: name.to_string(),
            personality: CaptainStrategy::Balanced,
            total_spent: members.iter().map(|m| m.paid_price).sum(),
            budget_remaining: 0,
            squad: members,
            tier_counts,
            role_counts,
        }
    }

    /// Four teams holding the top tier in the given counts, padded with
    /// identical emerging players so only the top-tier spread differs.
    fn teams_with_marquee_split(split: [usize; 4]) -> Vec<TeamResult> {
        split
            .iter()
            .enumerate()
            .map(|(i, &marquee)| {
                let mut members: Vec<SquadMember> = (0..marquee)
                    .map(|_| member("marquee", PlayerRole::Batsman, 1000))
                    .collect();
                while members.len() < 6 {
                    members.push(member("emerging", PlayerRole::Bowler, 100));
                }
                team(&format!("Team {}", i + 1), members)
            })
            .collect()
    }

    #[test]
    fn all_empty_is_perfectly_balanced() {
        let teams = vec![team("Team 1", vec![]), team("Team 2", vec![])];
        let report = score(&teams, &test_tiers(), 11);
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.spend_score, 100.0);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].contains("trivially balanced"));
    }

    #[test]
    fn even_top_tier_beats_skewed() {
        // 2-2-1-1 versus 4-1-1-0 on an otherwise identical input.
        let even = score(&teams_with_marquee_split([2, 2, 1, 1]), &test_tiers(), 6);
        let skewed = score(&teams_with_marquee_split([4, 1, 1, 0]), &test_tiers(), 6);
        assert!(
            even.top_tier_score > skewed.top_tier_score,
            "{} vs {}",
            even.top_tier_score,
            skewed.top_tier_score
        );
    }

    #[test]
    fn equal_squads_score_full_player_count() {
        let members = || {
            vec![
                member("core", PlayerRole::Batsman, 300),
                member("core", PlayerRole::Bowler, 300),
            ]
        };
        let teams = vec![team("A", members()), team("B", members())];
        assert_eq!(player_count_score(&teams, 2), 100.0);
    }

    #[test]
    fn spend_score_drops_with_spread() {
        assert_eq!(spend_score(&[500, 500, 500, 500]), 100.0);
        let uneven = spend_score(&[900, 300, 500, 300]);
        assert!(uneven < 100.0);
        // CV of 50% or more bottoms out.
        assert_eq!(spend_score(&[1000, 0]), 0.0);
    }

    #[test]
    fn zero_spend_scores_full() {
        assert_eq!(spend_score(&[0, 0, 0]), 100.0);
    }

    #[test]
    fn role_points_follow_the_two_one_zero_ladder() {
        let full_cover = team(
            "A",
            vec![
                member("core", PlayerRole::Batsman, 300),
                member("core", PlayerRole::Batsman, 300),
                member("core", PlayerRole::Bowler, 300),
                member("core", PlayerRole::AllRounder, 300),
                member("core", PlayerRole::AllRounder, 300),
                member("core", PlayerRole::Wicketkeeper, 300),
            ],
        );
        // Batsman 2+ (25), Bowler 1 (20), All-rounder 2+ (25), Keeper 1 (20).
        assert_eq!(role_balance_score(&[full_cover]), 90.0);
    }

    #[test]
    fn missing_role_is_flagged_by_team_name() {
        let no_keeper = team(
            "Balanced XI",
            vec![
                member("core", PlayerRole::Batsman, 300),
                member("core", PlayerRole::Bowler, 300),
            ],
        );
        let report = score(&[no_keeper], &test_tiers(), 2);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Balanced XI") && r.contains("wicketkeeper")));
    }

    #[test]
    fn tier_shortfall_is_flagged_against_the_minimum() {
        let mut tiers = test_tiers();
        tiers[2].min_per_team = 2; // core
        let one_core_only = team(
            "Value XI",
            vec![
                member("core", PlayerRole::Batsman, 300),
                member("emerging", PlayerRole::Bowler, 100),
            ],
        );
        let report = score(&[one_core_only], &tiers, 2);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Value XI") && r.contains("below the configured minimum")));
    }

    #[test]
    fn overall_is_the_weighted_sum() {
        let teams = teams_with_marquee_split([2, 2, 1, 1]);
        let report = score(&teams, &test_tiers(), 6);
        let expected = 0.25 * report.player_count_score
            + 0.30 * report.top_tier_score
            + 0.25 * report.spend_score
            + 0.20 * report.role_balance_score;
        assert!((report.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn distribution_lists_every_tier_in_team_order() {
        let teams = teams_with_marquee_split([2, 2, 1, 1]);
        let report = score(&teams, &test_tiers(), 6);
        assert_eq!(report.tier_distribution["marquee"], vec![2, 2, 1, 1]);
        assert_eq!(report.tier_distribution["emerging"], vec![4, 4, 5, 5]);
        assert_eq!(report.tier_distribution["premium"], vec![0, 0, 0, 0]);
    }
}
