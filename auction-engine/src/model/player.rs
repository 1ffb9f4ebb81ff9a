// Player records and playing roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing roles used for squad composition checks and balance scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
    Wicketkeeper,
}

impl PlayerRole {
    /// All roles in a fixed, deterministic order.
    pub const ALL: [PlayerRole; 4] = [
        PlayerRole::Batsman,
        PlayerRole::Bowler,
        PlayerRole::AllRounder,
        PlayerRole::Wicketkeeper,
    ];

    /// Parse a role string into a PlayerRole.
    ///
    /// Handles the common spellings and abbreviations found in player files:
    /// - "BATSMAN"/"BAT" -> Batsman
    /// - "BOWLER"/"BOWL" -> Bowler
    /// - "ALL_ROUNDER"/"ALL-ROUNDER"/"AR" -> AllRounder
    /// - "WICKETKEEPER"/"WICKET_KEEPER"/"WK" -> Wicketkeeper
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "BATSMAN" | "BAT" => Some(PlayerRole::Batsman),
            "BOWLER" | "BOWL" => Some(PlayerRole::Bowler),
            "ALL_ROUNDER" | "ALLROUNDER" | "AR" => Some(PlayerRole::AllRounder),
            "WICKETKEEPER" | "WICKET_KEEPER" | "WK" => Some(PlayerRole::Wicketkeeper),
            _ => None,
        }
    }

    /// Return the display string for this role.
    pub fn display_str(&self) -> &'static str {
        match self {
            PlayerRole::Batsman => "Batsman",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-rounder",
            PlayerRole::Wicketkeeper => "Wicketkeeper",
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A player available for auction.
///
/// Created once per pool build and never mutated afterwards. The tier name
/// and base price are stamped on at load time from the tier table so that
/// downstream consumers don't have to re-resolve them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: PlayerRole,
    /// Batting hand/style (e.g., "right-hand bat"), when known.
    #[serde(default)]
    pub batting_style: Option<String>,
    /// Bowling style (e.g., "leg-spin"), when known.
    #[serde(default)]
    pub bowling_style: Option<String>,
    /// Name of the tier the player belongs to.
    pub tier: String,
    /// Minimum legal bid, inherited from the tier.
    pub base_price: u32,
}
