// Player pool loading and per-tier grouping.
//
// Reads a plain CSV with name/role/batting_style/bowling_style/tier columns
// and stamps each row with the tier's base price from the configured tier
// table. Unknown roles and tiers are load-time errors, not runtime surprises.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::model::player::{Player, PlayerRole};
use crate::model::tier::{self, Tier};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read player file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unknown role `{role}` for player `{name}`")]
    UnknownRole { name: String, role: String },

    #[error("unknown tier `{tier}` for player `{name}`")]
    UnknownTier { name: String, tier: String },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    name: String,
    role: String,
    #[serde(default)]
    batting_style: String,
    #[serde(default)]
    bowling_style: String,
    tier: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the source player pool from a CSV file.
pub fn load_players(path: &Path, tiers: &[Tier]) -> Result<Vec<Player>, PoolError> {
    let file = std::fs::File::open(path).map_err(|source| PoolError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let players = read_players(file, tiers).map_err(|e| match e {
        // Stamp the path onto bare CSV errors for a usable message.
        ReadError::Csv(source) => PoolError::Csv {
            path: path.display().to_string(),
            source,
        },
        ReadError::Pool(e) => e,
    })?;
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

enum ReadError {
    Csv(csv::Error),
    Pool(PoolError),
}

fn read_players<R: std::io::Read>(reader: R, tiers: &[Tier]) -> Result<Vec<Player>, ReadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut players = Vec::new();

    for row in csv_reader.deserialize() {
        let raw: RawPlayerRow = row.map_err(ReadError::Csv)?;

        let role = PlayerRole::from_str_role(&raw.role).ok_or_else(|| {
            ReadError::Pool(PoolError::UnknownRole {
                name: raw.name.clone(),
                role: raw.role.clone(),
            })
        })?;

        let tier = tier::find(tiers, &raw.tier).ok_or_else(|| {
            ReadError::Pool(PoolError::UnknownTier {
                name: raw.name.clone(),
                tier: raw.tier.clone(),
            })
        })?;

        players.push(Player {
            name: raw.name,
            role,
            batting_style: non_empty(raw.batting_style),
            bowling_style: non_empty(raw.bowling_style),
            tier: tier.name.clone(),
            base_price: tier.base_price,
        });
    }

    Ok(players)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// All players belonging to the given tier, in file order.
pub fn players_in_tier(players: &[Player], tier_name: &str) -> Vec<Player> {
    players
        .iter()
        .filter(|p| p.tier == tier_name)
        .cloned()
        .collect()
}
