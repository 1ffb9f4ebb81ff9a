// Configuration loading and parsing (auction.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::tier::Tier;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// auction.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire auction.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    auction: AuctionSection,
    #[serde(default)]
    simulation: SimulationSection,
    tiers: Vec<TierSpec>,
    data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuctionSection {
    pub name: String,
    /// Starting budget per team, in abstract points.
    pub starting_budget: u32,
    /// Squad size every team must reach by the end of the auction.
    pub target_squad_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
    /// Players a Sniper team pre-selects per tier.
    #[serde(default = "default_targets_per_tier")]
    pub targets_per_tier: usize,
    /// Seed used when the CLI is invoked without one.
    #[serde(default)]
    pub default_seed: Option<u64>,
}

fn default_targets_per_tier() -> usize {
    2
}

impl Default for SimulationSection {
    fn default() -> Self {
        SimulationSection {
            targets_per_tier: default_targets_per_tier(),
            default_seed: None,
        }
    }
}

/// One `[[tiers]]` entry. Tiers must be listed from the most expensive
/// bracket down; the order defines which tiers count as "top" for bidding
/// personalities and balance scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct TierSpec {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub base_price: u32,
    #[serde(default)]
    pub min_per_team: usize,
    #[serde(default)]
    pub max_per_team: Option<usize>,
    /// Players to sample from this tier when building a simulation pool.
    /// Absent means the whole tier enters the pool.
    #[serde(default)]
    pub sample_count: Option<usize>,
}

impl TierSpec {
    pub fn to_tier(&self) -> Tier {
        Tier {
            name: self.name.clone(),
            display_name: self
                .display_name
                .clone()
                .unwrap_or_else(|| self.name.clone()),
            base_price: self.base_price,
            min_per_team: self.min_per_team,
            max_per_team: self.max_per_team,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// CSV file with the source player pool.
    pub players: String,
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub auction: AuctionSection,
    pub simulation: SimulationSection,
    pub tier_specs: Vec<TierSpec>,
    pub data: DataPaths,
}

impl Config {
    /// The tier table in configured (descending base price) order.
    pub fn tiers(&self) -> Vec<Tier> {
        self.tier_specs.iter().map(|s| s.to_tier()).collect()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from the given auction.toml path.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;

    let config = Config {
        auction: file.auction,
        simulation: file.simulation,
        tier_specs: file.tiers,
        data: file.data,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.tier_specs.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "tiers".into(),
            message: "at least one tier is required".into(),
        });
    }

    for spec in &config.tier_specs {
        if spec.base_price == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("tiers.{}.base_price", spec.name),
                message: "base price must be positive".into(),
            });
        }
        if let Some(max) = spec.max_per_team {
            if max < spec.min_per_team {
                return Err(ConfigError::ValidationError {
                    field: format!("tiers.{}.max_per_team", spec.name),
                    message: format!(
                        "max_per_team {} is below min_per_team {}",
                        max, spec.min_per_team
                    ),
                });
            }
        }
    }

    // Tier order defines "top tier" everywhere downstream; enforce it here
    // instead of sorting silently.
    for pair in config.tier_specs.windows(2) {
        if pair[1].base_price > pair[0].base_price {
            return Err(ConfigError::ValidationError {
                field: "tiers".into(),
                message: format!(
                    "tiers must be listed in descending base-price order ({} before {})",
                    pair[0].name, pair[1].name
                ),
            });
        }
    }

    let min_total: usize = config.tier_specs.iter().map(|s| s.min_per_team).sum();
    if min_total > config.auction.target_squad_size {
        return Err(ConfigError::ValidationError {
            field: "tiers".into(),
            message: format!(
                "per-tier minimums add up to {} but the target squad size is {}",
                min_total, config.auction.target_squad_size
            ),
        });
    }

    let floor = config
        .tier_specs
        .iter()
        .map(|s| s.base_price)
        .min()
        .unwrap_or(0);
    let minimum_outlay = floor.saturating_mul(config.auction.target_squad_size as u32);
    if minimum_outlay > config.auction.starting_budget {
        return Err(ConfigError::ValidationError {
            field: "auction.starting_budget".into(),
            message: format!(
                "budget {} cannot fill {} slots at the {} price floor",
                config.auction.starting_budget, config.auction.target_squad_size, floor
            ),
        });
    }

    if config.auction.target_squad_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "auction.target_squad_size".into(),
            message: "target squad size must be positive".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"
        [auction]
        name = "Test Auction"
        starting_budget = 10000
        target_squad_size = 11

        [simulation]
        targets_per_tier = 2

        [data]
        players = "data/players.csv"

        [[tiers]]
        name = "marquee"
        display_name = "Marquee"
        base_price = 1000
        min_per_team = 1
        max_per_team = 3
        sample_count = 6

        [[tiers]]
        name = "emerging"
        base_price = 100
        min_per_team = 2
    "#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        let file: ConfigFile = toml::from_str(text).unwrap();
        let config = Config {
            auction: file.auction,
            simulation: file.simulation,
            tier_specs: file.tiers,
            data: file.data,
        };
        validate(&config).map(|_| config)
    }

    #[test]
    fn good_config_parses_and_validates() {
        let config = parse(GOOD).unwrap();
        assert_eq!(config.auction.starting_budget, 10_000);
        assert_eq!(config.auction.target_squad_size, 11);
        assert_eq!(config.simulation.targets_per_tier, 2);
        assert_eq!(config.tier_specs.len(), 2);

        let tiers = config.tiers();
        assert_eq!(tiers[0].display_name, "Marquee");
        // display_name falls back to the tier name
        assert_eq!(tiers[1].display_name, "emerging");
        assert_eq!(tiers[1].max_per_team, None);
    }

    #[test]
    fn simulation_section_is_optional() {
        let text = GOOD.replace("[simulation]\n        targets_per_tier = 2", "");
        let config = parse(&text).unwrap();
        assert_eq!(config.simulation.targets_per_tier, 2);
        assert_eq!(config.simulation.default_seed, None);
    }

    #[test]
    fn rejects_ascending_tier_order() {
        let text = r#"
            [auction]
            name = "t"
            starting_budget = 10000
            target_squad_size = 11

            [data]
            players = "p.csv"

            [[tiers]]
            name = "emerging"
            base_price = 100

            [[tiers]]
            name = "marquee"
            base_price = 1000
        "#;
        let err = parse(text).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn rejects_zero_base_price() {
        let text = GOOD.replace("base_price = 100\n", "base_price = 0\n");
        assert!(parse(&text).is_err());
    }

    #[test]
    fn rejects_max_below_min() {
        let text = GOOD.replace("max_per_team = 3", "max_per_team = 0");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("max_per_team"));
    }

    #[test]
    fn rejects_tier_minimums_beyond_squad_size() {
        let text = GOOD.replace("min_per_team = 2", "min_per_team = 11");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("minimums"));
    }

    #[test]
    fn rejects_budget_below_minimum_outlay() {
        let text = GOOD.replace("starting_budget = 10000", "starting_budget = 1000");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("price floor"));
    }

    #[test]
    fn missing_file_is_a_typed_error() {
        let err = load_config_from(Path::new("/nonexistent/auction.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
