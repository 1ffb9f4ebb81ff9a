// Live auction session: player queue, sealed-bid intake, exactly-once close.
//
// One AuctionSession is constructed per auction; there is no global state
// and no callback registration. Persistence, transport, permissions, and
// round timing are the caller's concerns: the session exposes synchronous
// commands and queries plus a drainable event queue the caller owns, and it
// assumes the caller serializes round closure (single-writer semantics).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::auction::reserve::max_allowable_bid;
use crate::auction::resolve::{resolve, BidResolution, SealedBid, TeamBudget};
use crate::model::player::Player;
use crate::model::tier::{self, Tier};
use crate::sim::rng::SeededRng;

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundStatus {
    /// Queued, not yet accepting bids.
    Pending,
    /// Accepting sealed bids.
    Open,
    /// Resolved. Irreversible.
    Closed,
}

/// A single player's trip under the hammer.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub id: u64,
    pub player: Player,
    pub status: RoundStatus,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Deadline advertised to clients. The session never auto-closes; the
    /// caller owns the clock and calls `close_round` itself.
    pub closes_at: Option<DateTime<Utc>>,
    /// Sealed while the round is open; exposed only through counts and the
    /// auctioneer-side `highest_bid()`.
    bids: Vec<SealedBid>,
}

impl Round {
    /// Number of bids submitted so far, abstentions included.
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    /// Highest sealed amount so far. Auctioneer-side only: teams never see
    /// this while the round is open.
    pub fn highest_bid(&self) -> u32 {
        self.bids.iter().map(|b| b.amount).max().unwrap_or(0)
    }

    /// Seconds until the advertised deadline, clamped at zero. None when no
    /// deadline was set.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.closes_at
            .map(|deadline| (deadline - now).num_seconds().max(0))
    }
}

// ---------------------------------------------------------------------------
// Events and errors
// ---------------------------------------------------------------------------

/// Notifications for the session owner, drained via `drain_events()`.
/// Bid amounts stay sealed: submission events carry counts only.
#[derive(Debug, Clone, Serialize)]
pub enum AuctionEvent {
    RoundQueued { round_id: u64, player_name: String },
    RoundOpened { round_id: u64, player_name: String },
    BidSubmitted { round_id: u64, team_id: String, bid_count: usize },
    RoundClosed { round_id: u64, resolution: BidResolution },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("round {0} not found")]
    RoundNotFound(u64),

    #[error("round {0} is not pending")]
    RoundNotPending(u64),

    #[error("round {0} is not open")]
    RoundNotOpen(u64),

    #[error("round {0} is already closed")]
    RoundAlreadyClosed(u64),

    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    #[error("unknown tier `{tier}` for player `{player}`")]
    UnknownTier { player: String, tier: String },

    #[error("bid of {amount} for `{player}` is below the tier base price of {base_price}")]
    BidBelowBasePrice {
        player: String,
        amount: u32,
        base_price: u32,
    },

    #[error("bid of {amount} from `{team_id}` exceeds the reserve-capped maximum of {max_bid}")]
    BidExceedsReserveCap {
        team_id: String,
        amount: u32,
        max_bid: u32,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Live team snapshot tracked by the session across rounds.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTeam {
    pub id: String,
    pub name: String,
    pub budget_remaining: u32,
    pub squad_size: usize,
}

pub struct AuctionSession {
    tiers: Vec<Tier>,
    target_squad_size: usize,
    teams: Vec<SessionTeam>,
    rounds: Vec<Round>,
    events: VecDeque<AuctionEvent>,
    rng: SeededRng,
    next_round_id: u64,
}

impl AuctionSession {
    /// Create a session for the given teams, all starting on the same
    /// budget. The seed feeds only the last-resort tie-break, so a recorded
    /// seed makes a full auction replayable.
    pub fn new(
        teams: Vec<(String, String)>,
        starting_budget: u32,
        target_squad_size: usize,
        tiers: Vec<Tier>,
        seed: u64,
    ) -> Self {
        let teams = teams
            .into_iter()
            .map(|(id, name)| SessionTeam {
                id,
                name,
                budget_remaining: starting_budget,
                squad_size: 0,
            })
            .collect();
        AuctionSession {
            tiers,
            target_squad_size,
            teams,
            rounds: Vec::new(),
            events: VecDeque::new(),
            rng: SeededRng::new(seed),
            next_round_id: 1,
        }
    }

    /// Put a player in the queue. The round starts Pending and accepts no
    /// bids until opened.
    pub fn queue_player(&mut self, player: Player) -> Result<u64, SessionError> {
        if tier::find(&self.tiers, &player.tier).is_none() {
            return Err(SessionError::UnknownTier {
                player: player.name.clone(),
                tier: player.tier.clone(),
            });
        }
        let id = self.next_round_id;
        self.next_round_id += 1;
        self.events.push_back(AuctionEvent::RoundQueued {
            round_id: id,
            player_name: player.name.clone(),
        });
        self.rounds.push(Round {
            id,
            player,
            status: RoundStatus::Pending,
            opened_at: None,
            closed_at: None,
            closes_at: None,
            bids: Vec::new(),
        });
        Ok(id)
    }

    /// Open a pending round for bidding with no advertised deadline.
    pub fn open_round(&mut self, round_id: u64) -> Result<(), SessionError> {
        self.open_round_inner(round_id, None)
    }

    /// Open a pending round and advertise a deadline. Enforcement stays
    /// with the caller.
    pub fn open_round_until(
        &mut self,
        round_id: u64,
        closes_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.open_round_inner(round_id, Some(closes_at))
    }

    fn open_round_inner(
        &mut self,
        round_id: u64,
        closes_at: Option<DateTime<Utc>>,
    ) -> Result<(), SessionError> {
        let idx = self.round_index(round_id)?;
        if self.rounds[idx].status != RoundStatus::Pending {
            return Err(SessionError::RoundNotPending(round_id));
        }
        self.rounds[idx].status = RoundStatus::Open;
        self.rounds[idx].opened_at = Some(Utc::now());
        self.rounds[idx].closes_at = closes_at;
        info!(round_id, player = %self.rounds[idx].player.name, "round opened");
        self.events.push_back(AuctionEvent::RoundOpened {
            round_id,
            player_name: self.rounds[idx].player.name.clone(),
        });
        Ok(())
    }

    /// Submit (or replace) a team's sealed bid for an open round.
    ///
    /// Amount 0 is an explicit abstention and always accepted. A positive
    /// amount must reach the player's tier base price and stay within the
    /// team's reserve-capped maximum.
    pub fn submit_bid(
        &mut self,
        round_id: u64,
        team_id: &str,
        amount: u32,
    ) -> Result<(), SessionError> {
        let idx = self.round_index(round_id)?;
        if self.rounds[idx].status != RoundStatus::Open {
            return Err(SessionError::RoundNotOpen(round_id));
        }
        let team = self
            .teams
            .iter()
            .find(|t| t.id == team_id)
            .ok_or_else(|| SessionError::UnknownTeam(team_id.to_string()))?;

        if amount > 0 {
            let player = &self.rounds[idx].player;
            let player_tier = tier::find(&self.tiers, &player.tier).ok_or_else(|| {
                SessionError::UnknownTier {
                    player: player.name.clone(),
                    tier: player.tier.clone(),
                }
            })?;
            if amount < player_tier.base_price {
                return Err(SessionError::BidBelowBasePrice {
                    player: player.name.clone(),
                    amount,
                    base_price: player_tier.base_price,
                });
            }
            let max_bid = max_allowable_bid(
                team.budget_remaining,
                team.squad_size,
                self.target_squad_size,
                tier::price_floor(&self.tiers),
            );
            if amount > max_bid {
                return Err(SessionError::BidExceedsReserveCap {
                    team_id: team_id.to_string(),
                    amount,
                    max_bid,
                });
            }
        }

        let round = &mut self.rounds[idx];
        match round.bids.iter_mut().find(|b| b.team_id == team_id) {
            Some(existing) => existing.amount = amount,
            None => round.bids.push(SealedBid {
                team_id: team_id.to_string(),
                amount,
            }),
        }
        let bid_count = round.bids.len();
        self.events.push_back(AuctionEvent::BidSubmitted {
            round_id,
            team_id: team_id.to_string(),
            bid_count,
        });
        Ok(())
    }

    /// Freeze the round's bids and resolve it, exactly once.
    ///
    /// The winner's budget is debited and its squad size bumped; the round
    /// moves to Closed and can never be resolved again.
    pub fn close_round(&mut self, round_id: u64) -> Result<BidResolution, SessionError> {
        let idx = self.round_index(round_id)?;
        match self.rounds[idx].status {
            RoundStatus::Closed => return Err(SessionError::RoundAlreadyClosed(round_id)),
            RoundStatus::Pending => return Err(SessionError::RoundNotOpen(round_id)),
            RoundStatus::Open => {}
        }

        let budgets: Vec<TeamBudget> = self
            .teams
            .iter()
            .map(|t| TeamBudget {
                team_id: t.id.clone(),
                budget: t.budget_remaining,
            })
            .collect();

        let resolution = resolve(
            &self.rounds[idx].player,
            &self.rounds[idx].bids,
            &budgets,
            &mut self.rng,
        );

        if let Some(winner_id) = &resolution.winning_team_id {
            let team = self
                .teams
                .iter_mut()
                .find(|t| &t.id == winner_id)
                .unwrap_or_else(|| panic!("resolution names unknown team {}", winner_id));
            team.budget_remaining = team.budget_remaining.saturating_sub(resolution.winning_bid);
            team.squad_size += 1;
        }

        let round = &mut self.rounds[idx];
        round.status = RoundStatus::Closed;
        round.closed_at = Some(Utc::now());
        info!(
            round_id,
            player = %round.player.name,
            winner = resolution.winning_team_id.as_deref().unwrap_or("<unsold>"),
            price = resolution.winning_bid,
            "round closed"
        );

        self.events.push_back(AuctionEvent::RoundClosed {
            round_id,
            resolution: resolution.clone(),
        });
        Ok(resolution)
    }

    // --- Queries ---

    pub fn round(&self, round_id: u64) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == round_id)
    }

    pub fn team(&self, team_id: &str) -> Option<&SessionTeam> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn teams(&self) -> &[SessionTeam] {
        &self.teams
    }

    /// Take ownership of all pending notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<AuctionEvent> {
        self.events.drain(..).collect()
    }

    fn round_index(&self, round_id: u64) -> Result<usize, SessionError> {
        self.rounds
            .iter()
            .position(|r| r.id == round_id)
            .ok_or(SessionError::RoundNotFound(round_id))
    }
}
