use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Item, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serendipity_common::types::{RaffleStatus, SeedSource};

pub const CONFIG: Item<Config> = Item::new("config");
pub const COUNTER: Item<u128> = Item::new("counter");
/// Id handed to the next raffle. Only `create_raffle` writes it.
pub const NEXT_RAFFLE_ID: Item<u64> = Item::new("next_raffle_id");
pub const RAFFLES: Map<u64, Raffle> = Map::new("raffles");
/// One entry per purchase, keyed by (raffle_id, first ticket index).
pub const TICKET_RANGES: Map<(u64, u64), TicketRange> = Map::new("ticket_ranges");
/// Tickets held per participant, per raffle.
pub const PARTICIPANT_TICKETS: Map<(u64, &Addr), u64> = Map::new("participant_tickets");
pub const STATS: Item<RaffleStats> = Item::new("stats");

pub const DEFAULT_MAX_TITLE_LENGTH: u32 = 100;
pub const MAX_TITLE_LENGTH_CAP: u32 = 256;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Settlement denom for newly created raffles
    pub denom: String,
    pub max_title_length: u32,
    pub seed_source: SeedSource,
}

#[cw_serde]
pub struct Raffle {
    pub id: u64,
    pub creator: Addr,
    pub title: String,
    pub ticket_price: Uint128,
    /// Captured from config at creation
    pub denom: String,
    pub start_height: u64,
    pub end_height: u64,
    pub ticket_count: u64,
    /// Always `ticket_count * ticket_price`
    pub total_pot: Uint128,
    pub status: RaffleStatus,
    pub winner: Option<Addr>,
    pub winning_ticket: Option<u64>,
    pub drawn_at_height: Option<u64>,
    /// Captured from config at creation so the source cannot change under
    /// an open raffle.
    pub seed_source: SeedSource,
    /// Beacon round the draw is bound to. Fixed by the first draw call after
    /// the end height, always a round not yet published at that time.
    pub target_beacon_round: Option<u64>,
}

impl Raffle {
    pub fn is_open_at(&self, height: u64) -> bool {
        self.status == RaffleStatus::Open && height < self.end_height
    }
}

/// Tickets `[start, end)` of a raffle, all owned by `buyer`.
#[cw_serde]
pub struct TicketRange {
    pub buyer: Addr,
    pub start: u64,
    pub end: u64,
}

impl TicketRange {
    pub fn contains(&self, ticket: u64) -> bool {
        ticket >= self.start && ticket < self.end
    }
}

#[cw_serde]
#[derive(Default)]
pub struct RaffleStats {
    pub total_raffles_drawn: u64,
    pub total_tickets_sold: u64,
}

/// Owner of `ticket`: the buyer of the last range starting at or before it.
pub fn ticket_owner(
    storage: &dyn Storage,
    raffle_id: u64,
    ticket: u64,
) -> StdResult<Option<Addr>> {
    let range = TICKET_RANGES
        .prefix(raffle_id)
        .range(
            storage,
            None,
            Some(Bound::inclusive(ticket)),
            Order::Descending,
        )
        .next()
        .transpose()?;
    Ok(range.and_then(|(_, r)| r.contains(ticket).then_some(r.buyer)))
}

/// Subset of the beacon contract's `StoredBeacon`. Unknown fields are
/// ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct StoredBeaconResponse {
    pub round: u64,
    pub randomness: Vec<u8>,
    pub verified: bool,
}

/// Subset of the beacon contract's `OracleConfig`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct OracleConfigResponse {
    /// Unix seconds at which round 1 was published
    pub genesis_time: u64,
    pub period_seconds: u64,
}
