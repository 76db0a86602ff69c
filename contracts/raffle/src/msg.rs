use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use serendipity_common::types::SeedSource;

use crate::state::{Config, Raffle, RaffleStats};

#[cw_serde]
pub struct InstantiateMsg {
    /// Denom tickets are paid in
    pub denom: String,
    /// Defaults to 100 bytes
    pub max_title_length: Option<u32>,
    /// Defaults to `SeedSource::Block`
    pub seed_source: Option<SeedSource>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a new raffle. Anyone can call.
    CreateRaffle {
        title: String,
        ticket_price: Uint128,
        end_height: u64,
    },
    /// Buy one ticket. Must send exactly `ticket_price`.
    BuyTicket { raffle_id: u64 },
    /// Buy `count` tickets. Must send exactly `ticket_price * count`.
    BuyTickets { raffle_id: u64, count: u64 },
    /// Draw the winner and pay out the pot. Anyone can call once the raffle
    /// has ended. A beacon-seeded raffle takes two calls: the first fixes the
    /// beacon round, the next one draws once that round is stored.
    DrawWinner { raffle_id: u64 },
    Increment {},
    Decrement {},
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        denom: Option<String>,
        max_title_length: Option<u32>,
        seed_source: Option<SeedSource>,
    },
}

/// Grouped parameters for `update_config`.
pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub denom: Option<String>,
    pub max_title_length: Option<u32>,
    pub seed_source: Option<SeedSource>,
}

/// Query messages understood by the beacon contract.
#[cw_serde]
pub enum OracleQueryMsg {
    Config {},
    Beacon { round: u64 },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(u128)]
    Counter {},
    #[returns(Raffle)]
    Raffle { raffle_id: u64 },
    #[returns(RafflesResponse)]
    Raffles {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Number of raffles created so far (also the next id).
    #[returns(u64)]
    RaffleCount {},
    #[returns(Option<Addr>)]
    TicketOwner { raffle_id: u64, ticket: u64 },
    #[returns(ParticipantTicketsResponse)]
    ParticipantTickets { raffle_id: u64, address: String },
    #[returns(RaffleStats)]
    Stats {},
}

#[cw_serde]
pub struct RafflesResponse {
    pub raffles: Vec<Raffle>,
}

#[cw_serde]
pub struct ParticipantTicketsResponse {
    pub raffle_id: u64,
    pub address: String,
    pub tickets: u64,
}
