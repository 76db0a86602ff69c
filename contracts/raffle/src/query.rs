use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{ParticipantTicketsResponse, RafflesResponse};
use crate::state::{
    ticket_owner, CONFIG, COUNTER, NEXT_RAFFLE_ID, PARTICIPANT_TICKETS, RAFFLES, STATS,
};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_counter(deps: Deps) -> StdResult<Binary> {
    let value = COUNTER.load(deps.storage)?;
    to_json_binary(&value)
}

pub fn query_raffle(deps: Deps, raffle_id: u64) -> StdResult<Binary> {
    let raffle = RAFFLES.load(deps.storage, raffle_id)?;
    to_json_binary(&raffle)
}

pub fn query_raffles(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let raffles = RAFFLES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, raffle)| raffle))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&RafflesResponse { raffles })
}

pub fn query_raffle_count(deps: Deps) -> StdResult<Binary> {
    let count = NEXT_RAFFLE_ID.load(deps.storage)?;
    to_json_binary(&count)
}

pub fn query_ticket_owner(deps: Deps, raffle_id: u64, ticket: u64) -> StdResult<Binary> {
    let owner = ticket_owner(deps.storage, raffle_id, ticket)?;
    to_json_binary(&owner)
}

pub fn query_participant_tickets(
    deps: Deps,
    raffle_id: u64,
    address: String,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let tickets = PARTICIPANT_TICKETS
        .may_load(deps.storage, (raffle_id, &addr))?
        .unwrap_or(0);
    to_json_binary(&ParticipantTicketsResponse {
        raffle_id,
        address,
        tickets,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<Binary> {
    let stats = STATS.load(deps.storage)?;
    to_json_binary(&stats)
}
