use cosmwasm_std::{
    coins, to_json_binary, Api, BankMsg, DepsMut, Env, Event, MessageInfo, Response, StdError,
    Uint128,
};
use serendipity_common::selection::winning_ticket;
use serendipity_common::types::{RaffleStatus, SeedSource};

use crate::error::ContractError;
use crate::msg::UpdateConfigParams;
use crate::seed::{draw_seed, target_beacon_round, DrawSeed};
use crate::state::{
    ticket_owner, Raffle, TicketRange, CONFIG, COUNTER, MAX_TITLE_LENGTH_CAP, NEXT_RAFFLE_ID,
    PARTICIPANT_TICKETS, RAFFLES, STATS, TICKET_RANGES,
};

pub fn validate_max_title_length(max_title_length: u32) -> Result<(), ContractError> {
    if max_title_length == 0 || max_title_length > MAX_TITLE_LENGTH_CAP {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "max_title_length must be between 1 and {}, got {}",
                MAX_TITLE_LENGTH_CAP, max_title_length
            ),
        });
    }
    Ok(())
}

pub fn validate_denom(denom: &str) -> Result<(), ContractError> {
    if denom.trim().is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Normalize the oracle address of a beacon seed source.
pub fn validate_seed_source(
    api: &dyn Api,
    source: SeedSource,
) -> Result<SeedSource, ContractError> {
    match source {
        SeedSource::Block => Ok(SeedSource::Block),
        SeedSource::Beacon { oracle } => Ok(SeedSource::Beacon {
            oracle: api.addr_validate(&oracle)?.to_string(),
        }),
    }
}

fn validate_title(title: &str, max_title_length: u32) -> Result<(), ContractError> {
    if title.len() > max_title_length as usize {
        return Err(ContractError::InvalidTitle {
            reason: format!("longer than {} bytes", max_title_length),
        });
    }
    if !title.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Err(ContractError::InvalidTitle {
            reason: "only printable ASCII is allowed".to_string(),
        });
    }
    Ok(())
}

/// Check the funds attached to a purchase: exactly `cost` of `denom`, nothing else.
fn verify_deposit(info: &MessageInfo, denom: &str, cost: Uint128) -> Result<(), ContractError> {
    if let Some(other) = info.funds.iter().find(|c| c.denom != denom) {
        return Err(ContractError::InvalidFunds {
            reason: format!("only {} is accepted, got {}", denom, other.denom),
        });
    }

    let sent = info
        .funds
        .iter()
        .find(|c| c.denom == denom)
        .map(|c| c.amount)
        .unwrap_or(Uint128::zero());

    if sent < cost {
        return Err(ContractError::InsufficientFunds {
            needed: cost,
            sent,
            denom: denom.to_string(),
        });
    }
    if sent > cost {
        return Err(ContractError::InvalidFunds {
            reason: format!("sent {}{}, tickets cost {}{}", sent, denom, cost, denom),
        });
    }
    Ok(())
}

// ── Raffle registry ──

/// Open a new raffle. Anyone can call.
pub fn create_raffle(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    title: String,
    ticket_price: Uint128,
    end_height: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let current_height = env.block.height;

    if !info.funds.is_empty() {
        return Err(ContractError::UnexpectedFunds);
    }
    if end_height <= current_height {
        return Err(ContractError::InvalidBlock {
            end_height,
            current_height,
        });
    }
    if ticket_price.is_zero() {
        return Err(ContractError::InvalidTicketPrice);
    }
    validate_title(&title, config.max_title_length)?;

    let raffle_id = NEXT_RAFFLE_ID.load(deps.storage)?;
    let next_id = raffle_id.checked_add(1).ok_or(ContractError::Overflow)?;

    let raffle = Raffle {
        id: raffle_id,
        creator: info.sender.clone(),
        title: title.clone(),
        ticket_price,
        denom: config.denom.clone(),
        start_height: current_height,
        end_height,
        ticket_count: 0,
        total_pot: Uint128::zero(),
        status: RaffleStatus::Open,
        winner: None,
        winning_ticket: None,
        drawn_at_height: None,
        seed_source: config.seed_source.clone(),
        target_beacon_round: None,
    };
    RAFFLES.save(deps.storage, raffle_id, &raffle)?;
    NEXT_RAFFLE_ID.save(deps.storage, &next_id)?;

    Ok(Response::new()
        .set_data(to_json_binary(&raffle_id)?)
        .add_attribute("action", "create_raffle")
        .add_attribute("raffle_id", raffle_id.to_string())
        .add_attribute("creator", info.sender.to_string())
        .add_event(
            Event::new("raffle-created")
                .add_attribute("raffle-id", raffle_id.to_string())
                .add_attribute("title", title)
                .add_attribute("creator", info.sender.to_string())
                .add_attribute("ticket-price", ticket_price.to_string())
                .add_attribute("end-block", end_height.to_string())
                .add_attribute("current-block", current_height.to_string()),
        ))
}

// ── Ticket ledger ──

/// Buy `count` tickets for the sender. The attached funds are the deposit;
/// they stay in the contract until the draw pays them out.
pub fn buy_tickets(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    raffle_id: u64,
    count: u64,
) -> Result<Response, ContractError> {
    let mut raffle = RAFFLES
        .may_load(deps.storage, raffle_id)?
        .ok_or(ContractError::RaffleNotFound { raffle_id })?;

    if !raffle.is_open_at(env.block.height) {
        return Err(ContractError::RaffleEnded { raffle_id });
    }
    if count == 0 {
        return Err(ContractError::InvalidQuantity);
    }

    let cost = raffle
        .ticket_price
        .checked_mul(Uint128::from(count))
        .map_err(|_| ContractError::Overflow)?;
    verify_deposit(&info, &raffle.denom, cost)?;

    let first_ticket = raffle.ticket_count;
    let ticket_count = first_ticket
        .checked_add(count)
        .ok_or(ContractError::Overflow)?;
    let total_pot = raffle
        .total_pot
        .checked_add(cost)
        .map_err(|_| ContractError::Overflow)?;

    let range = TicketRange {
        buyer: info.sender.clone(),
        start: first_ticket,
        end: ticket_count,
    };
    TICKET_RANGES.save(deps.storage, (raffle_id, first_ticket), &range)?;

    // Bounded by ticket_count, cannot overflow
    let held = PARTICIPANT_TICKETS
        .may_load(deps.storage, (raffle_id, &info.sender))?
        .unwrap_or(0);
    PARTICIPANT_TICKETS.save(deps.storage, (raffle_id, &info.sender), &(held + count))?;

    raffle.ticket_count = ticket_count;
    raffle.total_pot = total_pot;
    RAFFLES.save(deps.storage, raffle_id, &raffle)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_tickets_sold = stats.total_tickets_sold.saturating_add(count);
    STATS.save(deps.storage, &stats)?;

    let action = if count == 1 { "buy_ticket" } else { "buy_tickets" };

    Ok(Response::new()
        .set_data(to_json_binary(&ticket_count)?)
        .add_attribute("action", action)
        .add_attribute("raffle_id", raffle_id.to_string())
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("count", count.to_string())
        .add_event(
            Event::new("funds-deposited")
                .add_attribute("raffle-id", raffle_id.to_string())
                .add_attribute("sender", info.sender.to_string())
                .add_attribute("amount", cost.to_string())
                .add_attribute("denom", raffle.denom.clone()),
        )
        .add_event(
            Event::new("tickets-purchased")
                .add_attribute("raffle-id", raffle_id.to_string())
                .add_attribute("buyer", info.sender.to_string())
                .add_attribute("count", count.to_string())
                .add_attribute("first-ticket", first_ticket.to_string())
                .add_attribute("total-tickets", ticket_count.to_string())
                .add_attribute("total-pot", total_pot.to_string())
                .add_attribute("current-block", env.block.height.to_string()),
        ))
}

// ── Draw engine ──

/// Draw the winner of an ended raffle and pay out the whole pot. Anyone can call.
///
/// 1. Raffle must be Open and at or past its end height, with tickets sold
/// 2. Resolve the seed from the raffle's seed source. A beacon-seeded raffle
///    without a committed round gets one now and the call ends there
/// 3. winning_ticket = uint128(seed[0..16]) % ticket_count
/// 4. Winner = buyer of the range holding winning_ticket
/// 5. Close the raffle and send total_pot to the winner
///
/// The payout is a bank message of the same transaction: if it fails, the
/// status change is reverted with it and the draw can be retried.
pub fn draw_winner(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    raffle_id: u64,
) -> Result<Response, ContractError> {
    let mut raffle = RAFFLES
        .may_load(deps.storage, raffle_id)?
        .ok_or(ContractError::RaffleNotFound { raffle_id })?;

    if raffle.status == RaffleStatus::Closed {
        return Err(ContractError::AlreadyDrawn { raffle_id });
    }
    if env.block.height < raffle.end_height {
        return Err(ContractError::NotEnded {
            raffle_id,
            end_height: raffle.end_height,
        });
    }
    if raffle.ticket_count == 0 {
        return Err(ContractError::NoTickets { raffle_id });
    }

    if raffle.target_beacon_round.is_none() {
        if let SeedSource::Beacon { oracle } = &raffle.seed_source {
            let round = target_beacon_round(deps.as_ref(), &env, oracle)?;
            raffle.target_beacon_round = Some(round);
            RAFFLES.save(deps.storage, raffle_id, &raffle)?;

            return Ok(Response::new()
                .set_data(to_json_binary(&round)?)
                .add_attribute("action", "commit_draw")
                .add_attribute("raffle_id", raffle_id.to_string())
                .add_attribute("drand_round", round.to_string())
                .add_event(
                    Event::new("draw-committed")
                        .add_attribute("raffle-id", raffle_id.to_string())
                        .add_attribute("drand-round", round.to_string())
                        .add_attribute("current-block", env.block.height.to_string()),
                ));
        }
    }

    let DrawSeed { seed, beacon_round } = draw_seed(deps.as_ref(), &env, &raffle)?;
    let ticket = winning_ticket(&seed, raffle.ticket_count)
        .ok_or(ContractError::NoTickets { raffle_id })?;
    let winner = ticket_owner(deps.storage, raffle_id, ticket)?.ok_or_else(|| {
        StdError::generic_err(format!(
            "raffle {} has no owner for ticket {}",
            raffle_id, ticket
        ))
    })?;

    raffle.status = RaffleStatus::Closed;
    raffle.winner = Some(winner.clone());
    raffle.winning_ticket = Some(ticket);
    raffle.drawn_at_height = Some(env.block.height);
    RAFFLES.save(deps.storage, raffle_id, &raffle)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_raffles_drawn += 1;
    STATS.save(deps.storage, &stats)?;

    let payout = BankMsg::Send {
        to_address: winner.to_string(),
        amount: coins(raffle.total_pot.u128(), &raffle.denom),
    };

    let mut event = Event::new("winner-drawn")
        .add_attribute("raffle-id", raffle_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("winning-ticket", ticket.to_string())
        .add_attribute("total-tickets", raffle.ticket_count.to_string())
        .add_attribute("prize", raffle.total_pot.to_string())
        .add_attribute("denom", raffle.denom.clone())
        .add_attribute("seed", hex::encode(seed))
        .add_attribute("current-block", env.block.height.to_string());
    if let Some(round) = beacon_round {
        event = event.add_attribute("drand-round", round.to_string());
    }

    Ok(Response::new()
        .add_message(payout)
        .set_data(to_json_binary(&winner)?)
        .add_attribute("action", "draw_winner")
        .add_attribute("raffle_id", raffle_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("prize", raffle.total_pot.to_string())
        .add_event(event))
}

// ── Counter ──

pub fn increment(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let value = COUNTER
        .load(deps.storage)?
        .checked_add(1)
        .ok_or(ContractError::Overflow)?;
    COUNTER.save(deps.storage, &value)?;

    counter_response("increment", "counter-incremented", value, &env, &info)
}

pub fn decrement(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let value = COUNTER
        .load(deps.storage)?
        .checked_sub(1)
        .ok_or(ContractError::Underflow)?;
    COUNTER.save(deps.storage, &value)?;

    counter_response("decrement", "counter-decremented", value, &env, &info)
}

fn counter_response(
    action: &str,
    event: &str,
    value: u128,
    env: &Env,
    info: &MessageInfo,
) -> Result<Response, ContractError> {
    Ok(Response::new()
        .set_data(to_json_binary(&value)?)
        .add_attribute("action", action)
        .add_attribute("new_value", value.to_string())
        .add_event(
            Event::new(event)
                .add_attribute("caller", info.sender.to_string())
                .add_attribute("new-value", value.to_string())
                .add_attribute("block-height", env.block.height.to_string()),
        ))
}

// ── Admin ──

/// Update configuration. Admin only. Open raffles keep the denom and seed
/// source they were created with.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        denom,
        max_title_length,
        seed_source,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(denom) = denom {
        validate_denom(&denom)?;
        config.denom = denom;
    }
    if let Some(max) = max_title_length {
        validate_max_title_length(max)?;
        config.max_title_length = max;
    }
    if let Some(source) = seed_source {
        config.seed_source = validate_seed_source(deps.api, source)?;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}
