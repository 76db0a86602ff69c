use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{
    Config, RaffleStats, CONFIG, COUNTER, DEFAULT_MAX_TITLE_LENGTH, NEXT_RAFFLE_ID, STATS,
};

const CONTRACT_NAME: &str = "crates.io:serendipity-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_denom(&msg.denom)?;
    let max_title_length = msg.max_title_length.unwrap_or(DEFAULT_MAX_TITLE_LENGTH);
    execute::validate_max_title_length(max_title_length)?;
    let seed_source =
        execute::validate_seed_source(deps.api, msg.seed_source.unwrap_or_default())?;

    let config = Config {
        admin: info.sender.clone(),
        denom: msg.denom,
        max_title_length,
        seed_source,
    };
    CONFIG.save(deps.storage, &config)?;
    COUNTER.save(deps.storage, &0u128)?;
    NEXT_RAFFLE_ID.save(deps.storage, &0u64)?;
    STATS.save(deps.storage, &RaffleStats::default())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "serendipity-raffle")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateRaffle {
            title,
            ticket_price,
            end_height,
        } => execute::create_raffle(deps, env, info, title, ticket_price, end_height),
        ExecuteMsg::BuyTicket { raffle_id } => execute::buy_tickets(deps, env, info, raffle_id, 1),
        ExecuteMsg::BuyTickets { raffle_id, count } => {
            execute::buy_tickets(deps, env, info, raffle_id, count)
        }
        ExecuteMsg::DrawWinner { raffle_id } => execute::draw_winner(deps, env, info, raffle_id),
        ExecuteMsg::Increment {} => execute::increment(deps, env, info),
        ExecuteMsg::Decrement {} => execute::decrement(deps, env, info),
        ExecuteMsg::UpdateConfig {
            admin,
            denom,
            max_title_length,
            seed_source,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                denom,
                max_title_length,
                seed_source,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Counter {} => query::query_counter(deps),
        QueryMsg::Raffle { raffle_id } => query::query_raffle(deps, raffle_id),
        QueryMsg::Raffles { start_after, limit } => {
            query::query_raffles(deps, start_after, limit)
        }
        QueryMsg::RaffleCount {} => query::query_raffle_count(deps),
        QueryMsg::TicketOwner { raffle_id, ticket } => {
            query::query_ticket_owner(deps, raffle_id, ticket)
        }
        QueryMsg::ParticipantTickets { raffle_id, address } => {
            query::query_participant_tickets(deps, raffle_id, address)
        }
        QueryMsg::Stats {} => query::query_stats(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
