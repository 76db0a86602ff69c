//! Integration tests for the Serendipity raffle contract.
//!
//! These tests exercise the contract entry points directly using
//! `cosmwasm_std::testing` mocks: every step goes through `instantiate` /
//! `execute` / `query` the way a chain would call it, and state is read back
//! through queries only.
//!
//! Run:
//! ```bash
//! cargo test -p serendipity-integration-tests
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, ContractResult, CosmosMsg, Env, OwnedDeps,
    Response, SystemResult, Uint128, WasmQuery,
};
use serendipity_common::selection::{beacon_seed, block_seed, winning_ticket};
use serendipity_common::types::{RaffleStatus, SeedSource};
use serendipity_raffle::contract::{execute, instantiate, query};
use serendipity_raffle::msg::{
    ExecuteMsg, InstantiateMsg, OracleQueryMsg, ParticipantTicketsResponse, QueryMsg,
    RafflesResponse,
};
use serendipity_raffle::state::{OracleConfigResponse, Raffle, RaffleStats, StoredBeaconResponse};
use serendipity_raffle::ContractError;

type Deps = OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>;

const DENOM: &str = "ustx";

// ─── Helpers ───

fn setup(deps: &mut Deps, seed_source: Option<SeedSource>) {
    let deployer = deps.api.addr_make("deployer");
    let msg = InstantiateMsg {
        denom: DENOM.to_string(),
        max_title_length: None,
        seed_source,
    };
    instantiate(deps.as_mut(), mock_env(), message_info(&deployer, &[]), msg).unwrap();
}

fn env_at(height: u64) -> Env {
    let mut env = mock_env();
    env.block.height = height;
    env
}

fn create(deps: &mut Deps, creator: &Addr, price: u128, end_height: u64, height: u64) -> u64 {
    let res = execute(
        deps.as_mut(),
        env_at(height),
        message_info(creator, &[]),
        ExecuteMsg::CreateRaffle {
            title: "Community Raffle".to_string(),
            ticket_price: Uint128::from(price),
            end_height,
        },
    )
    .unwrap();
    from_json(res.data.unwrap()).unwrap()
}

fn buy(
    deps: &mut Deps,
    buyer: &Addr,
    raffle_id: u64,
    count: u64,
    amount: u128,
    height: u64,
) -> Result<Response, ContractError> {
    let msg = if count == 1 {
        ExecuteMsg::BuyTicket { raffle_id }
    } else {
        ExecuteMsg::BuyTickets { raffle_id, count }
    };
    execute(
        deps.as_mut(),
        env_at(height),
        message_info(buyer, &coins(amount, DENOM)),
        msg,
    )
}

fn draw(
    deps: &mut Deps,
    caller: &Addr,
    raffle_id: u64,
    height: u64,
) -> Result<Response, ContractError> {
    execute(
        deps.as_mut(),
        env_at(height),
        message_info(caller, &[]),
        ExecuteMsg::DrawWinner { raffle_id },
    )
}

fn raffle(deps: &Deps, raffle_id: u64) -> Raffle {
    let res = query(deps.as_ref(), mock_env(), QueryMsg::Raffle { raffle_id }).unwrap();
    from_json(res).unwrap()
}

fn ticket_owner(deps: &Deps, raffle_id: u64, ticket: u64) -> Option<Addr> {
    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::TicketOwner { raffle_id, ticket },
    )
    .unwrap();
    from_json(res).unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_raffle_lifecycle() {
    let mut deps = mock_dependencies();
    setup(&mut deps, None);

    let creator = deps.api.addr_make("creator");
    let alice = deps.api.addr_make("alice");
    let bob = deps.api.addr_make("bob");
    let start = mock_env().block.height;
    let price = 100_000u128;

    // 1. Create raffle ending 100 blocks out
    let raffle_id = create(&mut deps, &creator, price, start + 100, start);
    assert_eq!(raffle_id, 0);

    // 2. Alice buys one ticket
    let res = buy(&mut deps, &alice, raffle_id, 1, price, start + 1).unwrap();
    assert_eq!(from_json::<u64>(res.data.unwrap()).unwrap(), 1);
    let r = raffle(&deps, raffle_id);
    assert_eq!(r.ticket_count, 1);
    assert_eq!(r.total_pot, Uint128::from(100_000u128));

    // 3. Bob buys five
    let res = buy(&mut deps, &bob, raffle_id, 5, price * 5, start + 2).unwrap();
    assert_eq!(from_json::<u64>(res.data.unwrap()).unwrap(), 6);
    let r = raffle(&deps, raffle_id);
    assert_eq!(r.ticket_count, 6);
    assert_eq!(r.total_pot, Uint128::from(600_000u128));

    assert_eq!(ticket_owner(&deps, raffle_id, 0), Some(alice.clone()));
    for t in 1..6 {
        assert_eq!(ticket_owner(&deps, raffle_id, t), Some(bob.clone()));
    }

    // 4. Too early to draw
    let err = draw(&mut deps, &creator, raffle_id, start + 99).unwrap_err();
    assert!(matches!(err, ContractError::NotEnded { .. }));

    // 5. Past the end: sales closed, draw allowed
    let err = buy(&mut deps, &alice, raffle_id, 1, price, start + 100).unwrap_err();
    assert!(matches!(err, ContractError::RaffleEnded { .. }));

    let res = draw(&mut deps, &alice, raffle_id, start + 101).unwrap();
    let winner: Addr = from_json(res.data.clone().unwrap()).unwrap();
    assert!(winner == alice || winner == bob);
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(600_000, DENOM),
        })
    );

    let r = raffle(&deps, raffle_id);
    assert_eq!(r.status, RaffleStatus::Closed);
    assert_eq!(r.winner, Some(winner.clone()));
    assert_eq!(r.total_pot, Uint128::from(600_000u128));

    // The winner is exactly the owner of the ticket the block seed points at
    let env = env_at(start + 101);
    let seed = block_seed(
        &env.block.chain_id,
        env.block.height,
        env.block.time.nanos(),
        raffle_id,
    );
    let expected_ticket = winning_ticket(&seed, 6).unwrap();
    assert_eq!(r.winning_ticket, Some(expected_ticket));
    assert_eq!(ticket_owner(&deps, raffle_id, expected_ticket), Some(winner.clone()));

    // 6. Second draw fails, state untouched
    let err = draw(&mut deps, &bob, raffle_id, start + 150).unwrap_err();
    assert!(matches!(err, ContractError::AlreadyDrawn { .. }));
    assert_eq!(err.code(), Some(108));
    assert_eq!(raffle(&deps, raffle_id), r);

    let res = query(deps.as_ref(), mock_env(), QueryMsg::Stats {}).unwrap();
    let stats: RaffleStats = from_json(res).unwrap();
    assert_eq!(stats.total_raffles_drawn, 1);
    assert_eq!(stats.total_tickets_sold, 6);
}

#[test]
fn test_raffles_are_independent() {
    let mut deps = mock_dependencies();
    setup(&mut deps, None);

    let creator = deps.api.addr_make("creator");
    let alice = deps.api.addr_make("alice");
    let bob = deps.api.addr_make("bob");
    let start = mock_env().block.height;

    let first = create(&mut deps, &creator, 10, start + 10, start);
    let second = create(&mut deps, &creator, 25, start + 20, start);
    assert_eq!((first, second), (0, 1));

    buy(&mut deps, &alice, first, 3, 30, start + 1).unwrap();
    buy(&mut deps, &bob, second, 2, 50, start + 1).unwrap();

    // Paying the first raffle's price into the second is rejected
    let err = buy(&mut deps, &alice, second, 1, 10, start + 2).unwrap_err();
    assert!(matches!(err, ContractError::InsufficientFunds { .. }));

    // First raffle closes, second keeps selling
    let res = draw(&mut deps, &creator, first, start + 10).unwrap();
    let winner: Addr = from_json(res.data.unwrap()).unwrap();
    assert_eq!(winner, alice);
    buy(&mut deps, &alice, second, 1, 25, start + 10).unwrap();

    let r = raffle(&deps, second);
    assert_eq!(r.status, RaffleStatus::Open);
    assert_eq!(r.ticket_count, 3);
    assert_eq!(r.total_pot, Uint128::from(75u128));

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Raffles {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let listed: RafflesResponse = from_json(res).unwrap();
    assert_eq!(listed.raffles.len(), 2);
    assert_eq!(listed.raffles[0].status, RaffleStatus::Closed);

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Raffles {
            start_after: Some(0),
            limit: Some(10),
        },
    )
    .unwrap();
    let listed: RafflesResponse = from_json(res).unwrap();
    assert_eq!(listed.raffles.len(), 1);
    assert_eq!(listed.raffles[0].id, 1);

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::ParticipantTickets {
            raffle_id: second,
            address: alice.to_string(),
        },
    )
    .unwrap();
    let held: ParticipantTicketsResponse = from_json(res).unwrap();
    assert_eq!(held.tickets, 1);

    let res = query(deps.as_ref(), mock_env(), QueryMsg::RaffleCount {}).unwrap();
    assert_eq!(from_json::<u64>(res).unwrap(), 2);
}

#[test]
fn test_failed_operations_leave_no_trace() {
    let mut deps = mock_dependencies();
    setup(&mut deps, None);

    let creator = deps.api.addr_make("creator");
    let start = mock_env().block.height;

    let err = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&creator, &[]),
        ExecuteMsg::CreateRaffle {
            title: "Past Raffle".to_string(),
            ticket_price: Uint128::from(100_000u128),
            end_height: start,
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), Some(102));

    let res = query(deps.as_ref(), mock_env(), QueryMsg::RaffleCount {}).unwrap();
    assert_eq!(from_json::<u64>(res).unwrap(), 0);
    assert!(query(deps.as_ref(), mock_env(), QueryMsg::Raffle { raffle_id: 0 }).is_err());

    let raffle_id = create(&mut deps, &creator, 100, start + 5, start);
    let err = buy(&mut deps, &creator, raffle_id, 4, 399, start).unwrap_err();
    assert!(matches!(err, ContractError::InsufficientFunds { .. }));
    let err = draw(&mut deps, &creator, raffle_id, start + 5).unwrap_err();
    assert!(matches!(err, ContractError::NoTickets { .. }));

    let r = raffle(&deps, raffle_id);
    assert_eq!(r.ticket_count, 0);
    assert_eq!(r.status, RaffleStatus::Open);
    assert_eq!(ticket_owner(&deps, raffle_id, 0), None);
}

#[test]
fn test_counter_is_independent_of_raffles() {
    let mut deps = mock_dependencies();
    setup(&mut deps, None);

    let caller = deps.api.addr_make("caller");
    let start = mock_env().block.height;
    let raffle_id = create(&mut deps, &caller, 100, start + 5, start);

    for _ in 0..4 {
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&caller, &[]),
            ExecuteMsg::Increment {},
        )
        .unwrap();
    }
    for _ in 0..4 {
        execute(
            deps.as_mut(),
            mock_env(),
            message_info(&caller, &[]),
            ExecuteMsg::Decrement {},
        )
        .unwrap();
    }
    let err = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&caller, &[]),
        ExecuteMsg::Decrement {},
    )
    .unwrap_err();
    assert_eq!(err.code(), Some(101));

    let res = query(deps.as_ref(), mock_env(), QueryMsg::Counter {}).unwrap();
    assert_eq!(from_json::<u128>(res).unwrap(), 0);
    assert_eq!(raffle(&deps, raffle_id).ticket_count, 0);

    let res = query(deps.as_ref(), mock_env(), QueryMsg::RaffleCount {}).unwrap();
    assert_eq!(from_json::<u64>(res).unwrap(), 1);
}

#[test]
fn test_win_rate_follows_ticket_share() {
    // Alice holds 1 of 6 tickets in every raffle; each raffle is drawn at a
    // different height, so each draw sees a different block seed.
    const RAFFLES: u64 = 600;

    let mut deps = mock_dependencies();
    setup(&mut deps, None);

    let creator = deps.api.addr_make("creator");
    let alice = deps.api.addr_make("alice");
    let bob = deps.api.addr_make("bob");
    let start = mock_env().block.height;

    let mut alice_wins = 0u64;
    for i in 0..RAFFLES {
        let raffle_id = create(&mut deps, &creator, 1, start + 1, start);
        assert_eq!(raffle_id, i);
        buy(&mut deps, &alice, raffle_id, 1, 1, start).unwrap();
        buy(&mut deps, &bob, raffle_id, 5, 5, start).unwrap();

        let res = draw(&mut deps, &creator, raffle_id, start + 1 + i).unwrap();
        let winner: Addr = from_json(res.data.unwrap()).unwrap();
        if winner == alice {
            alice_wins += 1;
        } else {
            assert_eq!(winner, bob);
        }
    }

    // Expected 100, standard deviation ~9
    assert!(
        alice_wins > 50 && alice_wins < 150,
        "alice won {} of {} raffles",
        alice_wins,
        RAFFLES
    );
}

#[test]
fn test_beacon_seeded_draw() {
    let mut deps = mock_dependencies();
    let oracle = deps.api.addr_make("drand_oracle");

    // 3 second rounds, round 1001 published at mock time
    let genesis_time = mock_env().block.time.seconds() - 3_000;
    let latest_round = Arc::new(AtomicU64::new(1_001));
    let round_handle = latest_round.clone();
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            let res = match from_json::<OracleQueryMsg>(msg).unwrap() {
                OracleQueryMsg::Config {} => to_json_binary(&OracleConfigResponse {
                    genesis_time,
                    period_seconds: 3,
                }),
                OracleQueryMsg::Beacon { round } => {
                    let stored = round <= round_handle.load(Ordering::SeqCst);
                    to_json_binary(&stored.then(|| StoredBeaconResponse {
                        round,
                        randomness: vec![round as u8; 32],
                        verified: true,
                    }))
                }
            };
            SystemResult::Ok(ContractResult::Ok(res.unwrap()))
        }
        _ => SystemResult::Err(cosmwasm_std::SystemError::InvalidRequest {
            error: "Only smart queries supported".to_string(),
            request: Default::default(),
        }),
    });

    setup(
        &mut deps,
        Some(SeedSource::Beacon {
            oracle: oracle.to_string(),
        }),
    );

    let creator = deps.api.addr_make("creator");
    let alice = deps.api.addr_make("alice");
    let bob = deps.api.addr_make("bob");
    let start = mock_env().block.height;

    let raffle_id = create(&mut deps, &creator, 50, start + 10, start);
    buy(&mut deps, &alice, raffle_id, 2, 100, start + 1).unwrap();
    buy(&mut deps, &bob, raffle_id, 3, 150, start + 2).unwrap();

    // First call after the end fixes a round that is not out yet
    let res = draw(&mut deps, &creator, raffle_id, start + 10).unwrap();
    let target: u64 = from_json(res.data.unwrap()).unwrap();
    assert_eq!(target, 1_011);
    assert_eq!(raffle(&deps, raffle_id).target_beacon_round, Some(1_011));

    // Beacons keep arriving, but not the committed one yet
    latest_round.store(1_010, Ordering::SeqCst);
    let err = draw(&mut deps, &creator, raffle_id, start + 11).unwrap_err();
    assert!(matches!(err, ContractError::SeedUnavailable { .. }));
    assert_eq!(err.code(), Some(114));
    assert_eq!(raffle(&deps, raffle_id).status, RaffleStatus::Open);

    // Drawing late, with newer rounds around, still uses the committed one
    latest_round.store(1_040, Ordering::SeqCst);
    let res = draw(&mut deps, &creator, raffle_id, start + 30).unwrap();
    let winner: Addr = from_json(res.data.unwrap()).unwrap();

    let seed = beacon_seed(&[1_011u64 as u8; 32], raffle_id);
    let ticket = winning_ticket(&seed, 5).unwrap();
    assert_eq!(ticket_owner(&deps, raffle_id, ticket), Some(winner));
    assert_eq!(raffle(&deps, raffle_id).status, RaffleStatus::Closed);
}
