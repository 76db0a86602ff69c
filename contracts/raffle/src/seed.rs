use cosmwasm_std::{Deps, Env};
use serendipity_common::selection::{beacon_round_at, beacon_seed, block_seed};
use serendipity_common::types::SeedSource;

use crate::error::ContractError;
use crate::msg::OracleQueryMsg;
use crate::state::{OracleConfigResponse, Raffle, StoredBeaconResponse};

/// Rounds between the round published at commit time and the round a draw uses.
pub const BEACON_ROUND_DELAY: u64 = 10;

/// Entropy for one draw, plus the beacon round it came from (if any).
pub struct DrawSeed {
    pub seed: [u8; 32],
    pub beacon_round: Option<u64>,
}

/// Round a beacon-seeded draw committed in this block will use.
///
/// Derived from the oracle's genesis time and period so it lies
/// `BEACON_ROUND_DELAY` rounds past the latest one published at the block
/// time. Sales are over by the time this runs and the round's randomness does
/// not exist yet, so neither buyers nor the caller can know the outcome.
pub fn target_beacon_round(deps: Deps, env: &Env, oracle: &str) -> Result<u64, ContractError> {
    let config: OracleConfigResponse = deps
        .querier
        .query_wasm_smart(oracle, &OracleQueryMsg::Config {})
        .map_err(|e| ContractError::SeedUnavailable {
            reason: format!("oracle config query failed: {}", e),
        })?;

    let published = beacon_round_at(
        config.genesis_time,
        config.period_seconds,
        env.block.time.seconds(),
    )
    .ok_or_else(|| ContractError::SeedUnavailable {
        reason: "oracle reports a zero round period".to_string(),
    })?;

    published
        .checked_add(BEACON_ROUND_DELAY)
        .ok_or(ContractError::Overflow)
}

/// Resolve the seed for drawing `raffle` in the current block.
///
/// `Block` hashes the executing block, which is at or after the raffle's end
/// height by the time a draw is allowed. `Beacon` only accepts the verified
/// beacon of the raffle's committed round; earlier and later rounds play no
/// part.
pub fn draw_seed(deps: Deps, env: &Env, raffle: &Raffle) -> Result<DrawSeed, ContractError> {
    match &raffle.seed_source {
        SeedSource::Block => Ok(DrawSeed {
            seed: block_seed(
                &env.block.chain_id,
                env.block.height,
                env.block.time.nanos(),
                raffle.id,
            ),
            beacon_round: None,
        }),
        SeedSource::Beacon { oracle } => {
            let round = raffle
                .target_beacon_round
                .ok_or_else(|| ContractError::SeedUnavailable {
                    reason: format!("no beacon round committed for raffle {}", raffle.id),
                })?;

            let beacon: Option<StoredBeaconResponse> = deps
                .querier
                .query_wasm_smart(oracle, &OracleQueryMsg::Beacon { round })
                .map_err(|e| ContractError::SeedUnavailable {
                    reason: format!("beacon query failed: {}", e),
                })?;
            let beacon = beacon.ok_or_else(|| ContractError::SeedUnavailable {
                reason: format!("beacon for round {} not stored yet", round),
            })?;

            if !beacon.verified || beacon.randomness.len() != 32 {
                return Err(ContractError::SeedUnavailable {
                    reason: format!("beacon for round {} is not usable", round),
                });
            }

            Ok(DrawSeed {
                seed: beacon_seed(&beacon.randomness, raffle.id),
                beacon_round: Some(round),
            })
        }
    }
}
