use sha2::{Digest, Sha256};

const BLOCK_SEED_DOMAIN: &[u8] = b"serendipity/block-seed";
const BEACON_SEED_DOMAIN: &[u8] = b"serendipity/beacon-seed";

/// Derive a draw seed from the block the draw executes in.
///
/// `seed = sha256( domain || len(chain_id)_u32_be || chain_id || height_be || time_nanos_be || raffle_id_be )`
///
/// The raffle id is mixed in so two raffles drawn in the same block do not
/// share a seed.
pub fn block_seed(chain_id: &str, height: u64, time_nanos: u64, raffle_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(BLOCK_SEED_DOMAIN);
    hasher.update((chain_id.len() as u32).to_be_bytes());
    hasher.update(chain_id.as_bytes());
    hasher.update(height.to_be_bytes());
    hasher.update(time_nanos.to_be_bytes());
    hasher.update(raffle_id.to_be_bytes());
    hasher.finalize().into()
}

/// Derive a draw seed from verified beacon randomness.
///
/// `seed = sha256( domain || randomness || raffle_id_be )`
pub fn beacon_seed(randomness: &[u8], raffle_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(BEACON_SEED_DOMAIN);
    hasher.update(randomness);
    hasher.update(raffle_id.to_be_bytes());
    hasher.finalize().into()
}

/// Latest round a beacon network has published at unix time `time_seconds`.
///
/// Round 1 is published at `genesis_time` and one more every `period_seconds`.
/// Returns `Some(0)` before genesis and `None` for a zero period.
pub fn beacon_round_at(genesis_time: u64, period_seconds: u64, time_seconds: u64) -> Option<u64> {
    if period_seconds == 0 {
        return None;
    }
    Some(match time_seconds.checked_sub(genesis_time) {
        Some(elapsed) => elapsed / period_seconds + 1,
        None => 0,
    })
}

/// Pick the winning ticket index: `uint128(seed[0..16]) % ticket_count`.
///
/// Every ticket carries the same weight, so an account holding `k` of `n`
/// tickets wins with probability `k / n` (up to the negligible modulo bias of
/// a 128-bit value reduced by a 64-bit count).
///
/// Returns `None` when no tickets were sold.
pub fn winning_ticket(seed: &[u8; 32], ticket_count: u64) -> Option<u64> {
    if ticket_count == 0 {
        return None;
    }
    let mut ticket_bytes = [0u8; 16];
    ticket_bytes.copy_from_slice(&seed[0..16]);
    let raw = u128::from_be_bytes(ticket_bytes);
    Some((raw % ticket_count as u128) as u64)
}
