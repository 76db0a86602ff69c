pub mod selection;
pub mod types;

pub use selection::{beacon_round_at, beacon_seed, block_seed, winning_ticket};
pub use types::{RaffleStatus, SeedSource};
