use cosmwasm_schema::cw_serde;

/// Lifecycle of a raffle. `Open` accepts purchases until the end height,
/// `Closed` is terminal and only reached through a draw.
#[cw_serde]
pub enum RaffleStatus {
    Open,
    Closed,
}

/// Where a draw takes its 32 bytes of entropy from.
#[cw_serde]
#[derive(Default)]
pub enum SeedSource {
    /// Hash of the block the draw executes in. Cheap, but a block producer
    /// can grind it.
    #[default]
    Block,
    /// A deployed drand beacon contract exposing `Config {}` and
    /// `Beacon { round }` queries.
    Beacon { oracle: String },
}
