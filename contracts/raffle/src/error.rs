use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("counter cannot go below zero")]
    Underflow,

    #[error("end block {end_height} must be after current block {current_height}")]
    InvalidBlock {
        end_height: u64,
        current_height: u64,
    },

    #[error("raffle {raffle_id} not found")]
    RaffleNotFound { raffle_id: u64 },

    #[error("raffle {raffle_id} has ended")]
    RaffleEnded { raffle_id: u64 },

    #[error("ticket quantity must be at least 1")]
    InvalidQuantity,

    #[error("raffle {raffle_id} has not ended yet (ends at block {end_height})")]
    NotEnded { raffle_id: u64, end_height: u64 },

    #[error("raffle {raffle_id} has no tickets sold")]
    NoTickets { raffle_id: u64 },

    #[error("raffle {raffle_id} winner already drawn")]
    AlreadyDrawn { raffle_id: u64 },

    #[error("ticket price must be greater than zero")]
    InvalidTicketPrice,

    #[error("invalid title: {reason}")]
    InvalidTitle { reason: String },

    #[error("insufficient funds: need {needed}{denom}, sent {sent}{denom}")]
    InsufficientFunds {
        needed: Uint128,
        sent: Uint128,
        denom: String,
    },

    #[error("invalid funds: {reason}")]
    InvalidFunds { reason: String },

    #[error("this action does not accept funds")]
    UnexpectedFunds,

    #[error("no usable randomness: {reason}")]
    SeedUnavailable { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },
}

impl ContractError {
    /// Stable numeric code for each failure, shared with off-chain observers.
    /// `Std` errors come from the host and carry no code.
    pub fn code(&self) -> Option<u32> {
        let code = match self {
            ContractError::Std(_) => return None,
            ContractError::Overflow => 100,
            ContractError::Underflow => 101,
            ContractError::InvalidBlock { .. } => 102,
            ContractError::RaffleNotFound { .. } => 103,
            ContractError::RaffleEnded { .. } => 104,
            ContractError::InvalidQuantity => 105,
            ContractError::NotEnded { .. } => 106,
            ContractError::NoTickets { .. } => 107,
            ContractError::AlreadyDrawn { .. } => 108,
            ContractError::InvalidTicketPrice => 109,
            ContractError::InvalidTitle { .. } => 110,
            ContractError::InsufficientFunds { .. } => 111,
            ContractError::InvalidFunds { .. } => 112,
            ContractError::UnexpectedFunds => 113,
            ContractError::SeedUnavailable { .. } => 114,
            ContractError::InvalidConfig { .. } => 115,
            ContractError::Unauthorized { .. } => 116,
        };
        Some(code)
    }
}
