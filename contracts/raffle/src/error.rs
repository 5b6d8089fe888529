use cosmwasm_std::{ConversionOverflowError, DivideByZeroError, OverflowError, StdError, Uint128};
use raffle_common::types::RaffleStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("must send exactly one coin")]
    InvalidFunds,

    #[error("must send {expected} denom, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("insufficient stake: sent {sent}, entrance fee is {required}")]
    InsufficientStake { sent: Uint128, required: Uint128 },

    #[error("raffle is not open (status: {status})")]
    RoundNotOpen { status: RaffleStatus },

    #[error("upkeep not needed: pool {pool}, entrants {num_entrants}, status {status}")]
    UpkeepNotNeeded {
        pool: Uint128,
        num_entrants: u32,
        status: RaffleStatus,
    },

    #[error("unauthorized callback from {sender}: only the vrf coordinator may fulfill")]
    UnauthorizedCallback { sender: String },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("coordinator returned an invalid request id")]
    InvalidRequestId,

    #[error("request id {request_id} was already used for round {round_id}")]
    DuplicateRequestId { request_id: u64, round_id: u64 },

    #[error("randomness request failed: {reason}")]
    RandomnessRequestFailed { reason: String },

    #[error("payout of {amount} to {winner} failed: {reason}")]
    PayoutFailed {
        winner: String,
        amount: Uint128,
        reason: String,
    },

    #[error("raffle is not calculating a winner")]
    RoundNotCalculating,

    #[error("draw request has not expired yet (deadline: {deadline})")]
    DrawNotExpired { deadline: u64 },

    #[error("cannot migrate from a different contract type: {contract}")]
    InvalidMigration { contract: String },

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },

    #[error("entrance fee must be greater than zero")]
    InvalidEntranceFee,

    #[error("invalid interval: {interval_seconds}s (must be greater than zero)")]
    InvalidInterval { interval_seconds: u64 },

    #[error("invalid request timeout: {value}s (must be between {min} and {max})")]
    InvalidRequestTimeout { value: u64, min: u64, max: u64 },

    #[error("invalid key hash: {reason}")]
    InvalidKeyHash { reason: String },

    #[error("invalid denom: must not be empty")]
    InvalidDenom,
}
