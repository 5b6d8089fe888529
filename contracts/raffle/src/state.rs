use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128, Uint256};
use cw_storage_plus::{Item, Map};
use raffle_common::types::RaffleStatus;

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const RAFFLE_STATE: Item<RaffleState> = Item::new("raffle_state");

/// Entrants keyed by (round_id, insertion index). Advancing the round id
/// empties the current list without touching old rounds.
pub const ENTRANTS: Map<(u64, u32), Addr> = Map::new("entrants");
pub const ROUNDS: Map<u64, RoundResult> = Map::new("rounds");

/// Every request id ever recorded, mapped to the round it drew for.
pub const REQUEST_ROUNDS: Map<u64, u64> = Map::new("request_rounds");

#[cw_serde]
pub struct RaffleConfig {
    /// Instantiator; the only account that may expire a stuck draw
    pub admin: Addr,
    pub vrf_coordinator: Addr,
    pub entrance_fee: Uint128,
    pub denom: String,
    /// Minimum time between draws (seconds)
    pub interval_seconds: u64,
    /// Gas lane, hex-encoded 32 bytes
    pub key_hash: String,
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    /// How long a randomness request may stay unanswered before the admin can
    /// expire it (seconds)
    pub request_timeout_seconds: u64,
}

#[cw_serde]
pub struct RaffleState {
    pub status: RaffleStatus,
    pub round_id: u64,
    pub num_entrants: u32,
    pub pool: Uint128,
    pub last_draw_time: Timestamp,
    pub pending_request_id: Option<u64>,
    pub requested_at: Option<Timestamp>,
    pub recent_winner: Option<Addr>,
    pub total_rounds_completed: u64,
    pub total_paid_out: Uint128,
}

#[cw_serde]
pub struct RoundResult {
    pub round_id: u64,
    pub request_id: u64,
    pub random_word: Uint256,
    pub winner_index: u32,
    pub winner: Addr,
    pub num_entrants: u32,
    pub payout: Uint128,
    pub completed_at: Timestamp,
}

/// Carried through the payout sub-message so a failed transfer can be
/// reported with the winner and amount.
#[cw_serde]
pub struct PayoutPayload {
    pub round_id: u64,
    pub winner: Addr,
    pub amount: Uint128,
}
