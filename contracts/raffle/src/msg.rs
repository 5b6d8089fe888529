use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128, Uint256};

use crate::state::{RaffleConfig, RaffleState, RoundResult};

#[cw_serde]
pub struct InstantiateMsg {
    pub vrf_coordinator: String,
    pub entrance_fee: Uint128,
    pub denom: String,
    pub interval_seconds: u64,
    /// Hex-encoded 32-byte gas lane (64 hex chars)
    pub key_hash: String,
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub request_timeout_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Enter the current round. Attach at least the entrance fee.
    Enter {},
    /// Close the round and request randomness. Anyone can call once
    /// `CheckUpkeep` reports that upkeep is needed.
    PerformUpkeep {},
    /// Randomness callback. VRF coordinator only.
    FulfillRandomWords { request_id: u64, random_word: Uint256 },
    /// Abandon a randomness request that was never answered. Admin only,
    /// once the request timeout has passed.
    ExpireDraw {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(RaffleState)]
    State {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep {},
    /// Entrant of the current round at `index`.
    #[returns(Addr)]
    Player { index: u32 },
    /// Entrants of `round_id` (the current round when omitted), in entry
    /// order. Past rounds stay readable.
    #[returns(PlayersResponse)]
    Players {
        round_id: Option<u64>,
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(RoundResult)]
    Round { round_id: u64 },
    #[returns(RoundHistoryResponse)]
    RoundHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Round a request id was issued for, if any.
    #[returns(Option<u64>)]
    RequestRound { request_id: u64 },
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

#[cw_serde]
pub struct PlayersResponse {
    pub round_id: u64,
    pub players: Vec<Addr>,
}

#[cw_serde]
pub struct RoundHistoryResponse {
    pub rounds: Vec<RoundResult>,
}
