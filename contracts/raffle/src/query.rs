use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;

use crate::execute::upkeep_check;
use crate::msg::{PlayersResponse, RoundHistoryResponse};
use crate::state::{CONFIG, ENTRANTS, RAFFLE_STATE, REQUEST_ROUNDS, ROUNDS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_check_upkeep(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&upkeep_check(&config, &state, env.block.time))
}

pub fn query_player(deps: Deps, index: u32) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let player = ENTRANTS.load(deps.storage, (state.round_id, index))?;
    to_json_binary(&player)
}

pub fn query_players(
    deps: Deps,
    round_id: Option<u64>,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let round_id = match round_id {
        Some(round_id) => round_id,
        None => RAFFLE_STATE.load(deps.storage)?.round_id,
    };
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let players: Vec<_> = ENTRANTS
        .prefix(round_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, addr)| addr)
        .collect();

    to_json_binary(&PlayersResponse { round_id, players })
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.recent_winner)
}

pub fn query_round(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    to_json_binary(&round)
}

pub fn query_round_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let rounds: Vec<_> = ROUNDS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, round)| round)
        .collect();

    to_json_binary(&RoundHistoryResponse { rounds })
}

pub fn query_request_round(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let round_id = REQUEST_ROUNDS.may_load(deps.storage, request_id)?;
    to_json_binary(&round_id)
}
