use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use raffle_common::types::RaffleStatus;

use crate::error::ContractError;
use crate::execute::{self, PAYOUT_REPLY_ID, REQUEST_RANDOMNESS_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{RaffleConfig, RaffleState, CONFIG, RAFFLE_STATE};

const CONTRACT_NAME: &str = "crates.io:upkeep-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.entrance_fee.is_zero() {
        return Err(ContractError::InvalidEntranceFee);
    }
    if msg.interval_seconds == 0 {
        return Err(ContractError::InvalidInterval {
            interval_seconds: msg.interval_seconds,
        });
    }
    if msg.denom.is_empty() {
        return Err(ContractError::InvalidDenom);
    }
    execute::validate_request_timeout(msg.request_timeout_seconds)?;
    execute::validate_key_hash(&msg.key_hash)?;

    let config = RaffleConfig {
        admin: info.sender.clone(),
        vrf_coordinator: deps.api.addr_validate(&msg.vrf_coordinator)?,
        entrance_fee: msg.entrance_fee,
        denom: msg.denom,
        interval_seconds: msg.interval_seconds,
        key_hash: msg.key_hash.to_lowercase(),
        subscription_id: msg.subscription_id,
        request_confirmations: msg.request_confirmations,
        callback_gas_limit: msg.callback_gas_limit,
        request_timeout_seconds: msg.request_timeout_seconds,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = RaffleState {
        status: RaffleStatus::Open,
        round_id: 0,
        num_entrants: 0,
        pool: Uint128::zero(),
        last_draw_time: env.block.time,
        pending_request_id: None,
        requested_at: None,
        recent_winner: None,
        total_rounds_completed: 0,
        total_paid_out: Uint128::zero(),
    };
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "upkeep-raffle")
        .add_attribute("vrf_coordinator", config.vrf_coordinator.to_string())
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string())
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Enter {} => execute::enter(deps, env, info),
        ExecuteMsg::PerformUpkeep {} => execute::perform_upkeep(deps, env, info),
        ExecuteMsg::FulfillRandomWords {
            request_id,
            random_word,
        } => execute::fulfill_random_words(deps, env, info, request_id, random_word),
        ExecuteMsg::ExpireDraw {} => execute::expire_draw(deps, env, info),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REQUEST_RANDOMNESS_REPLY_ID => execute::record_randomness_request(deps, env, msg),
        PAYOUT_REPLY_ID => execute::handle_payout_reply(msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::CheckUpkeep {} => query::query_check_upkeep(deps, env),
        QueryMsg::Player { index } => query::query_player(deps, index),
        QueryMsg::Players {
            round_id,
            start_after,
            limit,
        } => query::query_players(deps, round_id, start_after, limit),
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps),
        QueryMsg::Round { round_id } => query::query_round(deps, round_id),
        QueryMsg::RoundHistory { start_after, limit } => {
            query::query_round_history(deps, start_after, limit)
        }
        QueryMsg::RequestRound { request_id } => query::query_request_round(deps, request_id),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::InvalidMigration {
            contract: stored.contract,
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
