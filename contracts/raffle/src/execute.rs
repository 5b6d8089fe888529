use cosmwasm_std::{
    coins, from_json, to_json_binary, BankMsg, DepsMut, Env, Event, MessageInfo, Reply,
    Response, SubMsg, SubMsgResult, Timestamp, Uint128, Uint256, WasmMsg,
};
use raffle_common::types::RaffleStatus;
use raffle_common::vrf::{find_request_id, CoordinatorExecuteMsg};

use crate::error::ContractError;
use crate::msg::CheckUpkeepResponse;
use crate::state::{
    PayoutPayload, RaffleConfig, RaffleState, RoundResult, CONFIG, ENTRANTS, RAFFLE_STATE,
    REQUEST_ROUNDS, ROUNDS,
};

pub const REQUEST_RANDOMNESS_REPLY_ID: u64 = 1;
pub const PAYOUT_REPLY_ID: u64 = 2;

/// One random word decides one winner.
const NUM_WORDS: u32 = 1;

/// Lower bound on how long a randomness request stays open before the admin
/// may expire it. Expiring discards the outstanding word, so a caller who
/// sees a pending fulfilment before it lands could use `ExpireDraw` to force
/// a redraw; only the admin can, and only after this window.
pub const MIN_REQUEST_TIMEOUT_SECONDS: u64 = 300;
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 7 * 24 * 60 * 60;

pub fn validate_request_timeout(seconds: u64) -> Result<(), ContractError> {
    if !(MIN_REQUEST_TIMEOUT_SECONDS..=MAX_REQUEST_TIMEOUT_SECONDS).contains(&seconds) {
        return Err(ContractError::InvalidRequestTimeout {
            value: seconds,
            min: MIN_REQUEST_TIMEOUT_SECONDS,
            max: MAX_REQUEST_TIMEOUT_SECONDS,
        });
    }
    Ok(())
}

pub fn validate_key_hash(key_hash: &str) -> Result<(), ContractError> {
    let bytes = hex::decode(key_hash).map_err(|_| ContractError::InvalidKeyHash {
        reason: "not valid hex".to_string(),
    })?;
    if bytes.len() != 32 {
        return Err(ContractError::InvalidKeyHash {
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        });
    }
    Ok(())
}

/// Evaluate the upkeep predicate at `now`. Shared by the `CheckUpkeep`
/// query and `perform_upkeep`, which re-runs it against its own block.
pub fn upkeep_check(
    config: &RaffleConfig,
    state: &RaffleState,
    now: Timestamp,
) -> CheckUpkeepResponse {
    let is_open = state.status == RaffleStatus::Open;
    let elapsed = now.seconds().saturating_sub(state.last_draw_time.seconds());
    let time_passed = elapsed >= config.interval_seconds;
    let has_balance = !state.pool.is_zero();
    let has_players = state.num_entrants > 0;

    CheckUpkeepResponse {
        upkeep_needed: is_open && time_passed && has_balance && has_players,
        is_open,
        time_passed,
        has_balance,
        has_players,
    }
}

/// `random_word mod num_entrants`.
///
/// The modulo bias of a 256-bit word over realistic entrant counts is
/// accepted; no rejection sampling is done.
pub fn winner_index(random_word: Uint256, num_entrants: u32) -> Result<u32, ContractError> {
    let index = random_word.checked_rem(Uint256::from(num_entrants))?;
    let index = Uint128::try_from(index)?;
    // index < num_entrants, so it fits
    Ok(index.u128() as u32)
}

/// Read the stake attached to an entry. No coin at all counts as a zero
/// stake so it surfaces as `InsufficientStake`.
fn stake_from_funds(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    if info.funds.is_empty() {
        return Ok(Uint128::zero());
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = &info.funds[0];
    if sent.denom != denom {
        return Err(ContractError::WrongDenom {
            expected: denom.to_string(),
            denom: sent.denom.clone(),
        });
    }
    Ok(sent.amount)
}

/// Enter the current round with at least the entrance fee.
///
/// Exactly the fee goes into the pool; anything above it is sent back to the
/// entrant in the same transaction, so `pool == entrance_fee * num_entrants`
/// holds while the round is open.
pub fn enter(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut state = RAFFLE_STATE.load(deps.storage)?;

    // Eligibility is frozen once randomness has been requested
    if state.status != RaffleStatus::Open {
        return Err(ContractError::RoundNotOpen {
            status: state.status,
        });
    }

    let stake = stake_from_funds(&info, &config.denom)?;
    if stake < config.entrance_fee {
        return Err(ContractError::InsufficientStake {
            sent: stake,
            required: config.entrance_fee,
        });
    }
    let refund = stake.checked_sub(config.entrance_fee)?;

    let index = state.num_entrants;
    ENTRANTS.save(deps.storage, (state.round_id, index), &info.sender)?;
    state.num_entrants += 1;
    state.pool += config.entrance_fee;
    RAFFLE_STATE.save(deps.storage, &state)?;

    let mut response = Response::new();
    if !refund.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(refund.u128(), config.denom.clone()),
        });
    }

    Ok(response
        .add_attribute("action", "enter")
        .add_attribute("entrant", info.sender.to_string())
        .add_attribute("amount", config.entrance_fee.to_string())
        .add_attribute("refund", refund.to_string())
        .add_event(
            Event::new("raffle_entry_recorded")
                .add_attribute("round_id", state.round_id.to_string())
                .add_attribute("entrant", info.sender.to_string())
                .add_attribute("amount", config.entrance_fee.to_string())
                .add_attribute("num_entrants", state.num_entrants.to_string())
                .add_attribute("pool", state.pool.to_string()),
        ))
}

/// Close the round and ask the coordinator for randomness. Anyone can call.
///
/// The predicate is evaluated again here; a `CheckUpkeep` result from an
/// earlier block proves nothing. The request id is recorded by the reply to
/// the coordinator sub-message, inside the same transaction.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut state = RAFFLE_STATE.load(deps.storage)?;

    if !upkeep_check(&config, &state, env.block.time).upkeep_needed {
        return Err(ContractError::UpkeepNotNeeded {
            pool: state.pool,
            num_entrants: state.num_entrants,
            status: state.status,
        });
    }

    state.status = RaffleStatus::Calculating;
    state.requested_at = Some(env.block.time);
    RAFFLE_STATE.save(deps.storage, &state)?;

    let request = WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&CoordinatorExecuteMsg::RequestRandomWords {
            key_hash: config.key_hash.clone(),
            sub_id: config.subscription_id,
            request_confirmations: config.request_confirmations,
            callback_gas_limit: config.callback_gas_limit,
            num_words: NUM_WORDS,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(
            request,
            REQUEST_RANDOMNESS_REPLY_ID,
        ))
        .add_attribute("action", "perform_upkeep")
        .add_attribute("round_id", state.round_id.to_string())
        .add_attribute("caller", info.sender.to_string()))
}

/// Record the request id the coordinator issued for the draw.
pub fn record_randomness_request(
    deps: DepsMut,
    _env: Env,
    msg: Reply,
) -> Result<Response, ContractError> {
    let response = msg
        .result
        .into_result()
        .map_err(|reason| ContractError::RandomnessRequestFailed { reason })?;

    let request_id = find_request_id(&response.events)
        .filter(|id| *id != 0)
        .ok_or(ContractError::InvalidRequestId)?;

    if let Some(round_id) = REQUEST_ROUNDS.may_load(deps.storage, request_id)? {
        return Err(ContractError::DuplicateRequestId {
            request_id,
            round_id,
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    if state.status != RaffleStatus::Calculating {
        return Err(ContractError::RoundNotCalculating);
    }
    state.pending_request_id = Some(request_id);
    RAFFLE_STATE.save(deps.storage, &state)?;
    REQUEST_ROUNDS.save(deps.storage, request_id, &state.round_id)?;

    Ok(Response::new()
        .add_attribute("action", "record_randomness_request")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("raffle_draw_requested")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round_id", state.round_id.to_string())
                .add_attribute("num_entrants", state.num_entrants.to_string())
                .add_attribute("pool", state.pool.to_string()),
        ))
}

/// Randomness callback. VRF coordinator only.
///
/// 1. Check the sender and the pending request id
/// 2. winner_index = random_word % num_entrants
/// 3. Close the round: history, winner, counters, status back to Open
/// 4. Send the whole pool to the winner
///
/// The transfer runs after every write above. If it fails, the payout reply
/// returns `PayoutFailed` and the whole fulfilment is reverted, leaving the
/// round Calculating with the same pending request.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_word: Uint256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::UnauthorizedCallback {
            sender: info.sender.to_string(),
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    if state.pending_request_id != Some(request_id) {
        return Err(ContractError::UnknownRequest { request_id });
    }

    let round_id = state.round_id;
    let num_entrants = state.num_entrants;
    let index = winner_index(random_word, num_entrants)?;
    let winner = ENTRANTS.load(deps.storage, (round_id, index))?;
    let payout = state.pool;

    ROUNDS.save(
        deps.storage,
        round_id,
        &RoundResult {
            round_id,
            request_id,
            random_word,
            winner_index: index,
            winner: winner.clone(),
            num_entrants,
            payout,
            completed_at: env.block.time,
        },
    )?;

    state.recent_winner = Some(winner.clone());
    state.round_id += 1;
    state.num_entrants = 0;
    state.pool = Uint128::zero();
    state.last_draw_time = env.block.time;
    state.status = RaffleStatus::Open;
    state.pending_request_id = None;
    state.requested_at = None;
    state.total_rounds_completed += 1;
    state.total_paid_out += payout;
    RAFFLE_STATE.save(deps.storage, &state)?;

    let send = BankMsg::Send {
        to_address: winner.to_string(),
        amount: coins(payout.u128(), config.denom.clone()),
    };
    let payout_msg = SubMsg::reply_on_error(send, PAYOUT_REPLY_ID).with_payload(to_json_binary(
        &PayoutPayload {
            round_id,
            winner: winner.clone(),
            amount: payout,
        },
    )?);

    Ok(Response::new()
        .add_submessage(payout_msg)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("payout", payout.to_string())
        .add_event(
            Event::new("raffle_winner_picked")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("winner", winner.to_string())
                .add_attribute("winner_index", index.to_string())
                .add_attribute("num_entrants", num_entrants.to_string())
                .add_attribute("payout", payout.to_string())
                .add_attribute("denom", config.denom)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Turn a failed winner transfer into a hard error so the fulfilment that
/// scheduled it is rolled back.
pub fn handle_payout_reply(msg: Reply) -> Result<Response, ContractError> {
    match msg.result {
        SubMsgResult::Err(reason) => {
            let payload: PayoutPayload = from_json(&msg.payload)?;
            Err(ContractError::PayoutFailed {
                winner: payload.winner.to_string(),
                amount: payload.amount,
                reason,
            })
        }
        SubMsgResult::Ok(_) => Ok(Response::new()),
    }
}

/// Abandon a randomness request that was never fulfilled. Admin only, once
/// the request timeout has passed.
/// Entrants and pool stay in place; the next upkeep requests again and a
/// late fulfilment of the abandoned id is rejected as unknown.
pub fn expire_draw(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can expire a draw".to_string(),
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;

    if state.status != RaffleStatus::Calculating {
        return Err(ContractError::RoundNotCalculating);
    }

    let requested_at = state.requested_at.unwrap_or(state.last_draw_time);
    let deadline = requested_at.plus_seconds(config.request_timeout_seconds);
    if env.block.time <= deadline {
        return Err(ContractError::DrawNotExpired {
            deadline: deadline.seconds(),
        });
    }

    let abandoned = state.pending_request_id.take();
    state.requested_at = None;
    state.status = RaffleStatus::Open;
    RAFFLE_STATE.save(deps.storage, &state)?;

    let abandoned_str = abandoned.map_or_else(|| "none".to_string(), |id| id.to_string());

    Ok(Response::new()
        .add_attribute("action", "expire_draw")
        .add_attribute("round_id", state.round_id.to_string())
        .add_event(
            Event::new("raffle_draw_expired")
                .add_attribute("round_id", state.round_id.to_string())
                .add_attribute("request_id", abandoned_str)
                .add_attribute("num_entrants", state.num_entrants.to_string())
                .add_attribute("pool", state.pool.to_string()),
        ))
}
