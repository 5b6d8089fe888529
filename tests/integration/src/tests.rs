//! Scenario tests for the upkeep raffle.
//!
//! Each test runs full rounds against the contract entry points with
//! `cosmwasm_std::testing` mocks and a simulated VRF coordinator.
//!
//! Run:
//! ```bash
//! cargo test -p raffle-integration-tests
//! ```

use std::collections::BTreeSet;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env};
use cosmwasm_std::{coins, Addr, BankMsg, CosmosMsg, Uint128, Uint256};
use raffle_common::types::RaffleStatus;
use raffle_integration_tests::{
    check_upkeep, enter, env_at, payout_of, perform_upkeep, raffle_state, setup_raffle,
    MockCoordinator, DENOM, REQUEST_TIMEOUT,
};
use upkeep_raffle::contract::{execute, query};
use upkeep_raffle::msg::{
    CheckUpkeepResponse, ExecuteMsg, PlayersResponse, QueryMsg, RoundHistoryResponse,
};
use upkeep_raffle::state::RoundResult;
use upkeep_raffle::ContractError;

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_entrant_round() {
    // Fee 1, interval 60s, one entrant, random word 42 → the only entrant wins.
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    assert!(!check_upkeep(&deps, env_at(0)).upkeep_needed);

    let alice = enter(&mut deps, env_at(5), "alice", 1);
    assert!(!check_upkeep(&deps, env_at(59)).upkeep_needed);
    assert!(check_upkeep(&deps, env_at(60)).upkeep_needed);

    let res = perform_upkeep(&mut deps, env_at(60)).unwrap();
    let request_id = coordinator.accept_request(&mut deps, env_at(60), &res);
    assert!(request_id > 0);

    let state = raffle_state(&deps);
    assert_eq!(state.status, RaffleStatus::Calculating);
    assert_eq!(state.pending_request_id, Some(request_id));

    let res = coordinator
        .fulfill(&mut deps, env_at(75), request_id, 42)
        .unwrap();
    let (to, amount) = payout_of(&res);
    assert_eq!(to, alice.to_string());
    assert_eq!(amount, Uint128::new(1));

    let state = raffle_state(&deps);
    assert_eq!(state.status, RaffleStatus::Open);
    assert_eq!(state.num_entrants, 0);
    assert_eq!(state.pool, Uint128::zero());
    assert_eq!(state.recent_winner, Some(alice.clone()));

    let res = query(deps.as_ref(), mock_env(), QueryMsg::RecentWinner {}).unwrap();
    let winner: Option<Addr> = serde_json::from_slice(&res).unwrap();
    assert_eq!(winner, Some(alice));
}

#[test]
fn test_four_entrants_round() {
    // Entrants [A, B, C, D], random word 7 → index 7 % 4 = 3 → D takes 4.
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    let entrants: Vec<Addr> = ["a", "b", "c", "d"]
        .iter()
        .map(|name| enter(&mut deps, env_at(1), name, 1))
        .collect();

    let res = perform_upkeep(&mut deps, env_at(61)).unwrap();
    let request_id = coordinator.accept_request(&mut deps, env_at(61), &res);

    let res = coordinator
        .fulfill(&mut deps, env_at(62), request_id, 7)
        .unwrap();
    let (to, amount) = payout_of(&res);
    assert_eq!(to, entrants[3].to_string());
    assert_eq!(amount, Uint128::new(4));

    let res = query(deps.as_ref(), mock_env(), QueryMsg::Round { round_id: 0 }).unwrap();
    let round: RoundResult = serde_json::from_slice(&res).unwrap();
    assert_eq!(round.winner, entrants[3]);
    assert_eq!(round.winner_index, 3);
    assert_eq!(round.payout, Uint128::new(4));
    assert_eq!(round.random_word, Uint256::from(7u32));
}

#[test]
fn test_double_fulfillment_rejected() {
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    enter(&mut deps, env_at(1), "alice", 1);
    enter(&mut deps, env_at(2), "bob", 1);
    let res = perform_upkeep(&mut deps, env_at(70)).unwrap();
    let request_id = coordinator.accept_request(&mut deps, env_at(70), &res);

    coordinator
        .fulfill(&mut deps, env_at(71), request_id, 1)
        .unwrap();
    let after_first = raffle_state(&deps);

    let err = coordinator
        .fulfill(&mut deps, env_at(72), request_id, 1)
        .unwrap_err();
    assert!(matches!(err, ContractError::UnknownRequest { .. }));
    assert_eq!(raffle_state(&deps), after_first);
}

#[test]
fn test_upkeep_not_needed_until_interval_elapses_again() {
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    let start = raffle_state(&deps).last_draw_time;

    enter(&mut deps, env_at(1), "alice", 1);
    let res = perform_upkeep(&mut deps, env_at(60)).unwrap();
    let request_id = coordinator.accept_request(&mut deps, env_at(60), &res);
    coordinator
        .fulfill(&mut deps, env_at(65), request_id, 3)
        .unwrap();

    let state = raffle_state(&deps);
    assert!(state.last_draw_time > start);
    assert_eq!(state.last_draw_time, env_at(65).block.time);

    // New entrant right away: still too early
    enter(&mut deps, env_at(66), "bob", 1);
    assert!(!check_upkeep(&deps, env_at(124)).upkeep_needed);
    let err = perform_upkeep(&mut deps, env_at(124)).unwrap_err();
    assert!(matches!(err, ContractError::UpkeepNotNeeded { .. }));

    assert!(check_upkeep(&deps, env_at(125)).upkeep_needed);
}

#[test]
fn test_consecutive_rounds() {
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 100, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    let mut now = 0;
    let mut request_ids = Vec::new();
    for round in 0..3u64 {
        let players: Vec<Addr> = (0..=round)
            .map(|i| enter(&mut deps, env_at(now + 1), &format!("r{}p{}", round, i), 100))
            .collect();

        now += 61;
        let res = perform_upkeep(&mut deps, env_at(now)).unwrap();
        let request_id = coordinator.accept_request(&mut deps, env_at(now), &res);
        request_ids.push(request_id);

        let res = coordinator
            .fulfill(&mut deps, env_at(now), request_id, 10 + round as u128)
            .unwrap();
        let index = (10 + round as usize) % players.len();
        let (to, amount) = payout_of(&res);
        assert_eq!(to, players[index].to_string());
        assert_eq!(amount, Uint128::new(100 * players.len() as u128));
    }

    // Request ids are unique and all resolved
    let unique: BTreeSet<u64> = request_ids.iter().copied().collect();
    assert_eq!(unique.len(), request_ids.len());

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::RoundHistory {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let history: RoundHistoryResponse = serde_json::from_slice(&res).unwrap();
    assert_eq!(history.rounds.len(), 3);
    assert_eq!(
        history
            .rounds
            .iter()
            .map(|r| r.num_entrants)
            .collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::RequestRound {
            request_id: request_ids[1],
        },
    )
    .unwrap();
    let round_of: Option<u64> = serde_json::from_slice(&res).unwrap();
    assert_eq!(round_of, Some(1));

    let state = raffle_state(&deps);
    assert_eq!(state.total_rounds_completed, 3);
    assert_eq!(state.total_paid_out, Uint128::new(600));
}

#[test]
fn test_expired_draw_is_retried() {
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    let alice = enter(&mut deps, env_at(1), "alice", 1);
    let res = perform_upkeep(&mut deps, env_at(60)).unwrap();
    let stale_id = coordinator.accept_request(&mut deps, env_at(60), &res);

    // The coordinator never answers; the admin expires after the timeout
    let admin = deps.api.addr_make("deployer");
    let info = message_info(&admin, &[]);
    execute(
        deps.as_mut(),
        env_at(60 + REQUEST_TIMEOUT + 1),
        info,
        ExecuteMsg::ExpireDraw {},
    )
    .unwrap();
    assert_eq!(raffle_state(&deps).status, RaffleStatus::Open);

    // Entries reopen and the next upkeep requests fresh randomness
    let bob = enter(&mut deps, env_at(60 + REQUEST_TIMEOUT + 2), "bob", 1);
    let retry_at = env_at(60 + REQUEST_TIMEOUT + 3);
    let res = perform_upkeep(&mut deps, retry_at.clone()).unwrap();
    let fresh_id = coordinator.accept_request(&mut deps, retry_at.clone(), &res);
    assert_ne!(stale_id, fresh_id);

    let err = coordinator
        .fulfill(&mut deps, retry_at.clone(), stale_id, 0)
        .unwrap_err();
    assert!(matches!(err, ContractError::UnknownRequest { .. }));

    let res = coordinator
        .fulfill(&mut deps, retry_at, fresh_id, 1)
        .unwrap();
    let (to, amount) = payout_of(&res);
    assert_eq!(to, bob.to_string());
    assert_eq!(amount, Uint128::new(2));
    assert_ne!(to, alice.to_string());
}

#[test]
fn test_raffle_state_queries_while_calculating() {
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    let alice = enter(&mut deps, env_at(1), "alice", 1);
    let res = perform_upkeep(&mut deps, env_at(60)).unwrap();
    coordinator.accept_request(&mut deps, env_at(60), &res);

    // Reads stay available while the request is outstanding
    let res = check_upkeep(&deps, env_at(600));
    assert!(!res.upkeep_needed);
    assert!(!res.is_open);

    let player_res = query(deps.as_ref(), mock_env(), QueryMsg::Player { index: 0 }).unwrap();
    let player: Addr = serde_json::from_slice(&player_res).unwrap();
    assert_eq!(player, alice);
    assert!(query(deps.as_ref(), mock_env(), QueryMsg::Player { index: 1 }).is_err());

    assert_eq!(
        res,
        CheckUpkeepResponse {
            upkeep_needed: false,
            is_open: false,
            time_passed: true,
            has_balance: true,
            has_players: true,
        }
    );
}

#[test]
fn test_overpaid_entry_keeps_pool_at_fee_per_entrant() {
    let mut deps = mock_dependencies();
    setup_raffle(&mut deps, 1, 60);
    let mut coordinator = MockCoordinator::new(&deps);

    let a = deps.api.addr_make("a");
    let info = message_info(&a, &coins(5, DENOM));
    let res = execute(deps.as_mut(), env_at(1), info, ExecuteMsg::Enter {}).unwrap();
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: a.to_string(),
            amount: coins(4, DENOM),
        })
    );
    let b = enter(&mut deps, env_at(2), "b", 1);

    let state = raffle_state(&deps);
    assert_eq!(state.pool, Uint128::new(1) * Uint128::from(state.num_entrants));

    // The overpayment never reaches the winner
    let res = perform_upkeep(&mut deps, env_at(60)).unwrap();
    let request_id = coordinator.accept_request(&mut deps, env_at(60), &res);
    let res = coordinator
        .fulfill(&mut deps, env_at(61), request_id, 1)
        .unwrap();
    let (to, amount) = payout_of(&res);
    assert_eq!(to, b.to_string());
    assert_eq!(amount, Uint128::new(2));

    // Round 0's entrants are still listed after the reset
    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Players {
            round_id: Some(0),
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let page: PlayersResponse = serde_json::from_slice(&res).unwrap();
    assert_eq!(page.players, vec![a, b]);
}
