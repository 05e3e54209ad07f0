use wargame_board::countdown::{poll_outcome, CountdownState, Expiry, PollOutcome, TimeBand, TurnStatus};
use wargame_board::transfer::{group_by_entity, TransferGroup};
use wargame_board::BoardConfig;

const BOARD_GLOBALS: &str = r#"{
    "turn": 8,
    "secondsLeft": 125,
    "waitingForMove": true,
    "victor": null,
    "turnStartUrl": "/game/3/turn_start",
    "pauseUrl": "/game/3/pause",
    "isOwner": true
}"#;

#[test]
fn waiting_player_counts_down_through_bands_and_submits() {
    let config = BoardConfig::from_json(BOARD_GLOBALS).unwrap();
    let mut state = CountdownState::from_config(&config, 0.0);
    assert_eq!(state.band(), TimeBand::Green);

    let mut bands = vec![state.band()];
    let mut expiry = Expiry::None;
    for _ in 0..130 {
        state.tick(1.0);
        if bands.last() != Some(&state.band()) {
            bands.push(state.band());
        }
        let fired = state.check_expiry(config.waiting_for_move);
        if fired != Expiry::None {
            expiry = fired;
            break;
        }
    }

    assert_eq!(bands, vec![TimeBand::Green, TimeBand::Yellow, TimeBand::Red]);
    assert_eq!(expiry, Expiry::Submit);
    assert_eq!(state.label(), "00:00");
}

#[test]
fn server_pause_freezes_the_round_until_resumed() {
    let config = BoardConfig::from_json(BOARD_GLOBALS).unwrap();
    let mut state = CountdownState::from_config(&config, 0.0);

    let paused: TurnStatus =
        serde_json::from_str(r#"{"turn": 8, "secondsLeft": 20, "isPaused": true, "isStarting": false, "startingDelay": -40.2}"#)
            .unwrap();
    assert_eq!(poll_outcome(&paused, config.turn, None, 0.0), PollOutcome::Sync);
    state.reconcile(&paused);
    for _ in 0..60 {
        state.tick(1.0);
        assert_eq!(state.check_expiry(true), Expiry::None);
    }
    assert_eq!(state.seconds_left, 20.0);

    let resumed: TurnStatus =
        serde_json::from_str(r#"{"turn": 8, "secondsLeft": 24, "isPaused": false, "isStarting": true, "startingDelay": 4}"#)
            .unwrap();
    state.reconcile(&resumed);
    assert_eq!(state.label(), "Starting in 4");
    for _ in 0..4 {
        state.tick(1.0);
    }
    assert_eq!(state.label(), "00:20");
}

#[test]
fn next_turn_reported_by_server_reloads() {
    let config = BoardConfig::from_json(BOARD_GLOBALS).unwrap();
    let status: TurnStatus = serde_json::from_str(r#"{"turn": 9, "start": "2024-05-01T12:00:00"}"#).unwrap();
    assert_eq!(poll_outcome(&status, config.turn, None, 0.0), PollOutcome::Reload);
}

#[test]
fn entity_budgets_are_independent() {
    let classes = ["uk_gov__transfer-input", "plc__transfer-input", "uk_gov__transfer-input"];
    let groups = group_by_entity(classes);

    let mut uk_gov = TransferGroup::new(groups["uk_gov"].iter().map(|_| (0.0, Some(5.0))));
    let plc = TransferGroup::new(groups["plc"].iter().map(|_| (0.0, Some(3.0))));

    uk_gov.change(0, 2.0);
    assert_eq!(uk_gov.max(1), Some(3.0));
    assert_eq!(plc.max(0), Some(3.0));
    assert_eq!(uk_gov.len(), 2);
    assert_eq!(plc.len(), 1);
}
