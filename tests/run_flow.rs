//! A whole run end to end: gate, countdown, crash, leaderboard submit.

use arcade_runner::highscores::{self, MemoryStore, SubmitOutcome};
use arcade_runner::sim::{Entrant, GameEvent, GamePhase, GameState, TickInput, tick};
use arcade_runner::{HighScores, StartError, Variant, Viewport};

const FRAME_MS: f64 = 1000.0 / 60.0;
const NOW: f64 = 1_700_000_000_000.0;

/// Tick with no input until the run ends, collecting every event
fn play_until_crash(state: &mut GameState) -> Vec<GameEvent> {
    let input = TickInput::default();
    let mut events = Vec::new();
    let mut now = 0.0;
    while state.phase != GamePhase::GameOver && now < 60_000.0 {
        now += FRAME_MS;
        tick(state, &input, now);
        events.extend(state.drain_events());
    }
    events
}

#[test]
fn test_idle_runner_crashes_and_submits_once() {
    let store = MemoryStore::new(NOW);
    store.seed("champion", 10_000, NOW - 3_600_000.0);

    let mut board = HighScores::new();
    assert!(pollster::block_on(board.check_username(&store, "rider")));

    let mut state = GameState::for_variant(Variant::AzaleasRunner, Viewport::Desktop, 42);
    assert_eq!(
        state.start(0.0, &Entrant::default()),
        Err(StartError::UsernameUnverified)
    );
    let entrant = Entrant {
        character: None,
        username: board.verified_username().map(str::to_string),
    };
    state.start(0.0, &entrant).unwrap();
    board.begin_run();

    let events = play_until_crash(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(events.contains(&GameEvent::RunStarted));
    assert!(events.iter().any(|e| matches!(e, GameEvent::Crashed { .. })));
    let Some(GameEvent::RunEnded { score }) = events.last().copied() else {
        panic!("run did not end with RunEnded: {:?}", events.last());
    };
    assert_eq!(score, state.score);
    assert!(score > 0);

    let outcome = pollster::block_on(board.submit(&store, score, NOW)).unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted);
    let again = pollster::block_on(board.submit(&store, score, NOW)).unwrap();
    assert_eq!(again, SubmitOutcome::AlreadySubmitted);

    let mine: Vec<_> = store.rows().into_iter().filter(|r| r.username == "rider").collect();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].score, score);

    assert_eq!(board.high_score, 10_000);
    assert_eq!(board.all_time.len(), 2);
    assert_eq!(board.all_time[1].username, "rider");
    assert_eq!(board.daily.len(), 2);

    // The name is taken now
    let boards = pollster::block_on(highscores::fetch_boards(&store, NOW)).unwrap();
    assert_eq!(boards.all_time, board.all_time);
    assert_eq!(
        pollster::block_on(highscores::username_available(&store, "rider")).ok(),
        Some(false)
    );
}

#[test]
fn test_autopilot_outlasts_idle_runner() {
    let entrant = Entrant {
        character: Some(arcade_runner::Character::Ninja),
        username: None,
    };

    let mut idle = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 7);
    idle.start(0.0, &entrant).unwrap();
    play_until_crash(&mut idle);
    assert_eq!(idle.phase, GamePhase::GameOver);

    let mut auto = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 7);
    auto.start(0.0, &entrant).unwrap();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut now = 0.0;
    while now < 3000.0 + 10_000.0 {
        now += FRAME_MS;
        tick(&mut auto, &input, now);
    }
    assert_eq!(auto.phase, GamePhase::Playing);
    assert!(auto.score > idle.score);
}

#[test]
fn test_run_restarts_after_game_over() {
    let entrant = Entrant {
        character: Some(arcade_runner::Character::Frog),
        username: None,
    };
    let mut state = GameState::for_variant(Variant::NinjaRunner, Viewport::Compact, 3);
    state.start(0.0, &entrant).unwrap();
    play_until_crash(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);

    state.start(100_000.0, &entrant).unwrap();
    assert_eq!(state.phase, GamePhase::Ready);
    tick(&mut state, &TickInput::default(), 103_000.0);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert!(state.obstacles.is_empty());
}
