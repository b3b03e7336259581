mod common;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use riddle_core::Clock;
use riddle_core::model::{RequestKey, RiddlePayload, Session};
use riddle_core::progression::{IgnoreReason, Outcome, PhaseKind, Progression, Ticket};
use riddle_core::time::fixed_now;
use services::{EngineEvents, GameConfig, GameServices, ProgressionEngine};
use tokio::runtime::Handle;

use common::{ScriptedGenerator, WRONG, answer, answer_and_settle, pump, settle, ten_levels};

fn services(generator: Arc<ScriptedGenerator>) -> GameServices {
    GameServices::new(
        GameConfig::default().with_shuffle_choices(false),
        generator,
        Clock::fixed(fixed_now()),
    )
}

fn session(generator: Arc<ScriptedGenerator>) -> (ProgressionEngine, EngineEvents) {
    services(generator).new_session(Handle::current())
}

#[tokio::test]
async fn prefetched_riddle_is_reused_for_the_next_attempt() {
    let generator = Arc::new(ScriptedGenerator::new());
    let (mut engine, mut events) = session(generator.clone());

    assert_eq!(engine.start(), Outcome::Started);
    assert_eq!(settle(&mut engine, &mut events).await, PhaseKind::Ready);
    assert_eq!(
        pump(&mut engine, &mut events).await,
        Outcome::Ignored(IgnoreReason::Prefetched)
    );
    assert_eq!(generator.calls(), 2);

    answer_and_settle(&mut engine, &mut events, true).await;
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.attempt, 1);
    assert_eq!(
        snapshot.riddle.as_ref().map(|r| r.correct_choice().to_string()),
        Some(answer(1))
    );

    assert_eq!(
        pump(&mut engine, &mut events).await,
        Outcome::Ignored(IgnoreReason::Prefetched)
    );
    // Attempt 1 came from the cache; only attempt 2's prefetch went upstream.
    assert_eq!(generator.calls(), 3);
}

#[tokio::test]
async fn five_right_then_one_wrong_scores_three() {
    let generator = Arc::new(ScriptedGenerator::new());
    let (mut engine, mut events) = session(generator);

    engine.start();
    settle(&mut engine, &mut events).await;
    for _ in 0..5 {
        answer_and_settle(&mut engine, &mut events, true).await;
    }
    assert_eq!(engine.snapshot().score, 5);

    let outcome = answer_and_settle(&mut engine, &mut events, false).await;
    let Outcome::Answered(answered) = outcome else {
        panic!("expected an answer, got {outcome:?}");
    };
    assert!(!answered.correct);
    assert_eq!(answered.score_before, 5);
    assert_eq!(answered.score_after, 3);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.score, 3);
    assert_eq!(snapshot.attempt, 6);
    assert_eq!(snapshot.correct_answers, 5);
    assert_eq!(snapshot.wrong_answers, 1);
    assert!(snapshot.feedback_flag);
    assert_eq!(snapshot.phase, PhaseKind::Ready);
}

#[tokio::test]
async fn final_correct_answer_completes_the_game() {
    let generator = Arc::new(ScriptedGenerator::new());
    let services = services(generator.clone());
    let progression = Progression::new(
        Session::with_progress(ten_levels(), 9, 9),
        services.config().progression_settings(),
    );
    let (mut engine, mut events) = ProgressionEngine::new(
        progression,
        Arc::new(services.riddle_source()),
        services.clock(),
        Handle::current(),
    );

    engine.start();
    settle(&mut engine, &mut events).await;
    let calls_before = generator.calls();

    let outcome = engine.submit_answer(&answer(9));
    assert!(matches!(outcome, Outcome::Answered(a) if a.completed && a.score_after == 10));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, PhaseKind::Complete);
    assert!(snapshot.completed);
    assert_eq!(snapshot.score, 10);
    assert_eq!(snapshot.attempt, 10);
    assert!(snapshot.riddle.is_none());

    assert_eq!(
        engine.submit_answer(&answer(10)),
        Outcome::Ignored(IgnoreReason::InvalidSubmission)
    );
    assert_eq!(engine.snapshot().attempt, 10);
    assert_eq!(engine.snapshot().score, 10);
    assert!(generator.calls() <= calls_before + 1);
}

#[tokio::test]
async fn malformed_riddles_exhaust_retries_then_recover_on_request() {
    let generator = Arc::new(ScriptedGenerator::new().malformed_first(2));
    let (mut engine, mut events) = session(generator.clone());

    engine.start();
    assert_eq!(
        pump(&mut engine, &mut events).await,
        Outcome::Retrying { failures: 1 }
    );
    assert_eq!(
        pump(&mut engine, &mut events).await,
        Outcome::GaveUp { failures: 2 }
    );

    let snapshot = engine.snapshot();
    assert!(snapshot.is_failed());
    assert!(snapshot.failure.is_some());
    assert_eq!(snapshot.attempt, 0);
    assert_eq!(generator.calls(), 2);

    assert_eq!(
        engine.submit_answer("anything"),
        Outcome::Ignored(IgnoreReason::InvalidSubmission)
    );

    assert_eq!(engine.retry(), Outcome::RetryRequested);
    assert_eq!(settle(&mut engine, &mut events).await, PhaseKind::Ready);
    assert_eq!(engine.snapshot().failure, None);
    assert_eq!(engine.retry(), Outcome::Ignored(IgnoreReason::NotFailed));
}

#[tokio::test]
async fn second_wrong_answer_restarts_the_flash_window() {
    let generator = Arc::new(ScriptedGenerator::new());
    let (mut engine, mut events) = session(generator);

    engine.start();
    settle(&mut engine, &mut events).await;

    answer_and_settle(&mut engine, &mut events, false).await;
    assert!(engine.snapshot().feedback_flag);
    assert_eq!(
        engine.advance_clock(Duration::milliseconds(600)),
        Outcome::Ignored(IgnoreReason::FlashPending)
    );

    engine.submit_answer(WRONG);
    settle(&mut engine, &mut events).await;
    assert_eq!(
        engine.advance_clock(Duration::milliseconds(400)),
        Outcome::Ignored(IgnoreReason::FlashPending)
    );
    assert!(engine.snapshot().feedback_flag);

    assert_eq!(
        engine.advance_clock(Duration::milliseconds(600)),
        Outcome::FlashCleared
    );
    assert!(!engine.snapshot().feedback_flag);
    assert_eq!(engine.snapshot().score, 0);
}

#[tokio::test]
async fn real_timer_clears_flash_once_after_overlapping_wrong_answers() {
    let generator = Arc::new(ScriptedGenerator::new());
    let config = GameConfig {
        flash_ms: 300,
        ..GameConfig::default()
    }
    .with_shuffle_choices(false);
    let services = GameServices::new(config, generator, Clock::system());
    let (mut engine, mut events) = services.new_session(Handle::current());

    engine.start();
    settle(&mut engine, &mut events).await;
    answer_and_settle(&mut engine, &mut events, false).await;
    assert!(engine.snapshot().feedback_flag);

    engine.submit_answer(WRONG);
    let window_end = tokio::time::Instant::now() + StdDuration::from_millis(900);
    let mut cleared = 0;
    while let Ok(Some(event)) = tokio::time::timeout_at(window_end, events.recv()).await {
        if engine.handle(event) == Outcome::FlashCleared {
            cleared += 1;
        }
    }

    assert_eq!(cleared, 1);
    assert!(!engine.snapshot().feedback_flag);
    assert_eq!(engine.snapshot().wrong_answers, 2);
}

#[tokio::test]
async fn late_response_for_an_earlier_attempt_is_discarded() {
    let generator = Arc::new(ScriptedGenerator::new());
    let (mut engine, mut events) = session(generator);

    engine.start();
    settle(&mut engine, &mut events).await;
    answer_and_settle(&mut engine, &mut events, true).await;
    let current = engine.snapshot().riddle;

    let stale = RiddlePayload {
        question: "Old riddle?".into(),
        choices: vec!["One".into(), "Two".into(), "Three".into()],
        correct_index: 1,
    }
    .validate()
    .unwrap();
    let outcome = engine.handle(riddle_core::progression::Event::Resolved {
        ticket: Ticket::new(0),
        key: RequestKey::new(0, ten_levels()),
        riddle: stale,
    });

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::Stale));
    assert_eq!(engine.snapshot().riddle, current);
    assert_eq!(engine.snapshot().attempt, 1);
}

#[tokio::test]
async fn new_sessions_start_from_scratch() {
    let generator = Arc::new(ScriptedGenerator::new());
    let services = GameServices::new(GameConfig::default(), generator.clone(), Clock::system());
    assert!(services.generator_enabled());

    let (mut first, mut first_events) = services.new_session(Handle::current());
    first.start();
    settle(&mut first, &mut first_events).await;
    answer_and_settle(&mut first, &mut first_events, true).await;
    assert_eq!(first.snapshot().score, 1);

    let (second, _second_events) = services.new_session(Handle::current());
    let snapshot = second.snapshot();
    assert_eq!(snapshot.phase, PhaseKind::Idle);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.attempt, 0);
    assert_eq!(snapshot.total_levels, 10);
    assert_eq!(second.source().upstream_calls(), 0);
}
