mod common;

use std::sync::Arc;
use std::time::Duration;

use riddle_core::model::{RequestKey, RiddleError};
use services::{GenerationFailure, RiddleSource};
use tokio::sync::Notify;

use common::{ScriptedGenerator, answer, ten_levels};

#[tokio::test]
async fn concurrent_fetches_share_one_upstream_call() {
    let gate = Arc::new(Notify::new());
    let generator = Arc::new(ScriptedGenerator::new().gated(Arc::clone(&gate)));
    let source = RiddleSource::new(generator.clone());
    let key = RequestKey::new(2, ten_levels());

    let (first, second, ()) = tokio::join!(source.fetch(key), source.fetch(key), async {
        tokio::task::yield_now().await;
        gate.notify_one();
    });

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.correct_choice(), answer(2));
    assert_eq!(generator.calls(), 1);
    assert_eq!(source.upstream_calls(), 1);
}

#[tokio::test]
async fn concurrent_fetches_share_one_failure() {
    let gate = Arc::new(Notify::new());
    let generator = Arc::new(
        ScriptedGenerator::new()
            .malformed_first(1)
            .gated(Arc::clone(&gate)),
    );
    let source = RiddleSource::new(generator.clone());
    let key = RequestKey::new(0, ten_levels());

    let (first, second, ()) = tokio::join!(source.fetch(key), source.fetch(key), async {
        tokio::task::yield_now().await;
        gate.notify_one();
    });

    let expected = GenerationFailure::Malformed(RiddleError::ChoiceCount { len: 2 });
    assert_eq!(first.unwrap_err(), expected);
    assert_eq!(second.unwrap_err(), expected);
    assert_eq!(generator.calls(), 1);

    // Failures are not memoised: the next fetch goes upstream again.
    gate.notify_one();
    assert!(source.fetch(key).await.is_ok());
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn distinct_keys_are_fetched_separately() {
    let generator = Arc::new(ScriptedGenerator::new());
    let source = RiddleSource::new(generator.clone());

    let levels = ten_levels();
    let zero = source.fetch(RequestKey::new(0, levels)).await.unwrap();
    let one = source.fetch(RequestKey::new(1, levels)).await.unwrap();
    let zero_again = source.fetch(RequestKey::new(0, levels)).await.unwrap();

    assert_ne!(zero, one);
    assert_eq!(zero, zero_again);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn slow_generator_times_out() {
    let gate = Arc::new(Notify::new());
    let generator = Arc::new(ScriptedGenerator::new().gated(gate));
    let source = RiddleSource::new(generator).with_timeout(Duration::from_millis(30));

    let err = source
        .fetch(RequestKey::new(0, ten_levels()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GenerationFailure::Timeout {
            after: Duration::from_millis(30)
        }
    );
    assert_eq!(err.to_string(), "riddle generator timed out after 30ms");
}

#[tokio::test]
async fn huge_attempt_index_still_resolves() {
    let generator = Arc::new(ScriptedGenerator::new());
    let source = RiddleSource::new(generator);
    let riddle = source
        .fetch(RequestKey::new(u32::MAX, ten_levels()))
        .await
        .unwrap();
    assert!(riddle.question().contains("master"));
}
