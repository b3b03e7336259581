use crate::vm::{OverlayStatus, OverlayVm, VisualState};

use super::test_harness::{render_overlay, render_scene, setup_game_harness};

fn overlay(status: OverlayStatus) -> OverlayVm {
    OverlayVm {
        score_label: "Score: 3 / 10".into(),
        level_label: "Riddle 7".into(),
        status,
        flash: false,
    }
}

#[test]
fn scene_lights_one_cell_per_level_cleared() {
    let html = render_scene(VisualState {
        progress: 3,
        total_levels: 10,
        is_complete: false,
        is_loading: false,
        flash: true,
        is_failed: false,
    });
    assert_eq!(html.matches("scene-cell--lit").count(), 3, "{html}");
    assert_eq!(html.matches("scene-cell").count(), 13, "{html}");
    assert!(html.contains("scene--flash"), "missing flash in {html}");
    assert!(html.contains("width: 30%"), "missing meter in {html}");
}

#[test]
fn complete_scene_glows() {
    let html = render_scene(VisualState {
        progress: 10,
        total_levels: 10,
        is_complete: true,
        is_loading: false,
        flash: false,
        is_failed: false,
    });
    assert!(html.contains("scene--complete"), "missing glow in {html}");
    assert!(!html.contains("scene--flash"), "unexpected flash in {html}");
}

#[test]
fn overlay_renders_question_and_choices() {
    let html = render_overlay(overlay(OverlayStatus::Question {
        question: "What has a neck but no head?".into(),
        choices: vec!["Bottle".into(), "River".into(), "Candle".into()],
    }));
    assert!(html.contains("Score: 3 / 10"), "missing score in {html}");
    assert!(html.contains("What has a neck but no head?"), "missing question in {html}");
    assert_eq!(html.matches("btn overlay-choice").count(), 3, "{html}");
    for choice in ["Bottle", "River", "Candle"] {
        assert!(html.contains(choice), "missing {choice} in {html}");
    }
}

#[test]
fn overlay_offers_retry_after_failure() {
    let html = render_overlay(overlay(OverlayStatus::Failed {
        message: "Could not load the next riddle.".into(),
    }));
    assert!(html.contains("Could not load the next riddle."), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(!html.contains("overlay-choice"), "unexpected choices in {html}");
}

#[test]
fn overlay_offers_play_again_when_complete() {
    let html = render_overlay(overlay(OverlayStatus::Complete {
        summary: "You reached level 10 in 10 answers (10 right, 0 wrong).".into(),
    }));
    assert!(html.contains("Play again"), "missing play again in {html}");
    assert!(html.contains("10 right"), "missing summary in {html}");
}

#[test]
fn overlay_shows_loading_text() {
    let html = render_overlay(overlay(OverlayStatus::Loading));
    assert!(html.contains("Loading new riddle..."), "missing loading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_renders_start_screen() {
    let mut harness = setup_game_harness();
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Score: 0 / 10"), "missing score in {html}");
    assert!(html.contains("Start Game"), "missing start button in {html}");
    assert_eq!(html.matches("scene-cell--lit").count(), 0, "{html}");
}
