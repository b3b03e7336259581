use riddle_core::progression::PhaseKind;
use services::GameSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Question {
        question: String,
        choices: Vec<String>,
    },
    Failed {
        message: String,
    },
    Complete {
        summary: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayVm {
    pub score_label: String,
    pub level_label: String,
    pub status: OverlayStatus,
    pub flash: bool,
}

#[must_use]
pub fn map_overlay(snapshot: &GameSnapshot) -> OverlayVm {
    let score_label = format!("Score: {} / {}", snapshot.score, snapshot.total_levels);
    let level_label = format!("Riddle {}", snapshot.attempt.saturating_add(1));

    let status = match (snapshot.phase, snapshot.riddle.as_ref()) {
        (PhaseKind::Idle, _) => OverlayStatus::Idle,
        (PhaseKind::Loading, _) => OverlayStatus::Loading,
        (PhaseKind::Ready, Some(riddle)) => OverlayStatus::Question {
            question: riddle.question().to_string(),
            choices: riddle.choices().to_vec(),
        },
        (PhaseKind::Ready, None) => OverlayStatus::Loading,
        (PhaseKind::Failed, _) => OverlayStatus::Failed {
            message: failure_message(snapshot.failure.as_deref()),
        },
        (PhaseKind::Complete, _) => OverlayStatus::Complete {
            summary: completion_summary(snapshot),
        },
    };

    OverlayVm {
        score_label,
        level_label,
        status,
        flash: snapshot.feedback_flag,
    }
}

fn failure_message(reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.trim().is_empty() => {
            format!("Could not load the next riddle ({reason}).")
        }
        _ => "Could not load the next riddle.".to_string(),
    }
}

fn completion_summary(snapshot: &GameSnapshot) -> String {
    let answered = snapshot.correct_answers + snapshot.wrong_answers;
    let noun = if answered == 1 { "answer" } else { "answers" };
    format!(
        "You reached level {} in {answered} {noun} ({} right, {} wrong).",
        snapshot.total_levels, snapshot.correct_answers, snapshot.wrong_answers
    )
}
