use dioxus::prelude::*;

use crate::vm::{OverlayStatus, OverlayVm};

#[component]
pub fn RiddleOverlay(
    vm: OverlayVm,
    on_start: EventHandler<()>,
    on_answer: EventHandler<String>,
    on_retry: EventHandler<()>,
    on_play_again: EventHandler<()>,
) -> Element {
    let panel_class = if vm.flash {
        "overlay-panel overlay-panel--wrong"
    } else {
        "overlay-panel"
    };

    let body = match vm.status {
        OverlayStatus::Idle => rsx! {
            button {
                class: "btn btn-primary overlay-start",
                r#type: "button",
                onclick: move |_| on_start.call(()),
                "Start Game"
            }
        },
        OverlayStatus::Loading => rsx! {
            p { class: "overlay-loading", "Loading new riddle..." }
        },
        OverlayStatus::Question { question, choices } => {
            let buttons = choices.into_iter().enumerate().map(|(index, choice)| {
                let label = choice.clone();
                rsx! {
                    button {
                        key: "{index}",
                        class: "btn overlay-choice",
                        r#type: "button",
                        onclick: move |_| on_answer.call(choice.clone()),
                        "{label}"
                    }
                }
            });
            rsx! {
                p { class: "overlay-level", "{vm.level_label}" }
                p { class: "overlay-question", "{question}" }
                div { class: "overlay-choices", {buttons} }
            }
        }
        OverlayStatus::Failed { message } => rsx! {
            p { class: "overlay-error", "{message}" }
            button {
                class: "btn btn-secondary overlay-retry",
                r#type: "button",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        },
        OverlayStatus::Complete { summary } => rsx! {
            h2 { class: "overlay-title", "You made it to the top!" }
            p { class: "overlay-summary", "{summary}" }
            button {
                class: "btn btn-primary overlay-again",
                r#type: "button",
                onclick: move |_| on_play_again.call(()),
                "Play again"
            }
        },
    };

    rsx! {
        div { class: "overlay",
            div { class: "overlay-score", "{vm.score_label}" }
            div { class: "{panel_class}", {body} }
        }
    }
}
