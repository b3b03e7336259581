use dioxus::prelude::*;

use crate::vm::VisualState;

/// Lattice of level cells lit by progress. Flashes on a wrong answer and glows when complete.
#[component]
pub fn ProgressScene(state: VisualState) -> Element {
    let mut scene_class = String::from("scene");
    if state.flash {
        scene_class.push_str(" scene--flash");
    }
    if state.is_complete {
        scene_class.push_str(" scene--complete");
    }
    if state.is_loading {
        scene_class.push_str(" scene--loading");
    }
    if state.is_failed {
        scene_class.push_str(" scene--failed");
    }

    let percent = (state.fraction() * 100.0).round();
    let cells = (0..state.total_levels).map(|index| {
        let class = if state.is_lit(index) {
            "scene-cell scene-cell--lit"
        } else {
            "scene-cell"
        };
        rsx! {
            div { key: "{index}", class: "{class}" }
        }
    });

    rsx! {
        div {
            class: "{scene_class}",
            "data-progress": "{state.progress}",
            "data-total": "{state.total_levels}",
            div { class: "scene-lattice", {cells} }
            div { class: "scene-meter",
                div { class: "scene-meter-fill", style: "width: {percent}%" }
            }
        }
    }
}
