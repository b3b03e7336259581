use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use riddle_core::model::RiddlePayload;
use riddle_core::time::fixed_now;
use services::{
    Clock, GameConfig, GameServices, GeneratorError, RiddleGenerator, RiddleRequest,
};
use tokio::runtime::Handle;

use crate::context::{UiApp, build_app_context};
use crate::views::{GameView, ProgressScene, RiddleOverlay};
use crate::vm::{OverlayVm, VisualState};

struct FixedGenerator;

#[async_trait]
impl RiddleGenerator for FixedGenerator {
    async fn generate(&self, request: &RiddleRequest) -> Result<RiddlePayload, GeneratorError> {
        Ok(RiddlePayload {
            question: format!("Riddle {}?", request.key.attempt()),
            choices: vec!["Echo".into(), "Shadow".into(), "Candle".into()],
            correct_index: 0,
        })
    }
}

struct TestApp {
    services: GameServices,
    runtime: Handle,
}

impl UiApp for TestApp {
    fn game_services(&self) -> GameServices {
        self.services.clone()
    }

    fn runtime(&self) -> Handle {
        self.runtime.clone()
    }
}

#[derive(Props, Clone)]
struct GameHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for GameHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn GameHarnessRoot(props: GameHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { GameView {} }
}

#[derive(Props, Clone, PartialEq)]
struct SceneHarnessProps {
    state: VisualState,
}

#[component]
fn SceneHarness(props: SceneHarnessProps) -> Element {
    rsx! { ProgressScene { state: props.state } }
}

#[derive(Props, Clone, PartialEq)]
struct OverlayHarnessProps {
    vm: OverlayVm,
}

#[component]
fn OverlayHarness(props: OverlayHarnessProps) -> Element {
    rsx! {
        RiddleOverlay {
            vm: props.vm.clone(),
            on_start: |()| {},
            on_answer: |_: String| {},
            on_retry: |()| {},
            on_play_again: |()| {},
        }
    }
}

pub struct GameHarness {
    pub dom: VirtualDom,
}

impl GameHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Game view wired to a fixed generator and a fixed clock. Must run inside a tokio runtime.
pub fn setup_game_harness() -> GameHarness {
    let services = GameServices::new(
        GameConfig::default().with_shuffle_choices(false),
        Arc::new(FixedGenerator),
        Clock::fixed(fixed_now()),
    );
    let app = Arc::new(TestApp {
        services,
        runtime: Handle::current(),
    });
    GameHarness {
        dom: VirtualDom::new_with_props(GameHarnessRoot, GameHarnessProps { app }),
    }
}

pub fn render_scene(state: VisualState) -> String {
    let mut dom = VirtualDom::new_with_props(SceneHarness, SceneHarnessProps { state });
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

pub fn render_overlay(vm: OverlayVm) -> String {
    let mut dom = VirtualDom::new_with_props(OverlayHarness, OverlayHarnessProps { vm });
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}
