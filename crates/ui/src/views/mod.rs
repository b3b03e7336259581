mod game;
mod overlay;
mod scene;

pub use game::GameView;
pub use overlay::RiddleOverlay;
pub use scene::ProgressScene;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
