mod overlay_vm;
mod visual_vm;

pub use overlay_vm::{OverlayStatus, OverlayVm, map_overlay};
pub use visual_vm::{VisualState, map_visual_state};
