pub mod audio;
pub mod audio_api;
pub mod loader;
pub mod logging;
pub mod middle;
pub mod pipeline;
pub mod shared;
pub mod timing;
pub mod tui;

pub use middle::DrumKit;
pub use shared::{DisplayState, Effects, InputEvent, KitEvent};
