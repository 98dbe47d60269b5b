pub mod keyboard;
pub mod window;

pub use keyboard::{KeySequence, KeyState, KeyStep, PasteKey};
pub use window::{WindowHandle, WindowInfo};
