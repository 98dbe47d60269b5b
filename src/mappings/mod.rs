//! Трансляция клавиш комбинации вставки в коды конкретного бэкенда

#[cfg(target_os = "linux")]
pub mod paste_key_to_evdev;
#[cfg(target_os = "linux")]
pub mod paste_key_to_keysym;
#[cfg(windows)]
pub mod paste_key_to_virtual_key;

#[cfg(target_os = "linux")]
pub use paste_key_to_evdev::PasteKeyToEvdev;
#[cfg(target_os = "linux")]
pub use paste_key_to_keysym::KeyboardMapping;
#[cfg(windows)]
pub use paste_key_to_virtual_key::PasteKeyToVirtualKey;
