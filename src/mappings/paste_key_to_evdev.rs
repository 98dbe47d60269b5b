use crate::events::PasteKey;
use evdev::KeyCode;

/// Преобразование клавиш вставки в evdev коды (linux/input-event-codes.h)
pub struct PasteKeyToEvdev;

impl PasteKeyToEvdev {
    pub fn translate(key: PasteKey) -> KeyCode {
        match key {
            PasteKey::Ctrl => KeyCode::KEY_LEFTCTRL,
            PasteKey::Shift => KeyCode::KEY_LEFTSHIFT,
            PasteKey::V => KeyCode::KEY_V,
        }
    }

    /// Числовой код для записи в input_event
    pub fn code(key: PasteKey) -> u16 {
        Self::translate(key).code()
    }
}
