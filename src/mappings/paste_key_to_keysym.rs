use crate::events::PasteKey;

/// Преобразование клавиш вставки в X11 keysym (X11/keysymdef.h)
pub struct PasteKeyToKeysym;

impl PasteKeyToKeysym {
    pub const XK_CONTROL_L: u32 = 0xffe3;
    pub const XK_SHIFT_L: u32 = 0xffe1;
    pub const XK_V: u32 = 0x0076;

    pub fn translate(key: PasteKey) -> u32 {
        match key {
            PasteKey::Ctrl => Self::XK_CONTROL_L,
            PasteKey::Shift => Self::XK_SHIFT_L,
            PasteKey::V => Self::XK_V,
        }
    }
}

/// Снимок раскладки сервера (ответ GetKeyboardMapping)
pub struct KeyboardMapping {
    pub min_keycode: u8,
    pub keysyms_per_keycode: u8,
    pub keysyms: Vec<u32>,
}

impl KeyboardMapping {
    /// Аналог XKeysymToKeycode: сначала просматривается первая колонка
    /// всех keycode, затем вторая и т.д.
    pub fn keycode_for(&self, keysym: u32) -> Option<u8> {
        let per = self.keysyms_per_keycode as usize;
        if per == 0 {
            return None;
        }
        let count = self.keysyms.len() / per;

        for column in 0..per {
            for index in 0..count {
                if self.keysyms[index * per + column] == keysym {
                    return u8::try_from(self.min_keycode as usize + index).ok();
                }
            }
        }
        None
    }

    pub fn keycode_for_key(&self, key: PasteKey) -> Option<u8> {
        self.keycode_for(PasteKeyToKeysym::translate(key))
    }
}
