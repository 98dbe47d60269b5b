use crate::events::PasteKey;
use windows::Win32::UI::Input::KeyboardAndMouse::{VIRTUAL_KEY, VK_CONTROL, VK_SHIFT, VK_V};

/// Преобразование клавиш вставки в виртуальные коды Win32
pub struct PasteKeyToVirtualKey;

impl PasteKeyToVirtualKey {
    pub fn translate(key: PasteKey) -> VIRTUAL_KEY {
        match key {
            PasteKey::Ctrl => VK_CONTROL,
            PasteKey::Shift => VK_SHIFT,
            PasteKey::V => VK_V,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_keys() {
        assert_eq!(PasteKeyToVirtualKey::translate(PasteKey::Ctrl).0, 0x11);
        assert_eq!(PasteKeyToVirtualKey::translate(PasteKey::Shift).0, 0x10);
        assert_eq!(PasteKeyToVirtualKey::translate(PasteKey::V).0, 0x56);
    }
}
