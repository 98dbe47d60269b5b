use super::r#trait::WindowResolver;
use crate::error::Result;
use crate::events::{WindowHandle, WindowInfo};
use crate::paste_error;
use tracing::debug;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{GetClassNameW, GetForegroundWindow};

/// Максимальная длина имени класса окна Win32
const CLASS_NAME_CAPACITY: usize = 256;

/// Определение окна переднего плана через GetForegroundWindow
#[derive(Debug, Default)]
pub struct ForegroundResolver;

impl ForegroundResolver {
    pub fn new() -> Self {
        Self
    }
}

impl WindowResolver for ForegroundResolver {
    fn active_window(&self) -> Result<Option<WindowHandle>> {
        // SAFETY: GetForegroundWindow не принимает аргументов и не имеет предусловий
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0.is_null() {
            return Ok(None);
        }
        Ok(Some(WindowHandle::from_raw(hwnd.0 as usize as u64)))
    }

    fn window_info(&self, handle: WindowHandle) -> Result<Option<WindowInfo>> {
        let hwnd = HWND(handle.raw() as usize as *mut core::ffi::c_void);
        let mut buf = [0u16; CLASS_NAME_CAPACITY];

        // SAFETY: буфер живёт до конца вызова, длина передаётся срезом
        let len = unsafe { GetClassNameW(hwnd, &mut buf) };
        if len <= 0 {
            let err = windows::core::Error::from_win32();
            return Err(paste_error!(no_class, "GetClassNameW: {}", err));
        }

        let class = String::from_utf16_lossy(&buf[..len as usize]);
        debug!("Класс окна {}: {}", handle, class);
        Ok(Some(WindowInfo::new(handle, class)))
    }
}
