use super::r#trait::WindowResolver;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{WindowHandle, WindowInfo};
use crate::services::display_session::X11Requests;
use tracing::debug;

/// Значения поля focus в GetInputFocus, которые не являются окнами
const FOCUS_NONE: u32 = 0;
const FOCUS_POINTER_ROOT: u32 = 1;

/// Определение активного окна через _NET_ACTIVE_WINDOW с запасным GetInputFocus
pub struct X11WindowResolver<'a, S: X11Requests> {
    session: &'a S,
}

impl<'a, S: X11Requests> X11WindowResolver<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// Прочитать _NET_ACTIVE_WINDOW у корневого окна (ровно одно 32-битное значение)
    fn net_active_window(&self) -> Result<Option<WindowHandle>> {
        // only_if_exists: если атома нет, оконный менеджер его не поддерживает
        let atom = self.session.intern_atom(b"_NET_ACTIVE_WINDOW", true)?;
        if atom == x11rb::NONE {
            debug!("Атом _NET_ACTIVE_WINDOW не зарегистрирован");
            return Ok(None);
        }

        Ok(first_window(self.session.root_window_property(atom)?))
    }

    fn input_focus(&self) -> Result<Option<WindowHandle>> {
        Ok(focus_window(self.session.input_focus()?))
    }
}

/// Значение свойства окна; 0 означает «не задано»
fn first_window(value: Option<u32>) -> Option<WindowHandle> {
    value
        .filter(|&window| window != x11rb::NONE)
        .map(|window| WindowHandle::from_raw(window as u64))
}

fn focus_window(focus: u32) -> Option<WindowHandle> {
    match focus {
        FOCUS_NONE | FOCUS_POINTER_ROOT => None,
        window => Some(WindowHandle::from_raw(window as u64)),
    }
}

fn lossy(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl<S: X11Requests> WindowResolver for X11WindowResolver<'_, S> {
    fn active_window(&self) -> Result<Option<WindowHandle>> {
        match self.net_active_window() {
            Ok(Some(window)) => {
                debug_if_enabled!("_NET_ACTIVE_WINDOW = {}", window);
                return Ok(Some(window));
            }
            Ok(None) => debug!("_NET_ACTIVE_WINDOW не задан, используем GetInputFocus"),
            Err(e) => debug!("Не удалось прочитать _NET_ACTIVE_WINDOW: {}, используем GetInputFocus", e),
        }

        let focus = self.input_focus()?;
        debug_if_enabled!("GetInputFocus = {:?}", focus);
        Ok(focus)
    }

    fn window_info(&self, handle: WindowHandle) -> Result<Option<WindowInfo>> {
        let Ok(window) = u32::try_from(handle.raw()) else {
            return Ok(None);
        };

        // Окно могло закрыться между запросами: это не ошибка
        let (instance, class) = match self.session.wm_class(window) {
            Ok(Some(names)) => names,
            Ok(None) => return Ok(None),
            Err(e) => {
                debug!("WM_CLASS для {} недоступен: {}", handle, e);
                return Ok(None);
            }
        };

        let info = match (lossy(&class), lossy(&instance)) {
            (Some(class), Some(instance)) => WindowInfo::new(handle, class).with_instance(instance),
            (Some(class), None) => WindowInfo::new(handle, class),
            (None, Some(instance)) => WindowInfo::new(handle, String::new()).with_instance(instance),
            (None, None) => return Ok(None),
        };
        Ok(Some(info))
    }
}
