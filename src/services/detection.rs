use crate::events::{WindowHandle, WindowInfo};
use crate::services::terminal_classifier::TerminalRegistry;
use crate::services::window_resolver::WindowResolver;
use tracing::{debug, info};

/// Результат определения цели вставки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub window: Option<WindowHandle>,
    pub info: Option<WindowInfo>,
    pub terminal: bool,
}

impl Detection {
    /// Класс окна для вывода (`-`, если неизвестен)
    pub fn class_label(&self) -> &str {
        match &self.info {
            Some(info) if !info.class.is_empty() => &info.class,
            Some(info) => info.instance.as_deref().unwrap_or("-"),
            None => "-",
        }
    }
}

/// Определить окно и его тип без фатальных ошибок.
///
/// Явно указанное окно имеет приоритет над активным; `force_terminal`
/// пропускает чтение класса. Ошибки запросов дают «нет окна».
pub fn detect_target<R: WindowResolver>(
    resolver: &R,
    registry: &TerminalRegistry,
    explicit: Option<WindowHandle>,
    force_terminal: bool,
) -> Detection {
    let window = explicit.or_else(|| match resolver.active_window() {
        Ok(window) => window,
        Err(e) => {
            debug!("Не удалось определить активное окно: {}", e);
            None
        }
    });

    if force_terminal {
        info!("Режим терминала задан явно, классификация пропущена");
        return Detection {
            window,
            info: None,
            terminal: true,
        };
    }

    let info = window.and_then(|handle| match resolver.window_info(handle) {
        Ok(info) => info,
        Err(e) => {
            debug!("Не удалось прочитать класс окна {}: {}", handle, e);
            None
        }
    });

    let terminal = info
        .as_ref()
        .is_some_and(|info| registry.classify(Some(info.class.as_str()), info.instance.as_deref()));

    match &info {
        Some(info) => info!("Целевое окно {}, терминал: {}", info, terminal),
        None => info!("Класс целевого окна неизвестен, используется Ctrl+V"),
    }

    Detection {
        window,
        info,
        terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PasteError, Result};
    use crate::services::terminal_classifier::LINUX_TERMINALS;
    use std::cell::Cell;

    struct FakeResolver {
        active: Result<Option<WindowHandle>>,
        class: Option<(&'static str, &'static str)>,
        info_calls: Cell<usize>,
    }

    impl FakeResolver {
        fn new(active: Option<u64>, class: Option<(&'static str, &'static str)>) -> Self {
            Self {
                active: Ok(active.map(WindowHandle::from_raw)),
                class,
                info_calls: Cell::new(0),
            }
        }
    }

    impl WindowResolver for FakeResolver {
        fn active_window(&self) -> Result<Option<WindowHandle>> {
            match &self.active {
                Ok(window) => Ok(*window),
                Err(_) => Err(PasteError::NoForegroundWindow),
            }
        }

        fn window_info(&self, handle: WindowHandle) -> Result<Option<WindowInfo>> {
            self.info_calls.set(self.info_calls.get() + 1);
            Ok(self.class.map(|(class, instance)| {
                WindowInfo::new(handle, class.to_string()).with_instance(instance.to_string())
            }))
        }
    }

    #[test]
    fn test_terminal_window_detected() {
        let resolver = FakeResolver::new(Some(0x42), Some(("Gnome-terminal", "gnome-terminal-server")));
        let detection = detect_target(&resolver, &LINUX_TERMINALS, None, false);

        assert_eq!(detection.window, Some(WindowHandle::from_raw(0x42)));
        assert!(detection.terminal);
        assert_eq!(detection.class_label(), "Gnome-terminal");
    }

    #[test]
    fn test_regular_window() {
        let resolver = FakeResolver::new(Some(0x42), Some(("firefox", "Navigator")));
        let detection = detect_target(&resolver, &LINUX_TERMINALS, None, false);
        assert!(!detection.terminal);
    }

    #[test]
    fn test_explicit_window_overrides_active() {
        let resolver = FakeResolver::new(Some(0x42), Some(("kitty", "kitty")));
        let explicit = WindowHandle::from_raw(0x2400007);
        let detection = detect_target(&resolver, &LINUX_TERMINALS, Some(explicit), false);
        assert_eq!(detection.window, Some(explicit));
    }

    #[test]
    fn test_force_terminal_skips_class_query() {
        let resolver = FakeResolver::new(Some(0x42), Some(("firefox", "Navigator")));
        let detection = detect_target(&resolver, &LINUX_TERMINALS, None, true);

        assert!(detection.terminal);
        assert_eq!(resolver.info_calls.get(), 0);
        assert_eq!(detection.class_label(), "-");
    }

    #[test]
    fn test_no_window_is_not_terminal() {
        let resolver = FakeResolver::new(None, Some(("kitty", "kitty")));
        let detection = detect_target(&resolver, &LINUX_TERMINALS, None, false);

        assert_eq!(detection.window, None);
        assert!(!detection.terminal);
        assert_eq!(resolver.info_calls.get(), 0);
    }

    #[test]
    fn test_resolver_error_is_not_fatal() {
        let resolver = FakeResolver {
            active: Err(PasteError::NoForegroundWindow),
            class: None,
            info_calls: Cell::new(0),
        };
        let detection = detect_target(&resolver, &LINUX_TERMINALS, None, false);
        assert_eq!(detection.window, None);
        assert!(!detection.terminal);
    }
}
