//! KeyInjector: доставка последовательности вставки в систему ввода.
//!
//! Бэкенд выбирается один раз при старте по флагам и платформе сборки.

mod dry_run;
#[cfg(target_os = "linux")]
mod display_server;
#[cfg(windows)]
mod native_queue;
mod r#trait;
#[cfg(target_os = "linux")]
pub mod virtual_device;

pub use self::dry_run::DryRunInjector;
#[cfg(target_os = "linux")]
pub use self::display_server::DisplayServerInjector;
#[cfg(windows)]
pub use self::native_queue::NativeQueueInjector;
pub use self::r#trait::KeyInjector;
#[cfg(target_os = "linux")]
pub use self::virtual_device::VirtualDeviceInjector;

/// Доступные бэкенды синтеза
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// XTEST (Linux, по умолчанию)
    DisplayServer,
    /// Виртуальная клавиатура uinput (Linux, `--uinput`)
    VirtualDevice,
    /// SendInput (Windows)
    NativeQueue,
    /// Без инъекции, только план
    DryRun,
}

impl Backend {
    /// Выбор бэкенда для текущей платформы
    pub fn select(use_uinput: bool, dry_run: bool) -> Self {
        if dry_run {
            Backend::DryRun
        } else if cfg!(windows) {
            Backend::NativeQueue
        } else if use_uinput {
            Backend::VirtualDevice
        } else {
            Backend::DisplayServer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_wins() {
        assert_eq!(Backend::select(true, true), Backend::DryRun);
        assert_eq!(Backend::select(false, true), Backend::DryRun);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_selection() {
        assert_eq!(Backend::select(false, false), Backend::DisplayServer);
        assert_eq!(Backend::select(true, false), Backend::VirtualDevice);
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_selection() {
        assert_eq!(Backend::select(false, false), Backend::NativeQueue);
    }
}
