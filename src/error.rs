use thiserror::Error;

/// Код возврата для ошибок командной строки и конфигурации (EX_USAGE)
pub const EXIT_USAGE: u8 = 64;

#[derive(Error, Debug)]
pub enum PasteError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(target_os = "linux")]
    #[error("Не удалось подключиться к X-серверу: {0}")]
    DisplayConnection(#[from] x11rb::errors::ConnectError),

    #[cfg(target_os = "linux")]
    #[error("Ошибка соединения с X-сервером: {0}")]
    X11Connection(#[from] x11rb::errors::ConnectionError),

    #[cfg(target_os = "linux")]
    #[error("Ошибка ответа X-сервера: {0}")]
    X11Reply(#[from] x11rb::errors::ReplyError),

    #[error("Расширение недоступно: {0}")]
    ExtensionUnavailable(String),

    #[error("Не удалось открыть устройство uinput: {0}")]
    DeviceOpen(String),

    #[error("Не удалось настроить виртуальное устройство: {0}")]
    DeviceSetup(String),

    #[error("Поддержка uinput не включена в сборку")]
    UinputUnsupported,

    #[error("Не найдено активное (foreground) окно")]
    NoForegroundWindow,

    #[error("Не удалось получить класс окна: {0}")]
    NoClassName(String),

    #[error("Очередь ввода приняла {sent} из {expected} событий: {reason}")]
    PartialDelivery {
        sent: u32,
        expected: u32,
        reason: String,
    },
}

impl PasteError {
    /// Код завершения процесса, который проверяет вызывающая сторона
    #[cfg(target_os = "linux")]
    pub fn exit_code(&self) -> u8 {
        match self {
            PasteError::Config(_) => EXIT_USAGE,
            PasteError::DisplayConnection(_)
            | PasteError::X11Connection(_)
            | PasteError::X11Reply(_)
            | PasteError::Io(_) => 1,
            PasteError::ExtensionUnavailable(_) => 2,
            PasteError::DeviceOpen(_) | PasteError::UinputUnsupported => 3,
            PasteError::DeviceSetup(_) => 4,
            PasteError::NoForegroundWindow
            | PasteError::NoClassName(_)
            | PasteError::PartialDelivery { .. } => 1,
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn exit_code(&self) -> u8 {
        match self {
            PasteError::Config(_) => EXIT_USAGE,
            PasteError::NoForegroundWindow => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PasteError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! paste_error {
    (extension, $($arg:tt)*) => {
        $crate::error::PasteError::ExtensionUnavailable(format!($($arg)*))
    };
    (device_open, $($arg:tt)*) => {
        $crate::error::PasteError::DeviceOpen(format!($($arg)*))
    };
    (device_setup, $($arg:tt)*) => {
        $crate::error::PasteError::DeviceSetup(format!($($arg)*))
    };
    (no_class, $($arg:tt)*) => {
        $crate::error::PasteError::NoClassName(format!($($arg)*))
    };
}
