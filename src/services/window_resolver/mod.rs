//! WindowResolver: определение окна, получающего ввод, и чтение его класса.
//!
//! Модуль только читает состояние рабочего стола и ничего не решает
//! о комбинации клавиш; классификация выполняется в terminal_classifier.

#[cfg(windows)]
mod foreground;
mod r#trait;
#[cfg(target_os = "linux")]
mod x11;

#[cfg(windows)]
pub use self::foreground::ForegroundResolver;
pub use self::r#trait::WindowResolver;
#[cfg(target_os = "linux")]
pub use self::x11::X11WindowResolver;
