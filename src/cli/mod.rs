//! Командная строка: общие аргументы и сценарий вставки для платформы сборки

use clap::Args as ClapArgs;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "linux")]
pub use self::linux::{run, Args};
#[cfg(windows)]
pub use self::windows::{run, Args};

/// Аргументы, одинаковые для всех платформ
#[derive(ClapArgs, Debug, Default)]
pub struct CommonArgs {
    /// Путь к файлу конфигурации (TOML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Уровень логирования (перекрывает конфигурацию, RUST_LOG имеет приоритет)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}
