use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};
mod cli;
mod config;
mod error;
mod events;
mod mappings;
mod services;
mod utils;

use config::Config;
use error::{PasteError, EXIT_USAGE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help и --version печатаются в stdout и завершаются с кодом 0
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // Загрузка конфигурации
    let config = match Config::load(args.common.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report(PasteError::Config(e)),
    };

    // Инициализация системы логирования
    let level = args.common.log_level.as_deref().unwrap_or(&config.logging.level);
    if let Err(e) = init_tracing(level, &config.logging.format) {
        eprintln!("WARN: логирование не инициализировано: {}", e);
    }

    info!("Запуск fast-paste v{}", env!("CARGO_PKG_VERSION"));
    debug!("Конфигурация: {:?}", config);

    match cli::run(&args, &config).await {
        Ok(()) => {
            info!("Вставка завершена");
            ExitCode::SUCCESS
        }
        Err(err) => report(err),
    }
}

/// Диагностика в stderr и код завершения для вызывающего процесса
fn report(err: PasteError) -> ExitCode {
    eprintln!("ERROR: {}", err);
    ExitCode::from(err.exit_code())
}

fn init_tracing(level: &str, format: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // stdout занят протоколом вывода, логи только в stderr
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(layer).try_init()?,
        _ => registry.with(layer.compact()).try_init()?,
    }

    Ok(())
}
