use super::CommonArgs;
use crate::config::Config;
use crate::error::{PasteError, Result};
use crate::events::KeySequence;
use crate::paste_error;
use crate::services::injector::NativeQueueInjector;
use crate::services::terminal_classifier::WINDOWS_TERMINALS;
use crate::services::window_resolver::{ForegroundResolver, WindowResolver};
use crate::services::KeyInjector;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fast-paste", version)]
#[command(about = "Синтез Ctrl+V (Ctrl+Shift+V для терминалов) в окно переднего плана")]
pub struct Args {
    /// Только определить класс окна и тип, без отправки ввода
    #[arg(long)]
    pub detect_only: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: &Args, config: &Config) -> Result<()> {
    let resolver = ForegroundResolver::new();

    // Запасного способа определить фокус на Windows нет
    let window = resolver.active_window()?.ok_or(PasteError::NoForegroundWindow)?;
    let info = resolver
        .window_info(window)?
        .filter(|info| !info.class.is_empty())
        .ok_or_else(|| paste_error!(no_class, "пустое имя класса окна {}", window))?;

    let terminal = WINDOWS_TERMINALS.classify(Some(info.class.as_str()), None);
    info!("Окно переднего плана {}, терминал: {}", info, terminal);

    if args.detect_only {
        println!("WINDOW_CLASS {}", info.class);
        println!("IS_TERMINAL {}", terminal);
        return Ok(());
    }

    let sequence = KeySequence::paste(terminal, config.timing.key_delay());
    let mut injector = NativeQueueInjector::new(config.timing.clone());
    injector.inject(&sequence).await?;

    println!("PASTE_OK {} {}", info.class, sequence.describe());
    Ok(())
}
