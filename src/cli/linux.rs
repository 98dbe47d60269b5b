use super::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::events::{KeySequence, WindowHandle};
use crate::paste_error;
use crate::services::display_session::X11Requests;
use crate::services::injector::{DisplayServerInjector, DryRunInjector};
use crate::services::terminal_classifier::LINUX_TERMINALS;
use crate::services::window_resolver::X11WindowResolver;
use crate::services::{detect_target, Backend, Detection, DisplaySession, KeyInjector, WindowActivator};
use crate::utils::parse_window_id;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fast-paste", version)]
#[command(about = "Синтез Ctrl+V (Ctrl+Shift+V для терминалов) в активное окно")]
pub struct Args {
    /// Принудительно Ctrl+Shift+V без определения класса окна
    #[arg(long)]
    pub terminal: bool,

    /// Использовать виртуальную клавиатуру uinput вместо XTEST
    #[arg(long)]
    pub uinput: bool,

    /// Окно-цель (число в любой системе счисления); перед вставкой активируется
    #[arg(long, value_name = "ID", value_parser = parse_window_id)]
    pub window: Option<u64>,

    /// Определить цель и вывести план без отправки событий
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Args {
    /// 0 означает None в X11, такое окно не активируется
    fn explicit_window(&self) -> Option<WindowHandle> {
        self.window.filter(|&id| id != 0).map(WindowHandle::from_raw)
    }

    /// Нужен ли X-сервер хотя бы для классификации
    fn wants_display(&self) -> bool {
        !self.uinput || !self.terminal || self.explicit_window().is_some()
    }
}

pub async fn run(args: &Args, config: &Config) -> Result<()> {
    let backend = Backend::select(args.uinput, args.dry_run);
    let explicit = args.explicit_window();
    info!("Бэкенд: {:?}, окно: {:?}", backend, explicit);

    let session = open_session(args)?;

    // XTEST проверяется до активации окна: без него вставка невозможна
    let mut injector = create_injector(backend, args, session.as_ref(), config)?;

    let detection = match &session {
        Some(session) => {
            if let Some(window) = explicit {
                activate_window(session, config, window, args.uinput).await?;
            }
            let resolver = X11WindowResolver::new(session);
            detect_target(&resolver, &LINUX_TERMINALS, explicit, args.terminal)
        }
        None => Detection {
            window: explicit,
            info: None,
            terminal: args.terminal,
        },
    };

    let sequence = KeySequence::paste(detection.terminal, config.timing.key_delay());
    info!("Отправка {} через {}: {}", sequence.describe(), injector.name(), sequence);
    injector.inject(&sequence).await?;

    if args.dry_run {
        print_plan(&detection, &sequence);
    }
    Ok(())
}

/// В режиме uinput дисплей необязателен: ошибки активации только логируются
async fn activate_window<S: X11Requests>(
    session: &S,
    config: &Config,
    window: WindowHandle,
    lenient: bool,
) -> Result<()> {
    match WindowActivator::new(session, &config.timing).activate(window).await {
        Err(e) if lenient => {
            warn!("Не удалось активировать окно {} ({}), продолжаем без активации", window, e);
            Ok(())
        }
        result => result,
    }
}

fn open_session(args: &Args) -> Result<Option<DisplaySession>> {
    if !args.wants_display() {
        return Ok(None);
    }
    if !args.uinput {
        return DisplaySession::connect().map(Some);
    }

    // В режиме uinput дисплей нужен только для классификации
    match DisplaySession::connect() {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            warn!("X-сервер недоступен ({}), класс окна не определяется", e);
            Ok(None)
        }
    }
}

fn create_injector<'a>(
    backend: Backend,
    args: &Args,
    session: Option<&'a DisplaySession>,
    config: &Config,
) -> Result<Box<dyn KeyInjector + Send + 'a>> {
    match backend {
        Backend::DisplayServer => {
            let session = session.ok_or_else(|| paste_error!(extension, "нет соединения с X-сервером"))?;
            Ok(Box::new(DisplayServerInjector::new(session, &config.timing)?))
        }
        Backend::VirtualDevice => virtual_device_injector(config),
        Backend::DryRun => {
            // Сухой запуск сообщает те же ошибки окружения, что и реальный
            if args.uinput {
                virtual_device_injector(config)?;
            } else if let Some(session) = session {
                session.require_xtest()?;
            }
            Ok(Box::new(DryRunInjector::new()))
        }
        Backend::NativeQueue => Err(paste_error!(extension, "SendInput недоступен на Linux")),
    }
}

#[cfg(feature = "uinput")]
fn virtual_device_injector<'a>(config: &Config) -> Result<Box<dyn KeyInjector + Send + 'a>> {
    use crate::services::injector::virtual_device::UinputBackend;
    use crate::services::injector::VirtualDeviceInjector;

    Ok(Box::new(VirtualDeviceInjector::new(
        UinputBackend::new(config.device.clone()),
        config.timing.clone(),
    )))
}

#[cfg(not(feature = "uinput"))]
fn virtual_device_injector<'a>(_config: &Config) -> Result<Box<dyn KeyInjector + Send + 'a>> {
    Err(crate::error::PasteError::UinputUnsupported)
}

fn print_plan(detection: &Detection, sequence: &KeySequence) {
    let target = detection
        .window
        .map(|window| window.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!("TARGET {} {}", target, detection.class_label());
    println!("IS_TERMINAL {}", detection.terminal);
    println!("PLAN {}", sequence.describe());
}
