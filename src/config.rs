use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Верхняя граница для любой фиксированной задержки
const MAX_DELAY_MS: u64 = 1000;

const MAX_DEVICE_NAME_LEN: usize = 78;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub timing: TimingConfig,
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Фиксированные задержки синтеза (миллисекунды)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Пауза между нажатиями внутри комбинации
    pub key_delay_ms: u64,
    /// Пауза после последнего события перед закрытием соединения/устройства
    pub settle_delay_ms: u64,
    /// Время на обработку _NET_ACTIVE_WINDOW оконным менеджером
    pub activation_delay_ms: u64,
    /// Пауза после принудительного XSetInputFocus
    pub focus_settle_ms: u64,
    /// Время регистрации виртуального устройства в ядре
    pub device_register_ms: u64,
    /// Пауза перед SendInput (Windows)
    pub pre_submit_delay_ms: u64,
}

/// Параметры виртуальной клавиатуры uinput
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    pub name: String,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

impl TimingConfig {
    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }

    pub fn focus_settle(&self) -> Duration {
        Duration::from_millis(self.focus_settle_ms)
    }

    pub fn device_register(&self) -> Duration {
        Duration::from_millis(self.device_register_ms)
    }

    pub fn pre_submit_delay(&self) -> Duration {
        Duration::from_millis(self.pre_submit_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "compact".to_string(),
            },
            timing: TimingConfig {
                key_delay_ms: 8,
                settle_delay_ms: 20,
                activation_delay_ms: 50,
                focus_settle_ms: 20,
                device_register_ms: 50,
                pre_submit_delay_ms: 5,
            },
            device: DeviceConfig {
                name: "fast-paste".to_string(),
                vendor: 0x1234,
                product: 0x5678,
                version: 1,
            },
        }
    }
}

impl Config {
    /// Загрузить конфигурацию: значения по умолчанию, затем TOML-файл (если указан),
    /// затем переменные окружения `FAST_PASTE_*`
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!("Файл конфигурации не найден: {:?}", path);
            }
            figment = figment.merge(Toml::file(path));
        }

        Self::from_figment(figment.merge(Env::prefixed("FAST_PASTE_").split("__")))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .context("Не удалось загрузить конфигурацию")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация задержек
        let delays = [
            ("key_delay_ms", self.timing.key_delay_ms),
            ("settle_delay_ms", self.timing.settle_delay_ms),
            ("activation_delay_ms", self.timing.activation_delay_ms),
            ("focus_settle_ms", self.timing.focus_settle_ms),
            ("device_register_ms", self.timing.device_register_ms),
            ("pre_submit_delay_ms", self.timing.pre_submit_delay_ms),
        ];
        for (name, value) in delays {
            if value > MAX_DELAY_MS {
                anyhow::bail!("{} должно быть не больше {} (получено {})", name, MAX_DELAY_MS, value);
            }
        }

        // События до завершения регистрации устройства теряются
        if self.timing.device_register_ms == 0 {
            anyhow::bail!("device_register_ms должно быть больше 0");
        }

        // Валидация виртуального устройства
        if self.device.name.is_empty() {
            anyhow::bail!("Пустое имя виртуального устройства");
        }
        // UINPUT_MAX_NAME_SIZE = 80, evdev требует запас под завершающий ноль
        if self.device.name.len() > MAX_DEVICE_NAME_LEN {
            anyhow::bail!("Имя виртуального устройства длиннее {} байт", MAX_DEVICE_NAME_LEN);
        }

        Ok(())
    }
}
