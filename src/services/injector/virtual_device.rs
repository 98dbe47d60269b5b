use super::r#trait::KeyInjector;
use crate::config::TimingConfig;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{KeySequence, KeyState, PasteKey};
use tokio::time::sleep;
use tracing::{info, warn};

/// Клавиши, которые регистрируются у виртуального устройства (не вся клавиатура)
pub const REGISTERED_KEYS: [PasteKey; 3] = [PasteKey::Ctrl, PasteKey::Shift, PasteKey::V];

/// Открытие интерфейса создания устройств (/dev/uinput)
pub trait VirtualKeyboardBackend: Send + Sync {
    type Builder: VirtualKeyboardBuilder;

    /// Ошибка здесь означает, что интерфейс недоступен (код 3)
    fn open(&self) -> Result<Self::Builder>;
}

/// Настройка ещё не созданного устройства.
///
/// Builder владеет дескриптором: при ошибке он уничтожается вместе
/// с builder-ом, поэтому ранний выход не оставляет открытых дескрипторов.
pub trait VirtualKeyboardBuilder: Sized + Send {
    type Device: VirtualKeyboard;

    /// UI_SET_EVBIT / UI_SET_KEYBIT
    fn enable_key(self, key: PasteKey) -> Result<Self>;

    /// UI_DEV_CREATE
    fn create(self) -> Result<Self::Device>;
}

/// Созданное устройство; UI_DEV_DESTROY и close выполняются в Drop
pub trait VirtualKeyboard: Send {
    /// Событие EV_KEY и следующий за ним SYN_REPORT
    fn emit(&mut self, key: PasteKey, state: KeyState) -> Result<()>;
}

/// Синтез через временную виртуальную клавиатуру ядра
pub struct VirtualDeviceInjector<B: VirtualKeyboardBackend> {
    backend: B,
    timing: TimingConfig,
}

impl<B: VirtualKeyboardBackend> VirtualDeviceInjector<B> {
    pub fn new(backend: B, timing: TimingConfig) -> Self {
        Self { backend, timing }
    }

    fn setup(&self) -> Result<<B::Builder as VirtualKeyboardBuilder>::Device> {
        let mut builder = self.backend.open()?;
        for key in REGISTERED_KEYS {
            builder = builder.enable_key(key)?;
        }
        builder.create()
    }
}

#[async_trait::async_trait]
impl<B: VirtualKeyboardBackend> KeyInjector for VirtualDeviceInjector<B> {
    fn name(&self) -> &'static str {
        "uinput"
    }

    async fn inject(&mut self, sequence: &KeySequence) -> Result<()> {
        // Любая ошибка настройки прерывает работу до первого события
        let mut device = self.setup()?;
        info!("Виртуальное устройство создано, ожидание регистрации в ядре");

        // События до окончания регистрации молча теряются
        sleep(self.timing.device_register()).await;

        let mut failed = 0usize;
        for step in sequence.steps() {
            // Повтор мог бы нарушить порядок модификаторов: только логируем
            if let Err(e) = device.emit(step.key, step.state) {
                warn!("Не удалось отправить событие {}: {}", step, e);
                failed += 1;
            } else {
                debug_if_enabled!("uinput событие {}", step);
            }

            if !step.delay_after.is_zero() {
                sleep(step.delay_after).await;
            }
        }

        if failed > 0 {
            warn!("{} из {} событий не были записаны в устройство", failed, sequence.len());
        }

        sleep(self.timing.settle_delay()).await;

        drop(device);
        info!("Виртуальное устройство уничтожено");
        Ok(())
    }
}

#[cfg(feature = "uinput")]
pub use self::uinput_backend::UinputBackend;

#[cfg(feature = "uinput")]
mod uinput_backend {
    use super::{VirtualKeyboard, VirtualKeyboardBackend, VirtualKeyboardBuilder};
    use crate::config::DeviceConfig;
    use crate::error::Result;
    use crate::events::{KeyState, PasteKey};
    use crate::mappings::PasteKeyToEvdev;
    use crate::paste_error;
    use crate::utils::permissions;
    use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
    use evdev::{AttributeSet, BusType, EventType, InputEvent, InputId, KeyCode};
    use tracing::info;

    /// Виртуальная клавиатура на evdev::uinput.
    ///
    /// Дескриптор /dev/uinput хранится как OwnedFd и в builder-е, и в
    /// устройстве: close (и вместе с ним UI_DEV_DESTROY) выполняется в Drop.
    pub struct UinputBackend {
        device: DeviceConfig,
    }

    impl UinputBackend {
        pub fn new(device: DeviceConfig) -> Self {
            Self { device }
        }
    }

    impl VirtualKeyboardBackend for UinputBackend {
        type Builder = UinputBuilder;

        fn open(&self) -> Result<UinputBuilder> {
            info!("Создание виртуального устройства uinput '{}'", self.device.name);

            let builder = VirtualDevice::builder().map_err(|e| {
                permissions::warn_uinput_access();
                paste_error!(device_open, "{}", e)
            })?;

            let id = InputId::new(
                BusType::BUS_USB,
                self.device.vendor,
                self.device.product,
                self.device.version,
            );

            Ok(UinputBuilder {
                builder: builder.input_id(id),
                name: self.device.name.clone(),
            })
        }
    }

    pub struct UinputBuilder {
        builder: VirtualDeviceBuilder<'static>,
        name: String,
    }

    impl VirtualKeyboardBuilder for UinputBuilder {
        type Device = UinputKeyboard;

        fn enable_key(self, key: PasteKey) -> Result<Self> {
            let mut keys = AttributeSet::<KeyCode>::new();
            keys.insert(PasteKeyToEvdev::translate(key));

            let builder = self
                .builder
                .with_keys(&keys)
                .map_err(|e| paste_error!(device_setup, "регистрация клавиши '{}': {}", key, e))?;
            Ok(Self { builder, ..self })
        }

        fn create(self) -> Result<UinputKeyboard> {
            let UinputBuilder { builder, name } = self;
            let builder: VirtualDeviceBuilder<'_> = builder;

            let device = builder
                .name(name.as_str())
                .build()
                .map_err(|e| paste_error!(device_setup, "UI_DEV_CREATE: {}", e))?;
            Ok(UinputKeyboard(device))
        }
    }

    pub struct UinputKeyboard(VirtualDevice);

    impl VirtualKeyboard for UinputKeyboard {
        fn emit(&mut self, key: PasteKey, state: KeyState) -> Result<()> {
            // emit дописывает SYN_REPORT после пачки событий
            let event = InputEvent::new(
                EventType::KEY.0,
                PasteKeyToEvdev::code(key),
                state.evdev_value(),
            );
            self.0.emit(&[event])?;
            Ok(())
        }
    }

}
