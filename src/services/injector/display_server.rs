use super::r#trait::KeyInjector;
use crate::config::TimingConfig;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{KeySequence, KeyState, PasteKey};
use crate::paste_error;
use crate::services::display_session::X11Requests;
use crate::services::DisplaySession;
use tokio::time::sleep;
use tracing::info;
use x11rb::protocol::xproto::{KEY_PRESS_EVENT, KEY_RELEASE_EVENT};
use x11rb::protocol::xtest::ConnectionExt as _;

/// Keycode клавиш комбинации в текущей раскладке сервера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PasteKeycodes {
    ctrl: u8,
    shift: u8,
    v: u8,
}

impl PasteKeycodes {
    fn get(&self, key: PasteKey) -> u8 {
        match key {
            PasteKey::Ctrl => self.ctrl,
            PasteKey::Shift => self.shift,
            PasteKey::V => self.v,
        }
    }
}

/// Синтез через расширение XTEST (XTestFakeKeyEvent)
pub struct DisplayServerInjector<'a> {
    session: &'a DisplaySession,
    keycodes: PasteKeycodes,
    settle_delay: std::time::Duration,
}

impl<'a> DisplayServerInjector<'a> {
    /// Требует XTEST и наличия всех трёх клавиш в раскладке
    pub fn new(session: &'a DisplaySession, timing: &TimingConfig) -> Result<Self> {
        session.require_xtest()?;

        let mapping = session.keyboard_mapping()?;
        let lookup = |key: PasteKey| {
            mapping
                .keycode_for_key(key)
                .ok_or_else(|| paste_error!(extension, "в раскладке нет keycode для '{}'", key))
        };

        let keycodes = PasteKeycodes {
            ctrl: lookup(PasteKey::Ctrl)?,
            shift: lookup(PasteKey::Shift)?,
            v: lookup(PasteKey::V)?,
        };
        debug_if_enabled!("Keycode для вставки: {:?}", keycodes);

        Ok(Self {
            session,
            keycodes,
            settle_delay: timing.settle_delay(),
        })
    }
}

#[async_trait::async_trait]
impl KeyInjector for DisplayServerInjector<'_> {
    fn name(&self) -> &'static str {
        "xtest"
    }

    async fn inject(&mut self, sequence: &KeySequence) -> Result<()> {
        info!("XTEST: отправка {}", sequence.describe());
        let conn = self.session.conn();

        for step in sequence.steps() {
            let event_type = match step.state {
                KeyState::Pressed => KEY_PRESS_EVENT,
                KeyState::Released => KEY_RELEASE_EVENT,
            };
            conn.xtest_fake_input(
                event_type,
                self.keycodes.get(step.key),
                x11rb::CURRENT_TIME,
                x11rb::NONE,
                0,
                0,
                0,
            )?;
            debug_if_enabled!("XTEST событие {}", step);

            // Без flush запросы уйдут одной пачкой и паузы потеряют смысл
            if !step.delay_after.is_zero() {
                self.session.flush()?;
                sleep(step.delay_after).await;
            }
        }

        self.session.flush()?;
        sleep(self.settle_delay).await;
        Ok(())
    }
}
