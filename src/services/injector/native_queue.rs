use super::r#trait::KeyInjector;
use crate::config::TimingConfig;
use crate::error::{PasteError, Result};
use crate::events::{KeySequence, KeyState};
use crate::mappings::PasteKeyToVirtualKey;
use tokio::time::sleep;
use tracing::{debug, info};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
};

/// Синтез через SendInput: вся последовательность уходит одним вызовом
pub struct NativeQueueInjector {
    timing: TimingConfig,
}

impl NativeQueueInjector {
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }
}

fn build_inputs(sequence: &KeySequence) -> Vec<INPUT> {
    sequence
        .steps()
        .iter()
        .map(|step| {
            let flags = match step.state {
                KeyState::Pressed => KEYBD_EVENT_FLAGS(0),
                KeyState::Released => KEYEVENTF_KEYUP,
            };
            INPUT {
                r#type: INPUT_KEYBOARD,
                Anonymous: INPUT_0 {
                    ki: KEYBDINPUT {
                        wVk: PasteKeyToVirtualKey::translate(step.key),
                        dwFlags: flags,
                        ..Default::default()
                    },
                },
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl KeyInjector for NativeQueueInjector {
    fn name(&self) -> &'static str {
        "sendinput"
    }

    async fn inject(&mut self, sequence: &KeySequence) -> Result<()> {
        // Окно, только что получившее фокус, должно успеть стабилизироваться
        sleep(self.timing.pre_submit_delay()).await;

        let inputs = build_inputs(sequence);
        let expected = inputs.len() as u32;

        // SAFETY: срез INPUT полностью инициализирован, размер структуры передаётся явно
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        debug!("SendInput принял {} из {} событий", sent, expected);

        // Уже поставленные в очередь события отозвать нельзя: только сообщаем
        if sent != expected {
            let reason = windows::core::Error::from_win32().to_string();
            return Err(PasteError::PartialDelivery { sent, expected, reason });
        }

        info!("SendInput: {} отправлен", sequence.describe());
        sleep(self.timing.settle_delay()).await;
        Ok(())
    }
}
