use crate::config::TimingConfig;
use crate::error::Result;
use crate::events::WindowHandle;
use crate::services::display_session::X11Requests;
use tokio::time::sleep;
use tracing::{debug, info};
use x11rb::protocol::xproto::ClientMessageEvent;

/// Источник запроса в _NET_ACTIVE_WINDOW: 2 = pager / прямой вызов
const SOURCE_INDICATION_PAGER: u32 = 2;

/// Активация окна: сначала просим оконный менеджер, затем форсируем фокус.
///
/// Подтверждения на _NET_ACTIVE_WINDOW не существует, поэтому после
/// запроса остаётся только подождать и выставить фокус напрямую.
pub struct WindowActivator<'a, S: X11Requests> {
    session: &'a S,
    timing: &'a TimingConfig,
}

impl<'a, S: X11Requests> WindowActivator<'a, S> {
    pub fn new(session: &'a S, timing: &'a TimingConfig) -> Self {
        Self { session, timing }
    }

    pub async fn activate(&self, window: WindowHandle) -> Result<()> {
        let Ok(target) = u32::try_from(window.raw()) else {
            debug!("Идентификатор {} не помещается в X11 Window, активация пропущена", window);
            return Ok(());
        };

        info!("Активация окна {}", window);

        let net_active_window = self.session.intern_atom(b"_NET_ACTIVE_WINDOW", false)?;
        self.session
            .send_to_root(activation_request(target, net_active_window))?;
        self.session.flush()?;

        sleep(self.timing.activation_delay()).await;

        // Оконный менеджер мог проигнорировать запрос или отсутствовать
        self.session.set_input_focus(target)?;
        self.session.flush()?;
        debug!("XSetInputFocus({}) отправлен", window);

        sleep(self.timing.focus_settle()).await;
        Ok(())
    }
}

fn activation_request(target: u32, net_active_window: u32) -> ClientMessageEvent {
    ClientMessageEvent::new(
        32,
        target,
        net_active_window,
        [SOURCE_INDICATION_PAGER, x11rb::CURRENT_TIME, 0, 0, 0],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::display_session::fake::{FakeSession, Request};
    use std::time::Duration;

    #[test]
    fn test_activation_request_layout() {
        let event = activation_request(0x2400007, 301);
        assert_eq!(event.format, 32);
        assert_eq!(event.window, 0x2400007);
        assert_eq!(event.type_, 301);
        assert_eq!(event.data.as_data32(), [2, 0, 0, 0, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_then_forced_focus() {
        let session = FakeSession::new().with_wm();
        let timing = Config::default().timing;

        WindowActivator::new(&session, &timing)
            .activate(WindowHandle::from_raw(0x2400007))
            .await
            .unwrap();

        let timed = session.timed_requests();
        let requests: Vec<Request> = timed.iter().map(|(r, _)| r.clone()).collect();
        assert_eq!(
            requests,
            vec![
                Request::InternAtom("_NET_ACTIVE_WINDOW".to_string()),
                Request::SendToRoot {
                    window: 0x2400007,
                    type_: 301,
                    data: [2, 0, 0, 0, 0],
                },
                Request::Flush,
                Request::SetInputFocus(0x2400007),
                Request::Flush,
            ]
        );

        // Между запросом и принудительным фокусом выдержана пауза активации
        let sent_at = timed[2].1;
        let forced_at = timed[3].1;
        assert!(forced_at - sent_at >= Duration::from_millis(timing.activation_delay_ms));
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_forced_without_window_manager() {
        // Атом создаётся заново, клиентское сообщение никто не обработает
        let session = FakeSession::new();
        let timing = Config::default().timing;

        WindowActivator::new(&session, &timing)
            .activate(WindowHandle::from_raw(0x2400007))
            .await
            .unwrap();

        let requests = session.requests();
        assert!(requests.contains(&Request::SetInputFocus(0x2400007)));
        assert_eq!(requests.last(), Some(&Request::Flush));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_id_is_skipped() {
        let session = FakeSession::new().with_wm();
        let timing = Config::default().timing;

        WindowActivator::new(&session, &timing)
            .activate(WindowHandle::from_raw(u64::from(u32::MAX) + 1))
            .await
            .unwrap();
        assert!(session.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_is_reported() {
        let session = FakeSession::new().with_wm().broken();
        let timing = Config::default().timing;

        let err = WindowActivator::new(&session, &timing)
            .activate(WindowHandle::from_raw(0x2400007))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
