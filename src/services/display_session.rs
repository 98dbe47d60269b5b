use crate::error::{PasteError, Result};
use crate::mappings::KeyboardMapping;
use crate::paste_error;
use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::properties::WmClass;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask, InputFocus, Window,
};
use x11rb::protocol::xtest;
use x11rb::rust_connection::RustConnection;

/// Пара WM_CLASS: (instance, class) в сыром виде
pub type WmClassNames = (Vec<u8>, Vec<u8>);

/// Запросы к X-серверу, которые нужны для определения и активации окна
pub trait X11Requests {
    /// InternAtom; при `only_if_exists` незарегистрированный атом даёт NONE
    fn intern_atom(&self, name: &[u8], only_if_exists: bool) -> Result<Atom>;

    /// Первое 32-битное значение свойства корневого окна типа WINDOW
    fn root_window_property(&self, property: Atom) -> Result<Option<u32>>;

    /// Поле focus ответа GetInputFocus
    fn input_focus(&self) -> Result<Window>;

    fn wm_class(&self, window: Window) -> Result<Option<WmClassNames>>;

    /// SendEvent корневому окну с SUBSTRUCTURE_NOTIFY | SUBSTRUCTURE_REDIRECT
    fn send_to_root(&self, event: ClientMessageEvent) -> Result<()>;

    /// SetInputFocus(PARENT, window, CurrentTime)
    fn set_input_focus(&self, window: Window) -> Result<()>;

    fn flush(&self) -> Result<()>;
}

/// Соединение с X-сервером на время одного вызова.
///
/// Закрывается при Drop, поэтому все отложенные запросы нужно
/// отправить `flush()` до выхода из процесса.
pub struct DisplaySession {
    conn: RustConnection,
    root: Window,
}

impl DisplaySession {
    /// Подключиться к дисплею из `$DISPLAY`
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| {
                PasteError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("экран {} отсутствует в setup", screen_num),
                ))
            })?;

        info!("Подключение к X-серверу установлено (экран {}, root 0x{:x})", screen_num, root);
        Ok(Self { conn, root })
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    /// Проверить наличие XTEST; без него синтез невозможен
    pub fn require_xtest(&self) -> Result<()> {
        match self.conn.extension_information(xtest::X11_EXTENSION_NAME)? {
            Some(ext) => {
                debug!("XTEST доступен (major opcode {})", ext.major_opcode);
                Ok(())
            }
            None => Err(paste_error!(extension, "{} не поддерживается X-сервером", xtest::X11_EXTENSION_NAME)),
        }
    }

    /// Снимок текущей раскладки для поиска keycode по keysym
    pub fn keyboard_mapping(&self) -> Result<KeyboardMapping> {
        let setup = self.conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode - min_keycode + 1;

        let reply = self.conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
        debug!(
            "Получена раскладка: {} keycode, {} keysym на keycode",
            count, reply.keysyms_per_keycode
        );

        Ok(KeyboardMapping {
            min_keycode,
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms,
        })
    }
}

impl X11Requests for DisplaySession {
    fn intern_atom(&self, name: &[u8], only_if_exists: bool) -> Result<Atom> {
        Ok(self.conn.intern_atom(only_if_exists, name)?.reply()?.atom)
    }

    fn root_window_property(&self, property: Atom) -> Result<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, self.root, property, AtomEnum::WINDOW, 0, 1)?
            .reply()?;
        Ok(reply.value32().and_then(|mut values| values.next()))
    }

    fn input_focus(&self) -> Result<Window> {
        Ok(self.conn.get_input_focus()?.reply()?.focus)
    }

    fn wm_class(&self, window: Window) -> Result<Option<WmClassNames>> {
        let wm_class = WmClass::get(&self.conn, window)?.reply()?;
        Ok(wm_class.map(|wm_class| (wm_class.instance().to_vec(), wm_class.class().to_vec())))
    }

    fn send_to_root(&self, event: ClientMessageEvent) -> Result<()> {
        self.conn.send_event(
            false,
            self.root,
            EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
            event,
        )?;
        Ok(())
    }

    fn set_input_focus(&self, window: Window) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::PARENT, window, x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }
}

/// Записывающая подмена X-сервера для тестов
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tokio::time::Instant;
    use x11rb::errors::{ConnectionError, ReplyError};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Request {
        InternAtom(String),
        RootProperty(Atom),
        InputFocus,
        WmClass(Window),
        SendToRoot { window: Window, type_: Atom, data: [u32; 5] },
        SetInputFocus(Window),
        Flush,
    }

    /// Состояние сервера: атомы, свойство корня, фокус и классы окон
    #[derive(Default)]
    pub struct FakeSession {
        atoms: HashMap<&'static str, Atom>,
        active_window: Option<u32>,
        focus: Window,
        classes: HashMap<Window, (&'static str, &'static str)>,
        broken: bool,
        log: RefCell<Vec<(Request, Instant)>>,
    }

    impl FakeSession {
        pub fn new() -> Self {
            Self::default()
        }

        /// Оконный менеджер с поддержкой EWMH
        pub fn with_wm(mut self) -> Self {
            self.atoms.insert("_NET_ACTIVE_WINDOW", 301);
            self
        }

        pub fn with_active_window(mut self, window: u32) -> Self {
            self.active_window = Some(window);
            self
        }

        pub fn with_focus(mut self, focus: Window) -> Self {
            self.focus = focus;
            self
        }

        pub fn with_class(mut self, window: Window, instance: &'static str, class: &'static str) -> Self {
            self.classes.insert(window, (instance, class));
            self
        }

        /// Каждый запрос завершается ошибкой соединения
        pub fn broken(mut self) -> Self {
            self.broken = true;
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.log.borrow().iter().map(|(request, _)| request.clone()).collect()
        }

        pub fn timed_requests(&self) -> Vec<(Request, Instant)> {
            self.log.borrow().clone()
        }

        fn record(&self, request: Request) -> Result<()> {
            self.log.borrow_mut().push((request, Instant::now()));
            if self.broken {
                return Err(PasteError::X11Reply(ReplyError::ConnectionError(
                    ConnectionError::UnknownError,
                )));
            }
            Ok(())
        }
    }

    impl X11Requests for FakeSession {
        fn intern_atom(&self, name: &[u8], only_if_exists: bool) -> Result<Atom> {
            let name = String::from_utf8_lossy(name).into_owned();
            self.record(Request::InternAtom(name.clone()))?;
            match self.atoms.get(name.as_str()) {
                Some(&atom) => Ok(atom),
                None if only_if_exists => Ok(x11rb::NONE),
                None => Ok(999),
            }
        }

        fn root_window_property(&self, property: Atom) -> Result<Option<u32>> {
            self.record(Request::RootProperty(property))?;
            Ok(self.active_window)
        }

        fn input_focus(&self) -> Result<Window> {
            self.record(Request::InputFocus)?;
            Ok(self.focus)
        }

        fn wm_class(&self, window: Window) -> Result<Option<WmClassNames>> {
            self.record(Request::WmClass(window))?;
            Ok(self.classes.get(&window).map(|(instance, class)| {
                (instance.as_bytes().to_vec(), class.as_bytes().to_vec())
            }))
        }

        fn send_to_root(&self, event: ClientMessageEvent) -> Result<()> {
            self.record(Request::SendToRoot {
                window: event.window,
                type_: event.type_,
                data: event.data.as_data32(),
            })
        }

        fn set_input_focus(&self, window: Window) -> Result<()> {
            self.record(Request::SetInputFocus(window))
        }

        fn flush(&self) -> Result<()> {
            self.record(Request::Flush)
        }
    }
}
