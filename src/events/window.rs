use std::fmt;

/// Непрозрачный идентификатор окна ОС (X11 Window или HWND).
///
/// Окно нам не принадлежит: дескриптор никогда не закрывается и может
/// стать недействительным в любой момент.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Информация о классе окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    /// WM_CLASS res_class (X11) или зарегистрированный класс окна (Windows)
    pub class: String,
    /// WM_CLASS res_name (только X11)
    pub instance: Option<String>,
}

impl WindowInfo {
    pub fn new(handle: WindowHandle, class: String) -> Self {
        Self {
            handle,
            class,
            instance: None,
        }
    }

    pub fn with_instance(mut self, instance: String) -> Self {
        self.instance = Some(instance);
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{} ({}/{})", self.handle, self.class, instance),
            None => write!(f, "{} ({})", self.handle, self.class),
        }
    }
}
