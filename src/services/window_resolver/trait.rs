use crate::error::Result;
use crate::events::{WindowHandle, WindowInfo};

/// Trait for resolving the window that currently receives keyboard input
pub trait WindowResolver {
    /// Активное окно или `None`, если система его не сообщает
    fn active_window(&self) -> Result<Option<WindowHandle>>;

    /// Класс окна; `None`, если окно не имеет класса или уже закрыто
    fn window_info(&self, handle: WindowHandle) -> Result<Option<WindowInfo>>;
}
