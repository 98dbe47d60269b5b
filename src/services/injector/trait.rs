use crate::error::Result;
use crate::events::KeySequence;

/// Trait for key injectors that deliver a synthesized sequence to the focused window
#[async_trait::async_trait]
pub trait KeyInjector {
    /// Короткое имя бэкенда для логов
    fn name(&self) -> &'static str;

    /// Отправить последовательность целиком, включая паузы между событиями
    async fn inject(&mut self, sequence: &KeySequence) -> Result<()>;
}
