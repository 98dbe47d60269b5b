use super::r#trait::KeyInjector;
use crate::error::Result;
use crate::events::{KeySequence, KeyStep};
use tracing::info;

/// Инжектор без побочных эффектов: только логирует и запоминает шаги
#[derive(Debug, Default)]
pub struct DryRunInjector {
    injected: Vec<KeyStep>,
}

impl DryRunInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn injected(&self) -> &[KeyStep] {
        &self.injected
    }
}

#[async_trait::async_trait]
impl KeyInjector for DryRunInjector {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn inject(&mut self, sequence: &KeySequence) -> Result<()> {
        for step in sequence.steps() {
            info!("[DRY RUN] Событие: {}", step);
            self.injected.push(*step);
        }
        Ok(())
    }
}
