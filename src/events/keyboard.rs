use smallvec::SmallVec;
use std::fmt;
use std::time::Duration;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    /// Значение поля `value` для события EV_KEY
    pub fn evdev_value(&self) -> i32 {
        match self {
            KeyState::Pressed => 1,
            KeyState::Released => 0,
        }
    }
}

/// Клавиши, участвующие в комбинации вставки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasteKey {
    Ctrl,
    Shift,
    V,
}

impl PasteKey {
    pub fn is_modifier(&self) -> bool {
        matches!(self, PasteKey::Ctrl | PasteKey::Shift)
    }
}

impl fmt::Display for PasteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteKey::Ctrl => write!(f, "ctrl"),
            PasteKey::Shift => write!(f, "shift"),
            PasteKey::V => write!(f, "v"),
        }
    }
}

/// Один шаг последовательности: клавиша, действие и пауза после события
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStep {
    pub key: PasteKey,
    pub state: KeyState,
    pub delay_after: Duration,
}

impl KeyStep {
    pub fn press(key: PasteKey) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
            delay_after: Duration::ZERO,
        }
    }

    pub fn release(key: PasteKey) -> Self {
        Self {
            key,
            state: KeyState::Released,
            delay_after: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_after = delay;
        self
    }
}

impl fmt::Display for KeyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.state {
            KeyState::Pressed => "↓",
            KeyState::Released => "↑",
        };
        write!(f, "{}{}", self.key, arrow)?;
        if !self.delay_after.is_zero() {
            write!(f, "+{}ms", self.delay_after.as_millis())?;
        }
        Ok(())
    }
}

/// Упорядоченная последовательность событий комбинации вставки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySequence {
    steps: SmallVec<[KeyStep; 6]>,
    terminal: bool,
}

impl KeySequence {
    /// Ctrl+V (или Ctrl+Shift+V для терминала) с модификаторами вокруг V.
    ///
    /// Пауза `key_delay` ставится после последнего нажатого модификатора,
    /// после нажатия V и после отпускания V.
    pub fn paste(terminal: bool, key_delay: Duration) -> Self {
        let modifiers: &[PasteKey] = if terminal {
            &[PasteKey::Ctrl, PasteKey::Shift]
        } else {
            &[PasteKey::Ctrl]
        };

        let mut steps: SmallVec<[KeyStep; 6]> = SmallVec::new();
        for (i, modifier) in modifiers.iter().enumerate() {
            let step = KeyStep::press(*modifier);
            if i + 1 == modifiers.len() {
                steps.push(step.with_delay(key_delay));
            } else {
                steps.push(step);
            }
        }

        steps.push(KeyStep::press(PasteKey::V).with_delay(key_delay));
        steps.push(KeyStep::release(PasteKey::V).with_delay(key_delay));

        for modifier in modifiers.iter().rev() {
            steps.push(KeyStep::release(*modifier));
        }

        let sequence = Self { steps, terminal };
        debug_assert!(sequence.is_well_nested());
        sequence
    }

    pub fn steps(&self) -> &[KeyStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[cfg(test)]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Человекочитаемое имя комбинации для протокола вывода
    pub fn describe(&self) -> &'static str {
        if self.terminal {
            "ctrl+shift+v"
        } else {
            "ctrl+v"
        }
    }

    /// Проверка инвариантов: каждая нажатая клавиша отпускается позже,
    /// V нажимается после всех модификаторов и отпускается до них.
    pub fn is_well_nested(&self) -> bool {
        let mut held: SmallVec<[PasteKey; 3]> = SmallVec::new();

        for step in &self.steps {
            match step.state {
                KeyState::Pressed => {
                    if held.contains(&step.key) {
                        return false;
                    }
                    // Модификатор не может нажиматься, пока зажата V
                    if step.key.is_modifier() && held.contains(&PasteKey::V) {
                        return false;
                    }
                    held.push(step.key);
                }
                KeyState::Released => {
                    // Отпускание строго в обратном порядке (LIFO)
                    if held.last() != Some(&step.key) {
                        return false;
                    }
                    held.pop();
                }
            }
        }

        held.is_empty()
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DELAY: Duration = Duration::from_millis(8);

    #[test]
    fn test_regular_paste_sequence() {
        let seq = KeySequence::paste(false, DELAY);
        let expected = vec![
            KeyStep::press(PasteKey::Ctrl).with_delay(DELAY),
            KeyStep::press(PasteKey::V).with_delay(DELAY),
            KeyStep::release(PasteKey::V).with_delay(DELAY),
            KeyStep::release(PasteKey::Ctrl),
        ];
        assert_eq!(seq.steps(), expected.as_slice());
        assert_eq!(seq.describe(), "ctrl+v");
        assert!(seq.is_well_nested());
    }

    #[test]
    fn test_terminal_paste_sequence() {
        let seq = KeySequence::paste(true, DELAY);
        let expected = vec![
            KeyStep::press(PasteKey::Ctrl),
            KeyStep::press(PasteKey::Shift).with_delay(DELAY),
            KeyStep::press(PasteKey::V).with_delay(DELAY),
            KeyStep::release(PasteKey::V).with_delay(DELAY),
            KeyStep::release(PasteKey::Shift),
            KeyStep::release(PasteKey::Ctrl),
        ];
        assert_eq!(seq.steps(), expected.as_slice());
        assert_eq!(seq.describe(), "ctrl+shift+v");
        assert!(seq.is_terminal());
    }

    #[test]
    fn test_nesting_detects_interleaving() {
        let mut seq = KeySequence::paste(true, DELAY);
        // Ctrl отпущена раньше V
        seq.steps.swap(3, 5);
        assert!(!seq.is_well_nested());
    }

    #[test]
    fn test_nesting_detects_missing_release() {
        let mut seq = KeySequence::paste(false, DELAY);
        seq.steps.pop();
        assert!(!seq.is_well_nested());
    }

    #[test]
    fn test_display() {
        let seq = KeySequence::paste(false, DELAY);
        assert_eq!(seq.to_string(), "ctrl↓+8ms v↓+8ms v↑+8ms ctrl↑");
    }

    proptest! {
        #[test]
        fn prop_every_press_has_later_release(terminal in any::<bool>(), delay_ms in 0u64..100) {
            let seq = KeySequence::paste(terminal, Duration::from_millis(delay_ms));
            prop_assert!(seq.is_well_nested());

            for key in [PasteKey::Ctrl, PasteKey::Shift, PasteKey::V] {
                let presses: Vec<usize> = seq.steps().iter().enumerate()
                    .filter(|(_, s)| s.key == key && s.state == KeyState::Pressed)
                    .map(|(i, _)| i)
                    .collect();
                let releases: Vec<usize> = seq.steps().iter().enumerate()
                    .filter(|(_, s)| s.key == key && s.state == KeyState::Released)
                    .map(|(i, _)| i)
                    .collect();
                prop_assert_eq!(presses.len(), releases.len());
                for (p, r) in presses.iter().zip(releases.iter()) {
                    prop_assert!(p < r);
                }
            }
        }

        #[test]
        fn prop_v_is_inside_modifiers(terminal in any::<bool>()) {
            let seq = KeySequence::paste(terminal, DELAY);
            let pos = |key, state| seq.steps().iter()
                .position(|s| s.key == key && s.state == state);

            let v_down = pos(PasteKey::V, KeyState::Pressed).unwrap();
            let v_up = pos(PasteKey::V, KeyState::Released).unwrap();
            prop_assert!(pos(PasteKey::Ctrl, KeyState::Pressed).unwrap() < v_down);
            prop_assert!(v_up < pos(PasteKey::Ctrl, KeyState::Released).unwrap());

            if terminal {
                prop_assert!(pos(PasteKey::Shift, KeyState::Pressed).unwrap() < v_down);
                prop_assert!(v_up < pos(PasteKey::Shift, KeyState::Released).unwrap());
            } else {
                prop_assert!(pos(PasteKey::Shift, KeyState::Pressed).is_none());
            }
        }
    }
}
