//! Определение терминальных эмуляторов по классу окна.
//!
//! Терминалы обычно перехватывают Ctrl+V, поэтому для них используется
//! Ctrl+Shift+V. Ошибка классификации приводит лишь к неверной комбинации,
//! поэтому достаточно статического списка.

/// Способ сравнения имени класса с элементами реестра
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Регистронезависимое вхождение подстроки (WM_CLASS в X11)
    Substring,
    /// Регистронезависимое точное совпадение (классы окон Win32)
    Exact,
}

/// Неизменяемый встроенный список классов терминалов
#[derive(Debug)]
pub struct TerminalRegistry {
    entries: &'static [&'static str],
    mode: MatchMode,
}

/// WM_CLASS распространённых терминалов (элементы в нижнем регистре)
pub static LINUX_TERMINALS: TerminalRegistry = TerminalRegistry {
    entries: &[
        "konsole",
        "gnome-terminal",
        "terminal",
        "kitty",
        "alacritty",
        "terminator",
        "xterm",
        "urxvt",
        "rxvt",
        "tilix",
        "terminology",
        "wezterm",
        "foot",
        "st",
        "yakuake",
        "ghostty",
        "guake",
        "tilda",
        "hyper",
        "tabby",
        "sakura",
        "warp",
    ],
    mode: MatchMode::Substring,
};

/// Зарегистрированные классы окон терминалов Windows
pub static WINDOWS_TERMINALS: TerminalRegistry = TerminalRegistry {
    entries: &[
        "ConsoleWindowClass",
        "CASCADIA_HOSTING_WINDOW_CLASS",
        "mintty",
        "VirtualConsoleClass",
        "PuTTY",
        "Alacritty",
        "org.wezfurlong.wezterm",
        "Hyper",
        "TMobaXterm",
        "kitty",
    ],
    mode: MatchMode::Exact,
};

impl TerminalRegistry {
    #[cfg(test)]
    pub fn entries(&self) -> &'static [&'static str] {
        self.entries
    }

    #[cfg(test)]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Первое совпавшее значение реестра (порядок влияет только на то,
    /// какое совпадение найдено первым)
    pub fn find_match(&self, name: &str) -> Option<&'static str> {
        if name.is_empty() {
            return None;
        }

        match self.mode {
            MatchMode::Substring => {
                let name_lower = name.to_lowercase();
                self.entries
                    .iter()
                    .copied()
                    .find(|entry| name_lower.contains(&entry.to_lowercase()))
            }
            MatchMode::Exact => self
                .entries
                .iter()
                .copied()
                .find(|entry| entry.eq_ignore_ascii_case(name)),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.find_match(name).is_some()
    }

    /// true, если хотя бы одно из имён принадлежит терминалу.
    /// Пустые и отсутствующие имена дают false.
    pub fn classify(&self, class_name: Option<&str>, alt_name: Option<&str>) -> bool {
        class_name.is_some_and(|name| self.matches(name))
            || alt_name.is_some_and(|name| self.matches(name))
    }
}
