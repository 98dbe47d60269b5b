use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::warn;

const UINPUT_DEVICE: &str = "/dev/uinput";

/// Подсказка по настройке доступа после неудачного открытия /dev/uinput
pub fn warn_uinput_access() {
    for line in describe_uinput_access(Path::new(UINPUT_DEVICE)) {
        warn!("{}", line);
    }
    for command in get_setup_commands() {
        warn!("   {}", command);
    }
}

fn describe_uinput_access(device: &Path) -> Vec<String> {
    if !device.exists() {
        return vec![format!(
            "{} не существует, возможно модуль uinput не загружен",
            device.display()
        )];
    }

    match fs::metadata(device) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode();
            // Обычно 660 (группа input/uinput) или 666
            if mode & 0o006 == 0 && mode & 0o060 == 0 {
                vec![format!("Нет прав доступа к {} (режим {:o})", device.display(), mode & 0o777)]
            } else {
                vec![format!(
                    "{} доступен группе (режим {:o}), проверьте членство в группах input/uinput",
                    device.display(),
                    mode & 0o777
                )]
            }
        }
        Err(e) => vec![format!("Не удалось проверить права доступа к {}: {}", device.display(), e)],
    }
}

/// Получить рекомендуемые команды для настройки прав доступа
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Добавить пользователя в необходимые группы:".to_string(),
        "sudo usermod -a -G input,uinput $USER".to_string(),
        "# Загрузить модуль uinput:".to_string(),
        "sudo modprobe uinput".to_string(),
        "# Автоматическая загрузка модуля при загрузке системы:".to_string(),
        "echo 'uinput' | sudo tee /etc/modules-load.d/uinput.conf".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_commands() {
        let commands = get_setup_commands();
        assert!(!commands.is_empty());
        assert!(commands.iter().any(|cmd| cmd.contains("usermod")));
        assert!(commands.iter().any(|cmd| cmd.contains("modprobe")));
    }

    #[test]
    fn test_missing_device_message() {
        let dir = tempfile::tempdir().unwrap();
        let lines = describe_uinput_access(&dir.path().join("uinput"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("не существует"));
    }

    #[test]
    fn test_inaccessible_device_message() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600)).unwrap();
        let lines = describe_uinput_access(file.path());
        assert!(lines[0].contains("Нет прав доступа"));
    }
}
