#[cfg(all(target_os = "linux", feature = "uinput"))]
pub mod permissions;

// ✅ Макрос условного логирования для оптимизации производительности
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

/// Разбор идентификатора окна в любой системе счисления (как strtoul с base 0):
/// `0x`/`0X`: шестнадцатеричная, ведущий `0`: восьмеричная, иначе десятичная
pub fn parse_window_id(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let (digits, radix) = if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        (hex, 16)
    } else if value.len() > 1 && value.starts_with('0') {
        (&value[1..], 8)
    } else {
        (value, 10)
    };

    u64::from_str_radix(digits, radix)
        .map_err(|e| format!("неверный идентификатор окна '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_id_bases() {
        assert_eq!(parse_window_id("0x2400007"), Ok(0x2400007));
        assert_eq!(parse_window_id("0X1f"), Ok(0x1f));
        assert_eq!(parse_window_id("37748743"), Ok(37748743));
        assert_eq!(parse_window_id("010"), Ok(8));
        assert_eq!(parse_window_id("0"), Ok(0));
    }

    #[test]
    fn test_parse_window_id_rejects_garbage() {
        assert!(parse_window_id("").is_err());
        assert!(parse_window_id("0x").is_err());
        assert!(parse_window_id("window").is_err());
        assert!(parse_window_id("09").is_err());
    }
}
