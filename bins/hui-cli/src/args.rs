//! 命令行参数解析辅助.

use hui::core::Rational;

/// 解析帧率, 支持 "25" 和 "30000/1001"
pub fn parse_rate(s: &str) -> Option<Rational> {
    let (num, den) = match s.split_once('/') {
        Some((num, den)) => (num.trim().parse().ok()?, den.trim().parse().ok()?),
        None => (s.trim().parse().ok()?, 1),
    };
    if num <= 0 || den <= 0 {
        return None;
    }
    Some(Rational::new(num, den))
}

/// 解析分辨率, 如 "1280x720"
pub fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}

/// 解析 `key=value` 形式的选项, 供 clap 使用
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("期望 key=value, 实际为 '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("25"), Some(Rational::new(25, 1)));
        assert_eq!(parse_rate("30000/1001"), Some(Rational::new(30000, 1001)));
        assert_eq!(parse_rate("0"), None);
        assert_eq!(parse_rate("abc"), None);
        assert_eq!(parse_rate("1/0"), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1280x720"), Some((1280, 720)));
        assert_eq!(parse_size("64X48"), Some((64, 48)));
        assert_eq!(parse_size("0x10"), None);
        assert_eq!(parse_size("1280"), None);
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("crf=20"),
            Ok(("crf".to_string(), "20".to_string()))
        );
        assert_eq!(
            parse_key_value("title=a=b"),
            Ok(("title".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_value("=1").is_err());
        assert!(parse_key_value("novalue").is_err());
    }
}
