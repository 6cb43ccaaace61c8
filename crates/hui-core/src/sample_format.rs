//! 音频采样格式.
//!
//! 交错格式把各声道的采样轮流排在一个缓冲区里 (LRLR...),
//! 平面格式 (名称以 `p` 结尾) 每个声道独占一个缓冲区.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SampleFormat {
    None,
    U8,
    S16,
    S32,
    /// 32 位浮点
    F32,
    S16p,
    F32p,
}

/// (格式, 名称, 采样字节数, 是否平面)
const TABLE: &[(SampleFormat, &str, u32, bool)] = &[
    (SampleFormat::None, "none", 0, false),
    (SampleFormat::U8, "u8", 1, false),
    (SampleFormat::S16, "s16", 2, false),
    (SampleFormat::S32, "s32", 4, false),
    (SampleFormat::F32, "flt", 4, false),
    (SampleFormat::S16p, "s16p", 2, true),
    (SampleFormat::F32p, "fltp", 4, true),
];

impl SampleFormat {
    fn entry(self) -> (SampleFormat, &'static str, u32, bool) {
        TABLE
            .iter()
            .copied()
            .find(|(format, ..)| *format == self)
            .unwrap_or(TABLE[0])
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// 单个采样的字节数, None 为 0
    pub fn bytes_per_sample(self) -> u32 {
        self.entry().2
    }

    pub fn is_planar(self) -> bool {
        self.entry().3
    }

    /// 按名称查找, 不认识的名称返回 None
    pub fn from_name(name: &str) -> Option<Self> {
        TABLE
            .iter()
            .find(|(format, n, ..)| *n == name && *format != Self::None)
            .map(|(format, ..)| *format)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_采样属性() {
        assert_eq!(SampleFormat::S16.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::F32p.bytes_per_sample(), 4);
        assert!(SampleFormat::S16p.is_planar());
        assert!(!SampleFormat::F32.is_planar());
        assert_eq!(SampleFormat::None.bytes_per_sample(), 0);
    }

    #[test]
    fn test_名称互查() {
        assert_eq!(SampleFormat::F32.to_string(), "flt");
        assert_eq!(SampleFormat::from_name("fltp"), Some(SampleFormat::F32p));
        assert_eq!(SampleFormat::from_name("none"), None);
        assert_eq!(SampleFormat::from_name("s24"), None);
    }
}
