//! 声道布局.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// 扬声器位置, 一位对应一个声道
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChannelMask: u64 {
        const FRONT_LEFT = 1;
        const FRONT_RIGHT = 1 << 1;
        const FRONT_CENTER = 1 << 2;
        /// 低音炮
        const LFE = 1 << 3;
        const BACK_LEFT = 1 << 4;
        const BACK_RIGHT = 1 << 5;
    }
}

/// 声道数加可选的位置掩码
///
/// 非标准声道数的掩码为空, 只有 `channels` 有意义.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelLayout {
    pub channels: u32,
    pub mask: ChannelMask,
}

/// 有名字的布局
const NAMED: &[(&str, ChannelLayout)] = &[
    ("mono", ChannelLayout::MONO),
    ("stereo", ChannelLayout::STEREO),
    ("5.1", ChannelLayout::SURROUND_5_1),
];

impl ChannelLayout {
    pub const MONO: Self = Self::from_mask(ChannelMask::FRONT_CENTER);
    /// 音频流的默认布局
    pub const STEREO: Self = Self::from_mask(ChannelMask::STEREO_PAIR);
    pub const SURROUND_5_1: Self = Self::from_mask(
        ChannelMask::STEREO_PAIR
            .union(ChannelMask::FRONT_CENTER)
            .union(ChannelMask::LFE)
            .union(ChannelMask::BACK_LEFT)
            .union(ChannelMask::BACK_RIGHT),
    );

    /// 声道数由掩码的位数决定
    pub const fn from_mask(mask: ChannelMask) -> Self {
        Self {
            channels: mask.bits().count_ones(),
            mask,
        }
    }

    /// 按声道数取默认布局
    pub fn from_channels(channels: u32) -> Self {
        NAMED
            .iter()
            .map(|(_, layout)| *layout)
            .find(|layout| layout.channels == channels)
            .unwrap_or(Self {
                channels,
                mask: ChannelMask::empty(),
            })
    }

    pub fn name(&self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|(_, layout)| layout == self)
            .map(|(name, _)| *name)
    }
}

impl ChannelMask {
    const STEREO_PAIR: Self = Self::FRONT_LEFT.union(Self::FRONT_RIGHT);
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}ch", self.channels),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认布局() {
        assert_eq!(ChannelLayout::from_channels(2), ChannelLayout::STEREO);
        assert_eq!(ChannelLayout::SURROUND_5_1.channels, 6);
        assert_eq!(ChannelLayout::from_channels(6).to_string(), "5.1");

        let quad = ChannelLayout::from_channels(4);
        assert_eq!(quad.channels, 4);
        assert!(quad.mask.is_empty());
        assert_eq!(quad.to_string(), "4ch");
    }
}
