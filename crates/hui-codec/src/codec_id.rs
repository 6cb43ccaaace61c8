//! 编解码器标识与描述表.

use hui_core::MediaType;
use std::fmt;

/// 编解码算法标识, 与容器和编码器实现无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    None,
    H264,
    H265,
    Vp9,
    Mpeg4,
    Mjpeg,
    /// 未压缩视频
    RawVideo,
    Aac,
    Mp3,
    Opus,
    Flac,
    PcmS16le,
    PcmS16be,
    PcmS32le,
    PcmF32le,
    PcmU8,
    /// SubRip
    Srt,
    Webvtt,
}

/// 一种编解码算法的静态描述
struct Descriptor {
    id: CodecId,
    media_type: MediaType,
    /// 规范名称
    name: &'static str,
    aliases: &'static [&'static str],
}

const fn desc(
    id: CodecId,
    media_type: MediaType,
    name: &'static str,
    aliases: &'static [&'static str],
) -> Descriptor {
    Descriptor {
        id,
        media_type,
        name,
        aliases,
    }
}

const DESCRIPTORS: &[Descriptor] = &[
    desc(CodecId::H264, MediaType::Video, "h264", &["avc"]),
    desc(CodecId::H265, MediaType::Video, "hevc", &["h265"]),
    desc(CodecId::Vp9, MediaType::Video, "vp9", &[]),
    desc(CodecId::Mpeg4, MediaType::Video, "mpeg4", &[]),
    desc(CodecId::Mjpeg, MediaType::Video, "mjpeg", &["jpeg"]),
    desc(CodecId::RawVideo, MediaType::Video, "rawvideo", &["raw"]),
    desc(CodecId::Aac, MediaType::Audio, "aac", &[]),
    desc(CodecId::Mp3, MediaType::Audio, "mp3", &[]),
    desc(CodecId::Opus, MediaType::Audio, "opus", &[]),
    desc(CodecId::Flac, MediaType::Audio, "flac", &[]),
    desc(CodecId::PcmS16le, MediaType::Audio, "pcm_s16le", &[]),
    desc(CodecId::PcmS16be, MediaType::Audio, "pcm_s16be", &[]),
    desc(CodecId::PcmS32le, MediaType::Audio, "pcm_s32le", &[]),
    desc(CodecId::PcmF32le, MediaType::Audio, "pcm_f32le", &[]),
    desc(CodecId::PcmU8, MediaType::Audio, "pcm_u8", &[]),
    desc(CodecId::Srt, MediaType::Subtitle, "subrip", &["srt"]),
    desc(CodecId::Webvtt, MediaType::Subtitle, "webvtt", &[]),
];

impl CodecId {
    fn descriptor(self) -> Option<&'static Descriptor> {
        DESCRIPTORS.iter().find(|d| d.id == self)
    }

    /// 除 `None` 外的全部编解码器
    pub fn all() -> impl Iterator<Item = CodecId> {
        DESCRIPTORS.iter().map(|d| d.id)
    }

    /// `None` 归为数据流
    pub fn media_type(self) -> MediaType {
        self.descriptor().map_or(MediaType::Data, |d| d.media_type)
    }

    pub fn name(self) -> &'static str {
        self.descriptor().map_or("none", |d| d.name)
    }

    /// 按规范名称或别名查找, 区分大小写
    pub fn from_name(name: &str) -> Option<CodecId> {
        DESCRIPTORS
            .iter()
            .find(|d| d.name == name || d.aliases.contains(&name))
            .map(|d| d.id)
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
