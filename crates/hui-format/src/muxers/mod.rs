//! 封装器实现模块.

pub mod null;
pub mod raw;
pub mod wav;

use hui_codec::CodecId;
use hui_core::MediaType;

use crate::format::{FormatFlags, FormatInfo};
use crate::format_id::FormatId;
use crate::registry::FormatRegistry;

/// 注册所有内置封装器
pub fn register_all_muxers(registry: &mut FormatRegistry) {
    registry.register_format(FormatInfo {
        id: FormatId::Wav,
        name: "wav",
        flags: FormatFlags::empty(),
        media_types: &[MediaType::Audio],
        codecs: wav::WAV_CODECS,
        default_video_codec: CodecId::None,
        default_audio_codec: CodecId::PcmS16le,
        factory: wav::WavMuxer::create,
    });
    registry.register_format(FormatInfo {
        id: FormatId::RawVideo,
        name: "rawvideo",
        flags: FormatFlags::empty(),
        media_types: &[MediaType::Video],
        codecs: &[CodecId::RawVideo],
        default_video_codec: CodecId::RawVideo,
        default_audio_codec: CodecId::None,
        factory: raw::RawMuxer::create_video,
    });
    registry.register_format(FormatInfo {
        id: FormatId::RawAudio,
        name: "rawaudio",
        flags: FormatFlags::empty(),
        media_types: &[MediaType::Audio],
        codecs: raw::RAW_AUDIO_CODECS,
        default_video_codec: CodecId::None,
        default_audio_codec: CodecId::PcmS16le,
        factory: raw::RawMuxer::create_audio,
    });
    registry.register_format(FormatInfo {
        id: FormatId::Null,
        name: "null",
        flags: FormatFlags::NO_FILE,
        media_types: &[MediaType::Video, MediaType::Audio],
        codecs: &[],
        default_video_codec: CodecId::RawVideo,
        default_audio_codec: CodecId::PcmS16le,
        factory: null::NullMuxer::create,
    });
}
