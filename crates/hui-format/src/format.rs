//! 输出格式描述.
//!
//! `FormatInfo` 是格式注册表中的一个条目: 描述格式能力
//! (需要全局头部、无需文件等) 并负责创建封装器实例.

use bitflags::bitflags;

use hui_codec::CodecId;
use hui_core::{HuiResult, MediaType};

use crate::format_id::FormatId;
use crate::muxer::Muxer;

/// 封装器工厂函数类型
pub type MuxerFactory = fn() -> HuiResult<Box<dyn Muxer>>;

bitflags! {
    /// 输出格式标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FormatFlags: u32 {
        /// 格式要求编解码器的全局头部放在额外数据中
        const GLOBAL_HEADER = 1 << 0;
        /// 格式自行处理输出, 不需要打开 I/O
        const NO_FILE = 1 << 1;
    }
}

/// 输出格式描述
#[derive(Debug, Clone, Copy)]
pub struct FormatInfo {
    /// 格式标识
    pub id: FormatId,
    /// 格式名称
    pub name: &'static str,
    /// 格式标志
    pub flags: FormatFlags,
    /// 支持的媒体类型
    pub media_types: &'static [MediaType],
    /// 支持的编解码器, 为空表示接受所支持媒体类型的任意编解码器
    pub codecs: &'static [CodecId],
    /// 默认视频编解码器 (`CodecId::None` 表示不支持视频)
    pub default_video_codec: CodecId,
    /// 默认音频编解码器 (`CodecId::None` 表示不支持音频)
    pub default_audio_codec: CodecId,
    /// 封装器工厂函数
    pub factory: MuxerFactory,
}

impl FormatInfo {
    /// 是否支持指定媒体类型
    pub fn supports_media(&self, media_type: MediaType) -> bool {
        self.media_types.contains(&media_type)
    }

    /// 查询格式是否能封装指定编解码器
    pub fn query_codec(&self, codec_id: CodecId) -> bool {
        self.supports_media(codec_id.media_type())
            && (self.codecs.is_empty() || self.codecs.contains(&codec_id))
    }

    /// 格式可以封装的全部编解码器
    pub fn supported_codecs(&self) -> Vec<CodecId> {
        CodecId::all()
            .filter(|id| self.query_codec(*id))
            .collect()
    }

    /// 是否需要全局头部
    pub fn needs_global_header(&self) -> bool {
        self.flags.contains(FormatFlags::GLOBAL_HEADER)
    }

    /// 是否不需要打开文件
    pub fn is_file_less(&self) -> bool {
        self.flags.contains(FormatFlags::NO_FILE)
    }

    /// 创建封装器实例
    pub fn create_muxer(&self) -> HuiResult<Box<dyn Muxer>> {
        (self.factory)()
    }
}

#[cfg(test)]
mod tests {
    use crate::FormatRegistry;
    use crate::format_id::FormatId;
    use hui_codec::CodecId;

    #[test]
    fn test_编解码器兼容性查询() {
        let mut reg = FormatRegistry::new();
        crate::register_all(&mut reg);

        let wav = reg.find(FormatId::Wav).unwrap();
        assert!(wav.query_codec(CodecId::PcmS16le));
        assert!(!wav.query_codec(CodecId::PcmS16be));
        assert!(!wav.query_codec(CodecId::RawVideo));
        assert_eq!(wav.default_audio_codec, CodecId::PcmS16le);

        let null = reg.find(FormatId::Null).unwrap();
        assert!(null.is_file_less());
        assert!(!null.needs_global_header());
        assert!(null.query_codec(CodecId::H264));
        assert!(!null.query_codec(CodecId::Srt));
        assert!(null.supported_codecs().contains(&CodecId::Opus));
    }
}
