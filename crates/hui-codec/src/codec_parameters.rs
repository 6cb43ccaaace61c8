//! 编解码器参数.
//!
//! `EncoderContext::parameters` 导出的快照, 封装器据此写容器头部.

use hui_core::{ChannelLayout, MediaType, PixelFormat, Rational, SampleFormat};

use crate::codec_id::CodecId;

/// 编解码器参数快照
#[derive(Debug, Clone)]
pub struct CodecParameters {
    pub codec_id: CodecId,
    /// 容器标签 (FourCC), 0 表示交给封装器决定
    pub codec_tag: u32,
    /// 全局头部
    pub extra_data: Vec<u8>,
    /// bits/s
    pub bit_rate: u64,
    pub media: MediaParams,
}

/// 按媒体类型区分的参数
#[derive(Debug, Clone)]
pub enum MediaParams {
    Video(VideoParams),
    Audio(AudioParams),
    /// 字幕/数据流或尚未确定
    Unspecified,
}

/// 图像参数
#[derive(Debug, Clone)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub frame_rate: Rational,
    /// 采样宽高比
    pub sample_aspect_ratio: Rational,
}

/// 声音参数
#[derive(Debug, Clone)]
pub struct AudioParams {
    /// Hz
    pub sample_rate: u32,
    pub channel_layout: ChannelLayout,
    pub sample_format: SampleFormat,
    /// 固定帧长 (采样数), 0 为可变
    pub frame_size: u32,
}

impl Default for CodecParameters {
    fn default() -> Self {
        Self {
            codec_id: CodecId::None,
            codec_tag: 0,
            extra_data: Vec::new(),
            bit_rate: 0,
            media: MediaParams::Unspecified,
        }
    }
}

impl CodecParameters {
    /// 参数所描述的媒体类型, 未确定时为 None
    pub fn media_type(&self) -> Option<MediaType> {
        match self.media {
            MediaParams::Video(_) => Some(MediaType::Video),
            MediaParams::Audio(_) => Some(MediaType::Audio),
            MediaParams::Unspecified => None,
        }
    }

    pub fn video(&self) -> Option<&VideoParams> {
        if let MediaParams::Video(video) = &self.media {
            Some(video)
        } else {
            None
        }
    }

    pub fn audio(&self) -> Option<&AudioParams> {
        if let MediaParams::Audio(audio) = &self.media {
            Some(audio)
        } else {
            None
        }
    }
}
