//! 编码器上下文.
//!
//! `EncoderContext` 是一个编码器实例的拥有型句柄: 保存可配置的编码参数
//! (`EncoderSettings`) 和选项字典, 通过显式的 `open()` / `close()` 管理
//! 编码器实例. 不调用 `close()` 时编码器实例会一直占用到句柄被丢弃.

use bitflags::bitflags;
use log::debug;

use hui_core::{
    ChannelLayout, Dictionary, HuiError, HuiResult, MediaType, PixelFormat, Rational,
    SampleFormat,
};

use crate::codec_parameters::{AudioParams, CodecParameters, MediaParams, VideoParams};
use crate::encoder::Encoder;
use crate::frame::Frame;
use crate::packet::Packet;
use crate::registry::EncoderInfo;

bitflags! {
    /// 编码器上下文标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CodecFlags: u32 {
        /// 将全局头部放在额外数据中, 而不是每个关键帧前
        const GLOBAL_HEADER = 1 << 0;
    }
}

/// 编码参数
///
/// 所有字段都可以在打开前修改. 复制一份设置即得到一个独立的配置,
/// 不与原上下文共享任何状态.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    /// 媒体类型
    pub media_type: MediaType,
    /// 码率 (bits/s)
    pub bit_rate: u64,
    /// 码率容差 (bits)
    pub bit_rate_tolerance: u64,
    /// 编码时间基, 未定义时在打开时推导
    pub time_base: Rational,
    /// 容器相关的编解码器标签
    pub codec_tag: u32,
    /// 上下文标志
    pub flags: CodecFlags,
    /// 额外数据
    pub extra_data: Vec<u8>,

    /// 宽度 (像素)
    pub width: u32,
    /// 高度 (像素)
    pub height: u32,
    /// 像素格式
    pub pixel_format: PixelFormat,
    /// 帧率
    pub frame_rate: Rational,
    /// 每帧 tick 数
    pub ticks_per_frame: u32,
    /// 采样宽高比
    pub sample_aspect_ratio: Rational,

    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 采样格式
    pub sample_format: SampleFormat,
    /// 声道布局
    pub channel_layout: ChannelLayout,
    /// 每帧采样数 (0 表示可变)
    pub frame_size: u32,
}

impl EncoderSettings {
    /// 编码器默认值
    pub fn defaults_for(info: &EncoderInfo) -> Self {
        Self {
            media_type: info.media_type(),
            bit_rate: 0,
            bit_rate_tolerance: 0,
            time_base: Rational::UNDEFINED,
            codec_tag: 0,
            flags: CodecFlags::empty(),
            extra_data: Vec::new(),
            width: 0,
            height: 0,
            pixel_format: PixelFormat::None,
            frame_rate: Rational::UNDEFINED,
            ticks_per_frame: 1,
            sample_aspect_ratio: Rational::new(1, 1),
            sample_rate: 0,
            sample_format: SampleFormat::None,
            channel_layout: ChannelLayout::from_channels(0),
            frame_size: 0,
        }
    }
}

/// 编码器上下文
pub struct EncoderContext {
    /// 解析出的编码器
    encoder: EncoderInfo,
    /// 编码参数
    settings: EncoderSettings,
    /// 选项; 打开后只剩未被消费的键
    options: Dictionary,
    /// 已打开的编码器实例
    instance: Option<Box<dyn Encoder>>,
}

impl EncoderContext {
    /// 按编码器默认值创建上下文
    pub fn new(encoder: &EncoderInfo) -> Self {
        Self::with_settings(encoder, EncoderSettings::defaults_for(encoder))
    }

    /// 使用给定参数创建上下文
    pub fn with_settings(encoder: &EncoderInfo, settings: EncoderSettings) -> Self {
        Self {
            encoder: *encoder,
            settings,
            options: Dictionary::new(),
            instance: None,
        }
    }

    /// 解析出的编码器
    pub fn encoder(&self) -> &EncoderInfo {
        &self.encoder
    }

    /// 编码参数
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// 可修改的编码参数
    pub fn settings_mut(&mut self) -> &mut EncoderSettings {
        &mut self.settings
    }

    /// 选项字典
    pub fn options(&self) -> &Dictionary {
        &self.options
    }

    /// 可修改的选项字典
    pub fn options_mut(&mut self) -> &mut Dictionary {
        &mut self.options
    }

    /// 是否已打开
    pub fn is_open(&self) -> bool {
        self.instance.is_some()
    }

    /// 打开编码器
    ///
    /// 先消费通用选项 (`b`, `bt`, `g`, `threads`, `flags`), 再把剩余选项交给
    /// 编码器私有 `open()`. 结束后 `options()` 只保留未被识别的键.
    /// 已打开时直接返回.
    pub fn open(&mut self) -> HuiResult<()> {
        if self.is_open() {
            return Ok(());
        }
        self.apply_generic_options()?;

        if !self.settings.time_base.is_valid() || self.settings.time_base.num == 0 {
            self.settings.time_base = self.default_time_base()?;
        }

        let mut instance = self.encoder.create()?;
        instance.open(&self.parameters(), &mut self.options)?;
        if let Some(extra) = instance.extra_data() {
            self.settings.extra_data = extra.to_vec();
        }

        debug!(
            "打开编码器 {}: 时间基={}, 码率={}, 未消费选项={}",
            self.encoder.name, self.settings.time_base, self.settings.bit_rate, self.options,
        );
        self.instance = Some(instance);
        Ok(())
    }

    /// 关闭编码器, 可重复调用
    pub fn close(&mut self) {
        if let Some(mut instance) = self.instance.take() {
            instance.flush();
            debug!("关闭编码器 {}", self.encoder.name);
        }
    }

    /// 送入一帧 (None 表示刷新)
    pub fn send_frame(&mut self, frame: Option<&Frame>) -> HuiResult<()> {
        self.instance_mut()?.send_frame(frame)
    }

    /// 取出一个数据包
    pub fn receive_packet(&mut self) -> HuiResult<Packet> {
        self.instance_mut()?.receive_packet()
    }

    /// 导出编解码器参数快照
    pub fn parameters(&self) -> CodecParameters {
        let s = &self.settings;
        let media = match s.media_type {
            MediaType::Video => MediaParams::Video(VideoParams {
                width: s.width,
                height: s.height,
                pixel_format: s.pixel_format,
                frame_rate: s.frame_rate,
                sample_aspect_ratio: s.sample_aspect_ratio,
            }),
            MediaType::Audio => MediaParams::Audio(AudioParams {
                sample_rate: s.sample_rate,
                channel_layout: s.channel_layout,
                sample_format: s.sample_format,
                frame_size: s.frame_size,
            }),
            _ => MediaParams::Unspecified,
        };
        CodecParameters {
            codec_id: self.encoder.codec_id,
            codec_tag: s.codec_tag,
            extra_data: s.extra_data.clone(),
            bit_rate: s.bit_rate,
            media,
        }
    }

    /// 视频取帧率的倒数 (乘以 ticks_per_frame), 音频取 1/采样率
    fn default_time_base(&self) -> HuiResult<Rational> {
        let s = &self.settings;
        let out_of_range = || {
            HuiError::InvalidArgument(format!(
                "无法推导时间基: 帧率 {}, ticks_per_frame {}, 采样率 {}",
                s.frame_rate, s.ticks_per_frame, s.sample_rate
            ))
        };
        Ok(match s.media_type {
            MediaType::Video if s.frame_rate.num > 0 => {
                let ticks = i32::try_from(s.ticks_per_frame.max(1)).map_err(|_| out_of_range())?;
                let num = s.frame_rate.den.checked_mul(ticks).ok_or_else(out_of_range)?;
                Rational::new(num, s.frame_rate.num).reduce()
            }
            MediaType::Audio if s.sample_rate > 0 => {
                let rate = i32::try_from(s.sample_rate).map_err(|_| out_of_range())?;
                Rational::new(1, rate)
            }
            _ => s.time_base,
        })
    }

    fn instance_mut(&mut self) -> HuiResult<&mut Box<dyn Encoder>> {
        self.instance
            .as_mut()
            .ok_or_else(|| HuiError::Codec(format!("编码器 {} 未打开", self.encoder.name)))
    }

    fn apply_generic_options(&mut self) -> HuiResult<()> {
        let opts = &mut self.options;
        if let Some(b) = opts.take_parsed::<u64>("b").map_err(HuiError::InvalidArgument)? {
            self.settings.bit_rate = b;
        }
        if let Some(bt) = opts.take_parsed::<u64>("bt").map_err(HuiError::InvalidArgument)? {
            self.settings.bit_rate_tolerance = bt;
        }
        // 以下选项被接受但对内置编码器没有影响
        opts.take_parsed::<u32>("g").map_err(HuiError::InvalidArgument)?;
        opts.take_parsed::<u32>("threads").map_err(HuiError::InvalidArgument)?;
        if let Some(flags) = opts.remove("flags") {
            for flag in flags.split(['+', ',']).filter(|f| !f.is_empty()) {
                match flag {
                    "global_header" => self.settings.flags |= CodecFlags::GLOBAL_HEADER,
                    other => {
                        return Err(HuiError::InvalidArgument(format!(
                            "未知的编码器标志: {other}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Drop for EncoderContext {
    fn drop(&mut self) {
        if self.is_open() {
            log::warn!("编码器 {} 未显式关闭", self.encoder.name);
        }
    }
}

impl std::fmt::Debug for EncoderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderContext")
            .field("encoder", &self.encoder.name)
            .field("settings", &self.settings)
            .field("options", &self.options)
            .field("open", &self.is_open())
            .finish()
    }
}
