//! 输出流声明.
//!
//! 由编解码器名称或流模板解析出编码器, 检查容器兼容性, 再按媒体类型
//! 填充默认编码参数. 所有检查都在创建流槽位之前完成, 失败时不留下半注册的流.

use log::debug;

use hui_codec::{CodecFlags, EncoderContext, EncoderInfo, EncoderSettings};
use hui_core::{ChannelLayout, Dictionary, HuiError, HuiResult, MediaType, PixelFormat, Rational};

use crate::container::OutputContainer;
use crate::stream::{OutputStream, StreamTemplate};

/// 视频默认像素格式
const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Yuv420p;
/// 视频默认宽度
const DEFAULT_WIDTH: u32 = 640;
/// 视频默认高度
const DEFAULT_HEIGHT: u32 = 480;
/// 视频默认码率
const DEFAULT_VIDEO_BIT_RATE: u64 = 1_024_000;
/// 视频默认码率容差
const DEFAULT_VIDEO_BIT_RATE_TOLERANCE: u64 = 128_000;
/// 视频默认帧率
const DEFAULT_FRAME_RATE: i32 = 24;

/// 音频默认码率
const DEFAULT_AUDIO_BIT_RATE: u64 = 128_000;
/// 音频默认码率容差
const DEFAULT_AUDIO_BIT_RATE_TOLERANCE: u64 = 32_000;
/// 音频默认采样率
const DEFAULT_SAMPLE_RATE: i32 = 48_000;

/// 流声明请求
///
/// `codec` 和 `template` 必须且只能给出一个.
#[derive(Debug, Clone, Default)]
pub struct StreamRequest {
    /// 编码器名称或编解码器描述名
    pub codec: Option<String>,
    /// 复制配置的模板
    pub template: Option<StreamTemplate>,
    /// 视频帧率或音频采样率
    pub rate: Option<Rational>,
    /// 覆盖宽度
    pub width: Option<u32>,
    /// 覆盖高度
    pub height: Option<u32>,
    /// 覆盖码率
    pub bit_rate: Option<u64>,
    /// 覆盖码率容差
    pub bit_rate_tolerance: Option<u64>,
    /// 流专属选项
    pub options: Dictionary,
}

impl StreamRequest {
    /// 按编解码器名称声明
    pub fn codec(name: impl Into<String>) -> Self {
        Self {
            codec: Some(name.into()),
            ..Self::default()
        }
    }

    /// 按模板声明
    pub fn template(template: StreamTemplate) -> Self {
        Self {
            template: Some(template),
            ..Self::default()
        }
    }

    /// 设置帧率/采样率
    pub fn rate(mut self, rate: impl Into<Rational>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    /// 设置宽度
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// 设置高度
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// 设置码率
    pub fn bit_rate(mut self, bit_rate: u64) -> Self {
        self.bit_rate = Some(bit_rate);
        self
    }

    /// 设置码率容差
    pub fn bit_rate_tolerance(mut self, tolerance: u64) -> Self {
        self.bit_rate_tolerance = Some(tolerance);
        self
    }

    /// 添加一个流专属选项
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(key, value);
        self
    }
}

/// 解析后的流来源
enum Source {
    /// 复制模板参数
    Template(EncoderSettings),
    /// 使用编码器默认值
    Defaults,
}

impl OutputContainer {
    /// 声明一条输出流
    ///
    /// 返回的流已加入注册表, 索引等于声明顺序. 会话开始后不能再声明.
    pub fn declare_stream(&mut self, request: StreamRequest) -> HuiResult<&mut OutputStream> {
        if self.started {
            return Err(HuiError::InvalidArgument(
                "cannot add streams after start".into(),
            ));
        }

        let (encoder, source) = self.resolve_source(&request)?;
        let format = *self.format.format();
        if !format.query_codec(encoder.codec_id) {
            return Err(HuiError::UnsupportedCodecForFormat {
                codec: encoder.name.to_string(),
                format: format.name.to_string(),
            });
        }

        let mut time_base = Rational::UNDEFINED;
        let mut settings = match source {
            Source::Template(mut settings) => {
                // 标签与容器绑定, 复制到新容器时需要重新选择
                settings.codec_tag = 0;
                settings
            }
            Source::Defaults => {
                let mut settings = EncoderSettings::defaults_for(&encoder);
                match settings.media_type {
                    MediaType::Video => {
                        configure_video(&mut settings, request.rate)?;
                        time_base = settings.frame_rate.invert();
                    }
                    MediaType::Audio => configure_audio(&mut settings, &encoder, request.rate)?,
                    other => {
                        if request.rate.is_some() {
                            debug!("{} 流忽略 rate 参数", other);
                        }
                    }
                }
                settings
            }
        };
        if format.needs_global_header() {
            settings.flags |= CodecFlags::GLOBAL_HEADER;
        }
        apply_overrides(&mut settings, &request);

        let mut context = EncoderContext::with_settings(&encoder, settings);
        context.options_mut().update(&request.options);

        let index = self.streams.next_index();
        let slot = self.format.new_stream()?;
        debug_assert_eq!(slot.index, index);
        slot.time_base = time_base;

        debug!(
            "声明流 {}: 编码器={}, 媒体类型={}",
            index,
            encoder.name,
            encoder.media_type()
        );
        self.streams
            .push(OutputStream::new(index, context, time_base))
    }

    /// 确定编码器和参数来源
    fn resolve_source(&self, request: &StreamRequest) -> HuiResult<(EncoderInfo, Source)> {
        match (&request.codec, &request.template) {
            (Some(_), Some(_)) | (None, None) => Err(HuiError::InvalidArgument(
                "codec 和 template 必须且只能给出一个".into(),
            )),
            (None, Some(template)) => match (&template.encoder, &template.settings) {
                (Some(encoder), Some(settings)) => {
                    Ok((*encoder, Source::Template(settings.clone())))
                }
                _ => Err(HuiError::InvalidArgument(
                    "模板缺少编码器或编码参数".into(),
                )),
            },
            (Some(name), None) => Ok((*self.codecs.resolve_encoder(name)?, Source::Defaults)),
        }
    }
}

/// 填充视频默认参数
fn configure_video(settings: &mut EncoderSettings, rate: Option<Rational>) -> HuiResult<()> {
    let frame_rate = rate
        .unwrap_or(Rational::new(DEFAULT_FRAME_RATE, 1))
        .reduce();
    if frame_rate.num <= 0 || frame_rate.den <= 0 {
        return Err(HuiError::InvalidArgument(format!("无效的帧率: {frame_rate}")));
    }
    settings.pixel_format = DEFAULT_PIXEL_FORMAT;
    settings.width = DEFAULT_WIDTH;
    settings.height = DEFAULT_HEIGHT;
    settings.bit_rate = DEFAULT_VIDEO_BIT_RATE;
    settings.bit_rate_tolerance = DEFAULT_VIDEO_BIT_RATE_TOLERANCE;
    settings.ticks_per_frame = 1;
    settings.frame_rate = frame_rate;
    settings.time_base = frame_rate.invert();
    Ok(())
}

/// 填充音频默认参数
fn configure_audio(
    settings: &mut EncoderSettings,
    encoder: &EncoderInfo,
    rate: Option<Rational>,
) -> HuiResult<()> {
    let rate = rate
        .unwrap_or(Rational::new(DEFAULT_SAMPLE_RATE, 1))
        .reduce();
    if rate.den != 1 || rate.num <= 0 {
        return Err(HuiError::InvalidArgument(format!(
            "采样率必须是正整数: {rate}"
        )));
    }
    if let Some(first) = encoder.sample_formats.first() {
        settings.sample_format = *first;
    }
    settings.bit_rate = DEFAULT_AUDIO_BIT_RATE;
    settings.bit_rate_tolerance = DEFAULT_AUDIO_BIT_RATE_TOLERANCE;
    settings.sample_rate = rate.num as u32;
    settings.channel_layout = ChannelLayout::STEREO;
    Ok(())
}

/// 应用调用方给出的覆盖值
fn apply_overrides(settings: &mut EncoderSettings, request: &StreamRequest) {
    if let Some(width) = request.width {
        settings.width = width;
    }
    if let Some(height) = request.height {
        settings.height = height;
    }
    if let Some(bit_rate) = request.bit_rate {
        settings.bit_rate = bit_rate;
    }
    if let Some(tolerance) = request.bit_rate_tolerance {
        settings.bit_rate_tolerance = tolerance;
    }
}
