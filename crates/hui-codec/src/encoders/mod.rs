//! 内置编码器.
//!
//! 两个内置编码器都是"一帧进一包出", 共用 [`OneShotQueue`] 管理输出.

pub mod pcm;
pub mod rawvideo;

use hui_core::{HuiError, HuiResult, PixelFormat, SampleFormat};

use crate::codec_id::CodecId;
use crate::frame::Frame;
use crate::packet::Packet;
use crate::registry::{CodecRegistry, EncoderFactory, EncoderInfo};

/// 至多缓存一个数据包的输出队列
#[derive(Debug, Default)]
pub(crate) struct OneShotQueue {
    ready: bool,
    draining: bool,
    pending: Option<Packet>,
}

impl OneShotQueue {
    /// 编码器打开后调用
    pub(crate) fn arm(&mut self) {
        *self = Self {
            ready: true,
            ..Self::default()
        };
    }

    /// 检查能否接收输入; 刷新信号在此记录并返回 `Ok(None)`
    pub(crate) fn admit<'f>(&mut self, frame: Option<&'f Frame>) -> HuiResult<Option<&'f Frame>> {
        if !self.ready {
            return Err(HuiError::Codec("编码器未打开".into()));
        }
        if self.pending.is_some() {
            return Err(HuiError::NeedMoreData);
        }
        if frame.is_none() {
            self.draining = true;
        }
        Ok(frame)
    }

    /// 以帧的时间信息封装一个关键帧数据包
    pub(crate) fn emit(&mut self, frame: &Frame, payload: Vec<u8>) {
        let mut pkt = Packet::from_data(payload);
        pkt.pts = frame.pts();
        pkt.dts = frame.pts();
        pkt.duration = frame.duration();
        pkt.time_base = frame.time_base();
        pkt.is_keyframe = true;
        self.pending = Some(pkt);
    }

    pub(crate) fn take(&mut self) -> HuiResult<Packet> {
        match self.pending.take() {
            Some(pkt) => Ok(pkt),
            None if self.draining => Err(HuiError::Eof),
            None => Err(HuiError::NeedMoreData),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
        self.draining = false;
    }
}

/// rawvideo 接受的像素格式
const RAW_PIXEL_FORMATS: &[PixelFormat] = &[
    PixelFormat::Yuv420p,
    PixelFormat::Yuv422p,
    PixelFormat::Yuv444p,
    PixelFormat::Nv12,
    PixelFormat::Rgb24,
    PixelFormat::Rgba,
    PixelFormat::Gray8,
];

/// PCM 变体: 名称, 标识, 输入采样格式, 工厂
const PCM_VARIANTS: &[(&str, CodecId, SampleFormat, EncoderFactory)] = &[
    ("pcm_u8", CodecId::PcmU8, SampleFormat::U8, pcm::PcmEncoder::new_u8),
    ("pcm_s16le", CodecId::PcmS16le, SampleFormat::S16, pcm::PcmEncoder::new_s16le),
    ("pcm_s16be", CodecId::PcmS16be, SampleFormat::S16, pcm::PcmEncoder::new_s16be),
    ("pcm_s32le", CodecId::PcmS32le, SampleFormat::S32, pcm::PcmEncoder::new_s32le),
    ("pcm_f32le", CodecId::PcmF32le, SampleFormat::F32, pcm::PcmEncoder::new_f32le),
];

/// 注册所有内置编码器
pub fn register_all_encoders(registry: &mut CodecRegistry) {
    registry.register_encoder(EncoderInfo {
        name: "rawvideo",
        codec_id: CodecId::RawVideo,
        sample_formats: &[],
        pixel_formats: RAW_PIXEL_FORMATS,
        factory: rawvideo::RawVideoEncoder::create,
    });
    for (name, codec_id, format, factory) in PCM_VARIANTS {
        registry.register_encoder(EncoderInfo {
            name: *name,
            codec_id: *codec_id,
            sample_formats: std::slice::from_ref(format),
            pixel_formats: &[],
            factory: *factory,
        });
    }
}
