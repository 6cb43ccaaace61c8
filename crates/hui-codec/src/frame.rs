//! 编码器输入的原始帧.

use hui_core::{ChannelLayout, MediaType, NOPTS_VALUE, PixelFormat, Rational, SampleFormat};

/// 一帧图像
///
/// `data` 按平面存放, 平面数由像素格式决定 (YUV420P 为 3 个).
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<Vec<u8>>,
    /// 每个平面一行所占字节
    pub linesize: Vec<usize>,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub pts: i64,
    pub time_base: Rational,
    /// 以 time_base 计
    pub duration: i64,
}

impl VideoFrame {
    /// 平面未分配的空帧
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        let planes = pixel_format.plane_count() as usize;
        Self {
            data: std::iter::repeat_with(Vec::new).take(planes).collect(),
            linesize: vec![0; planes],
            width,
            height,
            pixel_format,
            pts: NOPTS_VALUE,
            time_base: Rational::UNDEFINED,
            duration: 0,
        }
    }

    /// 按像素格式分配全部平面, 内容清零
    pub fn alloc(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        let mut frame = Self::new(width, height, pixel_format);
        let planes = frame.data.iter_mut().zip(frame.linesize.iter_mut());
        for (plane, (data, linesize)) in planes.enumerate() {
            *linesize = pixel_format.plane_linesize(plane, width).unwrap_or(0);
            let rows = pixel_format.plane_height(plane, height).unwrap_or(0);
            *data = vec![0; *linesize * rows];
        }
        frame
    }

    /// 所有平面的字节总数
    pub fn payload_len(&self) -> usize {
        self.data.iter().map(Vec::len).sum()
    }
}

/// 一段音频
///
/// 交错格式只有一个缓冲区, 平面格式每个声道一个.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub data: Vec<Vec<u8>>,
    /// 每声道采样数
    pub nb_samples: u32,
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channel_layout: ChannelLayout,
    pub pts: i64,
    pub time_base: Rational,
    pub duration: i64,
}

impl AudioFrame {
    pub fn new(
        nb_samples: u32,
        sample_rate: u32,
        sample_format: SampleFormat,
        channel_layout: ChannelLayout,
    ) -> Self {
        let buffers = match sample_format.is_planar() {
            true => channel_layout.channels as usize,
            false => 1,
        };
        Self {
            data: std::iter::repeat_with(Vec::new).take(buffers).collect(),
            nb_samples,
            sample_rate,
            sample_format,
            channel_layout,
            pts: NOPTS_VALUE,
            time_base: Rational::UNDEFINED,
            duration: 0,
        }
    }

    /// 单个缓冲区应有的字节数
    pub fn buffer_len(&self) -> usize {
        let per_sample = self.sample_format.bytes_per_sample() as usize;
        let interleaved = match self.sample_format.is_planar() {
            true => 1,
            false => self.channel_layout.channels as usize,
        };
        self.nb_samples as usize * per_sample * interleaved
    }
}

/// 送入编码器的帧
#[derive(Debug, Clone)]
pub enum Frame {
    Video(VideoFrame),
    Audio(AudioFrame),
}

impl Frame {
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Video(_) => MediaType::Video,
            Self::Audio(_) => MediaType::Audio,
        }
    }

    pub fn pts(&self) -> i64 {
        match self {
            Self::Video(v) => v.pts,
            Self::Audio(a) => a.pts,
        }
    }

    pub fn time_base(&self) -> Rational {
        match self {
            Self::Video(v) => v.time_base,
            Self::Audio(a) => a.time_base,
        }
    }

    pub fn duration(&self) -> i64 {
        match self {
            Self::Video(v) => v.duration,
            Self::Audio(a) => a.duration,
        }
    }
}
