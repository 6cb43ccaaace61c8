//! 流信息定义.
//!
//! 描述输出容器中的一条流的原生槽位: 封装器从这里读取编解码器参数和元数据.

use hui_codec::CodecParameters;
use hui_core::{Dictionary, MediaType, Rational};

/// 流信息
#[derive(Debug, Clone)]
pub struct Stream {
    /// 流索引 (在容器中的位置, 从 0 开始)
    pub index: usize,
    /// 时间基, 写入的数据包时间戳以此为单位
    pub time_base: Rational,
    /// 平均帧率 (音频流为未定义)
    pub avg_frame_rate: Rational,
    /// 编解码器参数 (含 extradata)
    pub codec_params: CodecParameters,
    /// 已写入的数据包数
    pub nb_frames: u64,
    /// 元数据 (标题, 语言等)
    pub metadata: Dictionary,
}

impl Stream {
    /// 创建空的流槽位
    pub fn new(index: usize) -> Self {
        Self {
            index,
            time_base: Rational::UNDEFINED,
            avg_frame_rate: Rational::UNDEFINED,
            codec_params: CodecParameters::default(),
            nb_frames: 0,
            metadata: Dictionary::new(),
        }
    }

    /// 媒体类型
    pub fn media_type(&self) -> MediaType {
        self.codec_params.codec_id.media_type()
    }
}
