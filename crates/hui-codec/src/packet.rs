//! 压缩数据包 (Packet).
//!
//! 编码器输出、送入封装器的一帧压缩数据. 时间戳以 `time_base` 为单位.

use bytes::Bytes;
use hui_core::rational::rescale_q;
use hui_core::{HuiError, HuiResult, NOPTS_VALUE, Rational};

/// 压缩数据包
#[derive(Debug, Clone)]
pub struct Packet {
    /// 压缩数据
    pub data: Bytes,
    /// 显示时间戳 (PTS)
    pub pts: i64,
    /// 解码时间戳 (DTS)
    pub dts: i64,
    /// 数据包时长 (以 time_base 为单位)
    pub duration: i64,
    /// 时间基, 未定义表示尚未与任何流关联
    pub time_base: Rational,
    /// 所属流的索引
    pub stream_index: usize,
    /// 是否为关键帧
    pub is_keyframe: bool,
}

impl Packet {
    /// 创建空数据包
    pub fn empty() -> Self {
        Self {
            data: Bytes::new(),
            pts: NOPTS_VALUE,
            dts: NOPTS_VALUE,
            duration: 0,
            time_base: Rational::UNDEFINED,
            stream_index: 0,
            is_keyframe: false,
        }
    }

    /// 从数据创建数据包
    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..Self::empty()
        }
    }

    /// 数据大小 (字节)
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 是否为空包
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 将时间戳从 `from` 重缩放到 `to`
    ///
    /// pts/dts 为 `NOPTS_VALUE` 时保持不变; duration 仅在为正时重缩放.
    /// 不修改 `time_base` 字段.
    pub fn rescale_ts(&mut self, from: Rational, to: Rational) {
        if self.pts != NOPTS_VALUE {
            self.pts = rescale_q(self.pts, from, to);
        }
        if self.dts != NOPTS_VALUE {
            self.dts = rescale_q(self.dts, from, to);
        }
        if self.duration > 0 {
            self.duration = rescale_q(self.duration, from, to);
        }
    }

    /// 将数据包重定到目标时间基
    ///
    /// - 目标时间基分子为 0: 返回 `InvalidArgument`
    /// - 数据包尚无时间基: 直接采用目标时间基, 不做缩放
    /// - 时间基相同: 不做任何处理
    pub fn rebase(&mut self, dst: Rational) -> HuiResult<()> {
        if dst.num == 0 || dst.den == 0 {
            return Err(HuiError::InvalidArgument(format!(
                "不能重定到零时间基: {dst}"
            )));
        }
        if self.time_base.num == 0 || self.time_base.den == 0 {
            self.time_base = dst;
            return Ok(());
        }
        if self.time_base == dst {
            return Ok(());
        }
        self.rescale_ts(self.time_base, dst);
        self.time_base = dst;
        Ok(())
    }
}
