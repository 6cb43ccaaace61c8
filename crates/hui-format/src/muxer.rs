//! 封装器 (Muxer) trait 定义.
//!
//! 定义了将已交错的数据包写入具体容器格式的接口.

use hui_codec::Packet;
use hui_core::{Dictionary, HuiResult};

use crate::format_id::FormatId;
use crate::io::IoContext;
use crate::stream::Stream;

/// 封装器 trait
///
/// 只负责比特流写入; 数据包顺序由 [`crate::Interleaver`] 决定.
///
/// 使用流程:
/// 1. `write_header()` 写入容器头部
/// 2. 循环 `write_packet()` 写入数据包
/// 3. `write_trailer()` 写入容器尾部 (回填长度等)
pub trait Muxer: Send {
    /// 获取格式标识
    fn format_id(&self) -> FormatId;

    /// 获取格式名称
    fn name(&self) -> &str;

    /// 写入容器头部
    ///
    /// # 参数
    /// - `streams`: 输出流列表
    /// - `metadata`: 容器级元数据
    /// - `options`: 格式私有选项, 识别的键需要从字典中移除
    fn write_header(
        &mut self,
        io: &mut IoContext,
        streams: &[Stream],
        metadata: &Dictionary,
        options: &mut Dictionary,
    ) -> HuiResult<()>;

    /// 写入一个数据包 (时间戳已是所属流的时间基)
    fn write_packet(&mut self, io: &mut IoContext, packet: &Packet) -> HuiResult<()>;

    /// 写入容器尾部, 完成封装
    fn write_trailer(&mut self, io: &mut IoContext) -> HuiResult<()>;
}
