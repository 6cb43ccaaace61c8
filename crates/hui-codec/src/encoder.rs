//! 编码器 trait 定义.
//!
//! 所有编码器实现必须实现 `Encoder` trait.

use hui_core::{Dictionary, HuiResult};

use crate::codec_id::CodecId;
use crate::codec_parameters::CodecParameters;
use crate::frame::Frame;
use crate::packet::Packet;

/// 编码器 trait
///
/// 编码流程:
/// 1. 调用 `open()` 提供参数和私有选项
/// 2. 调用 `send_frame()` 送入原始帧数据
/// 3. 调用 `receive_packet()` 取出压缩数据包
/// 4. 送入 None 表示编码结束, 刷新编码器缓存
pub trait Encoder: Send {
    /// 获取编码器标识
    fn codec_id(&self) -> CodecId;

    /// 获取编码器名称
    fn name(&self) -> &str;

    /// 使用参数和选项打开编码器
    ///
    /// 编码器从 `options` 中移除自己识别的键, 剩下的键视为未消费.
    fn open(&mut self, params: &CodecParameters, options: &mut Dictionary) -> HuiResult<()>;

    /// 送入一帧原始数据进行编码
    ///
    /// `None` 表示刷新 (flush), 之后只能取出缓存的数据包.
    fn send_frame(&mut self, frame: Option<&Frame>) -> HuiResult<()>;

    /// 从编码器取出一个压缩数据包
    ///
    /// # 返回
    /// - `Err(HuiError::NeedMoreData)`: 需要送入更多帧
    /// - `Err(HuiError::Eof)`: 所有数据包已取出
    fn receive_packet(&mut self) -> HuiResult<Packet>;

    /// 打开后生成的额外数据 (全局头部), 默认没有
    fn extra_data(&self) -> Option<&[u8]> {
        None
    }

    /// 刷新编码器, 清空内部状态
    fn flush(&mut self);
}
