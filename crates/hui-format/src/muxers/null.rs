//! 空封装器.
//!
//! 不产生任何输出, 只统计收到的数据包. 用于测试编码链路和性能.

use log::debug;

use hui_codec::Packet;
use hui_core::{Dictionary, HuiResult};

use crate::format_id::FormatId;
use crate::io::IoContext;
use crate::muxer::Muxer;
use crate::stream::Stream;

/// 空封装器
pub struct NullMuxer {
    /// 收到的数据包数
    packets: u64,
    /// 收到的字节数
    bytes: u64,
}

impl NullMuxer {
    /// 创建实例 (工厂函数)
    pub fn create() -> HuiResult<Box<dyn Muxer>> {
        Ok(Box::new(Self {
            packets: 0,
            bytes: 0,
        }))
    }
}

impl Muxer for NullMuxer {
    fn format_id(&self) -> FormatId {
        FormatId::Null
    }

    fn name(&self) -> &str {
        "null"
    }

    fn write_header(
        &mut self,
        _io: &mut IoContext,
        streams: &[Stream],
        _metadata: &Dictionary,
        _options: &mut Dictionary,
    ) -> HuiResult<()> {
        self.packets = 0;
        self.bytes = 0;
        debug!("null 封装器: {} 条流", streams.len());
        Ok(())
    }

    fn write_packet(&mut self, _io: &mut IoContext, packet: &Packet) -> HuiResult<()> {
        self.packets += 1;
        self.bytes += packet.size() as u64;
        Ok(())
    }

    fn write_trailer(&mut self, _io: &mut IoContext) -> HuiResult<()> {
        debug!("null 封装器: 共丢弃 {} 个数据包, {} 字节", self.packets, self.bytes);
        Ok(())
    }
}
