//! 数据包写入.

use hui_codec::Packet;
use hui_core::{HuiError, HuiResult};

use crate::container::OutputContainer;

impl OutputContainer {
    /// 写入一个已编码的数据包
    ///
    /// 尚未开始时先调用 `start()`. 时间戳重定到目标流的时间基后交给交错写入器,
    /// 最终写出顺序由交错写入器决定.
    pub fn write(&mut self, mut packet: Packet) -> HuiResult<()> {
        if self.done {
            return Err(HuiError::AlreadyClosed);
        }
        self.start()?;

        let stream = self.streams.get(packet.stream_index).ok_or_else(|| {
            HuiError::InvalidArgument(format!(
                "bad stream index {} (共 {} 条流)",
                packet.stream_index,
                self.streams.len()
            ))
        })?;
        packet.rebase(stream.time_base())?;
        self.format
            .write_interleaved(packet)
            .map_err(HuiError::into_mux)
    }

    /// 按顺序写入一组数据包, 遇到第一个错误即停止
    pub fn write_all<I>(&mut self, packets: I) -> HuiResult<()>
    where
        I: IntoIterator<Item = Packet>,
    {
        for packet in packets {
            self.write(packet)?;
        }
        Ok(())
    }
}
