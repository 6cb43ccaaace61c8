//! Raw 封装器.
//!
//! 不写任何头部, 按写入顺序直接输出单条流的数据包内容.

use hui_codec::{CodecId, Packet};
use hui_core::{Dictionary, HuiError, HuiResult};

use crate::format_id::FormatId;
use crate::io::IoContext;
use crate::muxer::Muxer;
use crate::stream::Stream;

/// rawaudio 可封装的编解码器
pub const RAW_AUDIO_CODECS: &[CodecId] = &[
    CodecId::PcmU8,
    CodecId::PcmS16le,
    CodecId::PcmS16be,
    CodecId::PcmS32le,
    CodecId::PcmF32le,
];

/// Raw 封装器 (rawvideo / rawaudio 共用)
pub struct RawMuxer {
    format_id: FormatId,
}

impl RawMuxer {
    /// 创建 rawvideo 封装器
    pub fn create_video() -> HuiResult<Box<dyn Muxer>> {
        Ok(Box::new(Self {
            format_id: FormatId::RawVideo,
        }))
    }

    /// 创建 rawaudio 封装器
    pub fn create_audio() -> HuiResult<Box<dyn Muxer>> {
        Ok(Box::new(Self {
            format_id: FormatId::RawAudio,
        }))
    }
}

impl Muxer for RawMuxer {
    fn format_id(&self) -> FormatId {
        self.format_id
    }

    fn name(&self) -> &str {
        self.format_id.name()
    }

    fn write_header(
        &mut self,
        _io: &mut IoContext,
        streams: &[Stream],
        _metadata: &Dictionary,
        _options: &mut Dictionary,
    ) -> HuiResult<()> {
        if streams.len() != 1 {
            return Err(HuiError::InvalidArgument(format!(
                "{} 仅支持单条流, 实际为 {} 条",
                self.name(),
                streams.len()
            )));
        }
        Ok(())
    }

    fn write_packet(&mut self, io: &mut IoContext, packet: &Packet) -> HuiResult<()> {
        io.write_all(&packet.data)
    }

    fn write_trailer(&mut self, _io: &mut IoContext) -> HuiResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryBuffer;

    #[test]
    fn test_原样输出数据包() {
        let buffer = MemoryBuffer::new();
        let mut io = IoContext::memory(buffer.clone());
        let mut muxer = RawMuxer::create_audio().unwrap();
        muxer
            .write_header(&mut io, &[Stream::new(0)], &Dictionary::new(), &mut Dictionary::new())
            .unwrap();
        muxer
            .write_packet(&mut io, &Packet::from_data(vec![1u8, 2]))
            .unwrap();
        muxer
            .write_packet(&mut io, &Packet::from_data(vec![3u8]))
            .unwrap();
        muxer.write_trailer(&mut io).unwrap();
        assert_eq!(buffer.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_多条流被拒绝() {
        let mut io = IoContext::null();
        let mut muxer = RawMuxer::create_video().unwrap();
        let err = muxer
            .write_header(
                &mut io,
                &[Stream::new(0), Stream::new(1)],
                &Dictionary::new(),
                &mut Dictionary::new(),
            )
            .unwrap_err();
        assert!(matches!(err, HuiError::InvalidArgument(_)));
    }
}
