//! WAV (RIFF WAVE) 封装器.
//!
//! 头部在内存中拼好后一次写出: RIFF/WAVE, fmt, 可选的 LIST/INFO, 以及大小待定的 data 块头.
//! 尾部回填 RIFF 和 data 两个大小字段, 输出不可 seek 时保留占位的 0.
//!
//! 私有选项 `write_info` (默认 1) 为 0 时不写 INFO 元数据.

use std::io::SeekFrom;

use bytes::{BufMut, BytesMut};
use log::debug;

use hui_codec::{CodecId, Packet};
use hui_core::{Dictionary, HuiError, HuiResult};

use crate::format_id::FormatId;
use crate::io::IoContext;
use crate::muxer::Muxer;
use crate::stream::Stream;

/// WAV 可封装的编解码器
pub const WAV_CODECS: &[CodecId] = &[
    CodecId::PcmU8,
    CodecId::PcmS16le,
    CodecId::PcmS32le,
    CodecId::PcmF32le,
];

/// fmt 块的格式码
const FORMAT_PCM: u16 = 1;
const FORMAT_FLOAT: u16 = 3;

/// 元数据键与 INFO 子块
const INFO_TAGS: &[(&str, &[u8; 4])] = &[
    ("title", b"INAM"),
    ("artist", b"IART"),
    ("comment", b"ICMT"),
    ("encoder", b"ISFT"),
];

/// (格式码, 位深)
fn sample_layout(codec_id: CodecId) -> Option<(u16, u16)> {
    match codec_id {
        CodecId::PcmU8 => Some((FORMAT_PCM, 8)),
        CodecId::PcmS16le => Some((FORMAT_PCM, 16)),
        CodecId::PcmS32le => Some((FORMAT_PCM, 32)),
        CodecId::PcmF32le => Some((FORMAT_FLOAT, 32)),
        _ => None,
    }
}

/// 追加一个 RIFF 子块, 奇数长度补一个 0
fn put_chunk(buf: &mut BytesMut, id: &[u8; 4], body: &[u8]) {
    buf.put_slice(id);
    buf.put_u32_le(body.len() as u32);
    buf.put_slice(body);
    if body.len() % 2 == 1 {
        buf.put_u8(0);
    }
}

/// LIST 块内容, 元数据里没有可写的键时为 None
fn info_list(metadata: &Dictionary) -> Option<BytesMut> {
    let mut list = BytesMut::new();
    list.put_slice(b"INFO");
    for (key, tag) in INFO_TAGS {
        if let Some(value) = metadata.get(key) {
            let mut text = Vec::with_capacity(value.len() + 1);
            text.extend_from_slice(value.as_bytes());
            text.push(0);
            put_chunk(&mut list, tag, &text);
        }
    }
    (list.len() > 4).then_some(list)
}

pub struct WavMuxer {
    /// RIFF 头在输出中的位置
    riff_start: u64,
    /// data 块大小字段的位置
    data_size_at: u64,
    data_len: u64,
}

impl WavMuxer {
    pub fn create() -> HuiResult<Box<dyn Muxer>> {
        Ok(Box::new(Self {
            riff_start: 0,
            data_size_at: 0,
            data_len: 0,
        }))
    }
}

impl Muxer for WavMuxer {
    fn format_id(&self) -> FormatId {
        FormatId::Wav
    }

    fn name(&self) -> &str {
        "wav"
    }

    fn write_header(
        &mut self,
        io: &mut IoContext,
        streams: &[Stream],
        metadata: &Dictionary,
        options: &mut Dictionary,
    ) -> HuiResult<()> {
        let [stream] = streams else {
            return Err(HuiError::InvalidArgument(format!(
                "WAV 只能有一个音频流, 实际 {} 个",
                streams.len()
            )));
        };
        let with_info = options
            .take_parsed::<u8>("write_info")
            .map_err(HuiError::InvalidArgument)?
            .is_none_or(|v| v != 0);
        let Some(audio) = stream.codec_params.audio() else {
            return Err(HuiError::InvalidArgument("WAV 只能封装音频".into()));
        };
        let codec_id = stream.codec_params.codec_id;
        let (format_tag, bits) = sample_layout(codec_id)
            .ok_or_else(|| HuiError::Unsupported(format!("WAV 不能封装 {codec_id}")))?;

        let channels = audio.channel_layout.channels as u16;
        let block_align = channels * (bits / 8);
        let mut fmt = BytesMut::with_capacity(16);
        fmt.put_u16_le(format_tag);
        fmt.put_u16_le(channels);
        fmt.put_u32_le(audio.sample_rate);
        fmt.put_u32_le(audio.sample_rate * u32::from(block_align));
        fmt.put_u16_le(block_align);
        fmt.put_u16_le(bits);

        let mut header = BytesMut::with_capacity(64);
        header.put_slice(b"RIFF");
        header.put_u32_le(0);
        header.put_slice(b"WAVE");
        put_chunk(&mut header, b"fmt ", &fmt);
        if let Some(list) = info_list(metadata).filter(|_| with_info) {
            put_chunk(&mut header, b"LIST", &list);
        }
        header.put_slice(b"data");

        self.riff_start = io.position()?;
        self.data_size_at = self.riff_start + header.len() as u64;
        self.data_len = 0;
        header.put_u32_le(0);
        io.write_all(&header)?;

        debug!(
            "WAV 头部 {} 字节: {} Hz, {} 声道, {} 位",
            header.len(),
            audio.sample_rate,
            channels,
            bits
        );
        Ok(())
    }

    fn write_packet(&mut self, io: &mut IoContext, packet: &Packet) -> HuiResult<()> {
        io.write_all(&packet.data)?;
        self.data_len += packet.data.len() as u64;
        Ok(())
    }

    fn write_trailer(&mut self, io: &mut IoContext) -> HuiResult<()> {
        if !io.is_seekable() {
            debug!("WAV 输出不可 seek, 大小字段保持为 0");
            return Ok(());
        }
        if self.data_len % 2 == 1 {
            io.write_u8(0)?;
        }
        let end = io.position()?;
        let riff_size = (end - self.riff_start - 8) as u32;
        let data_size = self.data_len as u32;
        for (at, value) in [(self.riff_start + 4, riff_size), (self.data_size_at, data_size)] {
            io.seek(SeekFrom::Start(at))?;
            io.write_u32_le(value)?;
        }
        io.seek(SeekFrom::Start(end))?;

        debug!("WAV 回填大小: RIFF {riff_size}, data {data_size}");
        Ok(())
    }
}
