//! 测试用编码器、格式和会话构造.

use std::io;
use std::sync::Arc;

use bytes::Bytes;

use hui_codec::{CodecId, CodecParameters, CodecRegistry, Encoder, EncoderInfo, Frame, Packet};
use hui_core::{Dictionary, HuiError, HuiResult, MediaType, PixelFormat};
use hui_format::muxers::null::NullMuxer;
use hui_format::{
    FormatFlags, FormatId, FormatInfo, FormatRegistry, IoContext, Muxer, Stream,
};

use crate::container::OutputContainer;

/// 测试编码器输出的 extradata
pub(crate) const FAKE_EXTRA_DATA: &[u8] = &[0, 0, 0, 1];

/// 只识别 `crf` 和 `preset` 选项的假 H.264 编码器
struct FakeEncoder {
    pending: Option<Packet>,
    flushing: bool,
}

fn create_fake_encoder() -> HuiResult<Box<dyn Encoder>> {
    Ok(Box::new(FakeEncoder {
        pending: None,
        flushing: false,
    }))
}

impl Encoder for FakeEncoder {
    fn codec_id(&self) -> CodecId {
        CodecId::H264
    }

    fn name(&self) -> &str {
        "fake264"
    }

    fn open(&mut self, _params: &CodecParameters, options: &mut Dictionary) -> HuiResult<()> {
        options.remove("crf");
        options.remove("preset");
        Ok(())
    }

    fn send_frame(&mut self, frame: Option<&Frame>) -> HuiResult<()> {
        let Some(frame) = frame else {
            self.flushing = true;
            return Ok(());
        };
        let mut pkt = Packet::from_data(Bytes::from_static(&[0xAB]));
        pkt.pts = frame.pts();
        pkt.dts = frame.pts();
        pkt.is_keyframe = true;
        self.pending = Some(pkt);
        Ok(())
    }

    fn receive_packet(&mut self) -> HuiResult<Packet> {
        if let Some(pkt) = self.pending.take() {
            return Ok(pkt);
        }
        if self.flushing {
            return Err(HuiError::Eof);
        }
        Err(HuiError::NeedMoreData)
    }

    fn extra_data(&self) -> Option<&[u8]> {
        Some(FAKE_EXTRA_DATA)
    }

    fn flush(&mut self) {
        self.pending = None;
        self.flushing = false;
    }
}

fn no_encoder() -> HuiResult<Box<dyn Encoder>> {
    Err(HuiError::Unsupported("测试用编码器".into()))
}

const FAKE_H264: EncoderInfo = EncoderInfo {
    name: "fake264",
    codec_id: CodecId::H264,
    sample_formats: &[],
    pixel_formats: &[PixelFormat::Yuv420p],
    factory: create_fake_encoder,
};

const FAKE_SRT: EncoderInfo = EncoderInfo {
    name: "fakesrt",
    codec_id: CodecId::Srt,
    sample_formats: &[],
    pixel_formats: &[],
    factory: no_encoder,
};

/// 内置编码器加上测试编码器
pub(crate) fn codecs() -> Arc<CodecRegistry> {
    let mut reg = CodecRegistry::new();
    hui_codec::register_all(&mut reg);
    reg.register_encoder(FAKE_H264);
    reg.register_encoder(FAKE_SRT);
    Arc::new(reg)
}

/// 内置格式
pub(crate) fn format(id: FormatId) -> FormatInfo {
    let mut reg = FormatRegistry::new();
    hui_format::register_all(&mut reg);
    *reg.find(id).unwrap()
}

/// 在头部或尾部写入时失败的封装器
struct FailingMuxer {
    fail_trailer: bool,
}

fn create_failing_muxer() -> HuiResult<Box<dyn Muxer>> {
    Ok(Box::new(FailingMuxer {
        fail_trailer: false,
    }))
}

fn create_trailer_failing_muxer() -> HuiResult<Box<dyn Muxer>> {
    Ok(Box::new(FailingMuxer { fail_trailer: true }))
}

fn permission_denied() -> HuiError {
    io::Error::from(io::ErrorKind::PermissionDenied).into()
}

impl Muxer for FailingMuxer {
    fn format_id(&self) -> FormatId {
        FormatId::Null
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn write_header(
        &mut self,
        _io: &mut IoContext,
        _streams: &[Stream],
        _metadata: &Dictionary,
        _options: &mut Dictionary,
    ) -> HuiResult<()> {
        match self.fail_trailer {
            true => Ok(()),
            false => Err(permission_denied()),
        }
    }

    fn write_packet(&mut self, _io: &mut IoContext, _packet: &Packet) -> HuiResult<()> {
        Ok(())
    }

    fn write_trailer(&mut self, _io: &mut IoContext) -> HuiResult<()> {
        match self.fail_trailer {
            true => Err(permission_denied()),
            false => Ok(()),
        }
    }
}

/// 要求全局头部的无文件格式
pub(crate) const GLOBAL_HEADER_FORMAT: FormatInfo = FormatInfo {
    id: FormatId::Null,
    name: "globalnull",
    flags: FormatFlags::GLOBAL_HEADER.union(FormatFlags::NO_FILE),
    media_types: &[MediaType::Video, MediaType::Audio],
    codecs: &[],
    default_video_codec: CodecId::H264,
    default_audio_codec: CodecId::Aac,
    factory: NullMuxer::create,
};

/// 头部写入失败的无文件格式
pub(crate) const FAILING_FORMAT: FormatInfo = FormatInfo {
    id: FormatId::Null,
    name: "failing",
    flags: FormatFlags::NO_FILE,
    media_types: &[MediaType::Video, MediaType::Audio],
    codecs: &[],
    default_video_codec: CodecId::None,
    default_audio_codec: CodecId::None,
    factory: create_failing_muxer,
};

/// 尾部写入失败、需要打开文件的格式
pub(crate) const TRAILER_FAILING_FORMAT: FormatInfo = FormatInfo {
    id: FormatId::Null,
    name: "failtrailer",
    flags: FormatFlags::empty(),
    media_types: &[MediaType::Video, MediaType::Audio],
    codecs: &[],
    default_video_codec: CodecId::None,
    default_audio_codec: CodecId::None,
    factory: create_trailer_failing_muxer,
};

/// 接受字幕流的无文件格式
pub(crate) const SUBTITLE_FORMAT: FormatInfo = FormatInfo {
    id: FormatId::Null,
    name: "subnull",
    flags: FormatFlags::NO_FILE,
    media_types: &[MediaType::Subtitle],
    codecs: &[],
    default_video_codec: CodecId::None,
    default_audio_codec: CodecId::None,
    factory: NullMuxer::create,
};

/// 使用 null 格式的会话
pub(crate) fn null_container() -> OutputContainer {
    container(&format(FormatId::Null))
}

/// 使用指定格式的会话
pub(crate) fn container(format: &FormatInfo) -> OutputContainer {
    OutputContainer::new("test-output", format, codecs()).unwrap()
}

/// 指定流和时间戳的单字节数据包
pub(crate) fn packet(stream_index: usize, pts: i64, time_base: hui_core::Rational) -> Packet {
    let mut pkt = Packet::from_data(vec![stream_index as u8]);
    pkt.stream_index = stream_index;
    pkt.pts = pts;
    pkt.dts = pts;
    pkt.time_base = time_base;
    pkt
}
