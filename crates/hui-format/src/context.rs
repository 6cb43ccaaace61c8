//! 输出格式上下文.
//!
//! `FormatContext` 是一个输出容器的原生句柄: 持有封装器实例、流槽位、
//! 头部元数据和 I/O. 写头部之后数据包经过交错缓冲再交给封装器.
//! 不调用 `write_trailer()` 时, 交错缓冲中的数据包不会写出.

use log::debug;

use hui_codec::Packet;
use hui_core::{Dictionary, HuiError, HuiResult};

use crate::format::FormatInfo;
use crate::interleave::Interleaver;
use crate::io::IoContext;
use crate::muxer::Muxer;
use crate::stream::Stream;

/// 头部阶段由上下文自身识别的选项
const OPT_MAX_INTERLEAVE_DELTA: &str = "max_interleave_delta";

/// 输出格式上下文
pub struct FormatContext {
    /// 输出格式描述
    format: FormatInfo,
    /// 输出目标名称
    url: String,
    /// 封装器实例
    muxer: Box<dyn Muxer>,
    /// 流槽位
    streams: Vec<Stream>,
    /// 头部元数据
    metadata: Dictionary,
    /// 输出 I/O
    io: Option<IoContext>,
    /// 交错缓冲, 写头部时创建
    interleaver: Option<Interleaver>,
    /// 交错跨度 (微秒), None 表示使用默认值
    max_interleave_delta: Option<i64>,
    /// 是否已写入尾部
    trailer_written: bool,
}

impl FormatContext {
    /// 为指定格式创建上下文
    pub fn new(format: &FormatInfo, url: impl Into<String>) -> HuiResult<Self> {
        Ok(Self {
            format: *format,
            url: url.into(),
            muxer: format.create_muxer()?,
            streams: Vec::new(),
            metadata: Dictionary::new(),
            io: None,
            interleaver: None,
            max_interleave_delta: None,
            trailer_written: false,
        })
    }

    /// 输出格式描述
    pub fn format(&self) -> &FormatInfo {
        &self.format
    }

    /// 输出目标名称
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 添加一个流槽位, 索引等于添加顺序
    pub fn new_stream(&mut self) -> HuiResult<&mut Stream> {
        if self.header_written() {
            return Err(HuiError::Format("写入头部后不能再添加流".into()));
        }
        let index = self.streams.len();
        self.streams.push(Stream::new(index));
        Ok(&mut self.streams[index])
    }

    /// 流槽位列表
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// 可修改的流槽位
    pub fn stream_mut(&mut self, index: usize) -> Option<&mut Stream> {
        self.streams.get_mut(index)
    }

    /// 流数量
    pub fn nb_streams(&self) -> usize {
        self.streams.len()
    }

    /// 头部元数据
    pub fn metadata(&self) -> &Dictionary {
        &self.metadata
    }

    /// 可修改的头部元数据
    pub fn metadata_mut(&mut self) -> &mut Dictionary {
        &mut self.metadata
    }

    /// 设置交错跨度 (微秒)
    pub fn set_max_interleave_delta(&mut self, delta_us: i64) {
        self.max_interleave_delta = Some(delta_us);
    }

    // ========================
    // I/O
    // ========================

    /// 是否已有 I/O
    pub fn has_io(&self) -> bool {
        self.io.is_some()
    }

    /// 使用外部提供的 I/O
    pub fn set_io(&mut self, io: IoContext) {
        self.io = Some(io);
    }

    /// 以写入方式打开 `url` 对应的文件
    pub fn open_io(&mut self) -> HuiResult<()> {
        if self.io.is_none() {
            self.io = Some(IoContext::open_write(&self.url)?);
        }
        Ok(())
    }

    /// 刷新并释放 I/O, 可重复调用
    pub fn close_io(&mut self) -> HuiResult<()> {
        if let Some(mut io) = self.io.take() {
            io.close()?;
            debug!("关闭输出 I/O: {}", self.url);
        }
        Ok(())
    }

    // ========================
    // 封装流程
    // ========================

    /// 是否已写入头部
    pub fn header_written(&self) -> bool {
        self.interleaver.is_some()
    }

    /// 是否已写入尾部
    pub fn trailer_written(&self) -> bool {
        self.trailer_written
    }

    /// 写入容器头部
    ///
    /// 识别的选项会从 `options` 中移除: 上下文自身的 `max_interleave_delta`,
    /// 以及封装器私有选项. 无需文件的格式在没有 I/O 时使用空输出.
    pub fn write_header(&mut self, options: &mut Dictionary) -> HuiResult<()> {
        if self.header_written() {
            return Err(HuiError::Format("头部已经写入".into()));
        }
        if let Some(delta) = options
            .take_parsed::<i64>(OPT_MAX_INTERLEAVE_DELTA)
            .map_err(HuiError::InvalidArgument)?
        {
            self.max_interleave_delta = Some(delta);
        }
        if self.io.is_none() {
            if !self.format.is_file_less() {
                return Err(HuiError::Format(format!("输出 {} 的 I/O 未打开", self.url)));
            }
            self.io = Some(IoContext::null());
        }
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| HuiError::Format("I/O 未打开".into()))?;
        self.muxer
            .write_header(io, &self.streams, &self.metadata, options)?;

        let mut interleaver = Interleaver::new(self.streams.len());
        if let Some(delta) = self.max_interleave_delta {
            interleaver.set_max_delta(delta);
        }
        self.interleaver = Some(interleaver);
        debug!(
            "{} 写入头部: {} 条流, 未识别选项={}",
            self.format.name,
            self.streams.len(),
            options
        );
        Ok(())
    }

    /// 经交错缓冲写入一个数据包
    ///
    /// 数据包时间戳必须已经是所属流的时间基.
    pub fn write_interleaved(&mut self, packet: Packet) -> HuiResult<()> {
        if self.trailer_written {
            return Err(HuiError::Format("尾部已写入, 不能再写数据包".into()));
        }
        let interleaver = self
            .interleaver
            .as_mut()
            .ok_or_else(|| HuiError::Format("尚未写入头部".into()))?;
        interleaver.push(packet)?;
        while let Some(ready) = self.pop_ready(false) {
            self.write_direct(&ready)?;
        }
        Ok(())
    }

    /// 清空交错缓冲并写入容器尾部
    pub fn write_trailer(&mut self) -> HuiResult<()> {
        if self.trailer_written {
            return Ok(());
        }
        if !self.header_written() {
            return Err(HuiError::Format("尚未写入头部".into()));
        }
        while let Some(ready) = self.pop_ready(true) {
            self.write_direct(&ready)?;
        }
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| HuiError::Format("I/O 未打开".into()))?;
        self.muxer.write_trailer(io)?;
        io.flush()?;
        self.trailer_written = true;
        debug!("{} 写入尾部: {}", self.format.name, self.url);
        Ok(())
    }

    fn pop_ready(&mut self, flush: bool) -> Option<Packet> {
        self.interleaver.as_mut().and_then(|il| il.pop(flush))
    }

    fn write_direct(&mut self, packet: &Packet) -> HuiResult<()> {
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| HuiError::Format("I/O 未打开".into()))?;
        self.muxer.write_packet(io, packet)?;
        if let Some(stream) = self.streams.get_mut(packet.stream_index) {
            stream.nb_frames += 1;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FormatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatContext")
            .field("format", &self.format.name)
            .field("url", &self.url)
            .field("streams", &self.streams.len())
            .field("header_written", &self.header_written())
            .field("trailer_written", &self.trailer_written)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format_id::FormatId;
    use crate::io::MemoryBuffer;
    use crate::registry::FormatRegistry;
    use hui_codec::CodecId;
    use hui_core::Rational;

    fn format(id: FormatId) -> FormatInfo {
        let mut reg = FormatRegistry::new();
        crate::register_all(&mut reg);
        *reg.find(id).unwrap()
    }

    fn packet(index: usize, pts: i64, tb: Rational, byte: u8) -> Packet {
        let mut pkt = Packet::from_data(vec![byte]);
        pkt.stream_index = index;
        pkt.pts = pts;
        pkt.dts = pts;
        pkt.time_base = tb;
        pkt
    }

    #[test]
    fn test_头部前后的流管理() {
        let mut ctx = FormatContext::new(&format(FormatId::Null), "null").unwrap();
        assert_eq!(ctx.new_stream().unwrap().index, 0);
        assert_eq!(ctx.new_stream().unwrap().index, 1);
        let mut options = Dictionary::new();
        options.set("max_interleave_delta", "0");
        options.set("other", "1");
        ctx.write_header(&mut options).unwrap();
        assert_eq!(options.keys().collect::<Vec<_>>(), vec!["other"]);
        assert!(ctx.has_io());
        assert!(ctx.new_stream().is_err());
        assert!(ctx.write_header(&mut Dictionary::new()).is_err());
    }

    #[test]
    fn test_需要文件的格式必须先打开_io() {
        let mut ctx = FormatContext::new(&format(FormatId::RawAudio), "out.pcm").unwrap();
        ctx.new_stream().unwrap();
        let err = ctx.write_header(&mut Dictionary::new()).unwrap_err();
        assert!(matches!(err, HuiError::Format(_)));
        assert!(!ctx.header_written());
    }

    #[test]
    fn test_交错写入与尾部清空() {
        let buffer = MemoryBuffer::new();
        let mut ctx = FormatContext::new(&format(FormatId::RawAudio), "mem").unwrap();
        ctx.set_io(IoContext::memory(buffer.clone()));
        ctx.new_stream().unwrap().codec_params.codec_id = CodecId::PcmU8;
        ctx.write_header(&mut Dictionary::new()).unwrap();

        let tb = Rational::new(1, 8000);
        ctx.write_interleaved(packet(0, 0, tb, 1)).unwrap();
        ctx.write_interleaved(packet(0, 1, tb, 2)).unwrap();
        ctx.write_trailer().unwrap();
        ctx.write_trailer().unwrap();
        assert_eq!(buffer.to_vec(), vec![1, 2]);
        assert_eq!(ctx.streams()[0].nb_frames, 2);
        assert!(ctx.write_interleaved(packet(0, 2, tb, 3)).is_err());

        ctx.close_io().unwrap();
        ctx.close_io().unwrap();
        assert!(!ctx.has_io());
    }

    #[test]
    fn test_未写头部不能写数据包() {
        let mut ctx = FormatContext::new(&format(FormatId::Null), "null").unwrap();
        ctx.new_stream().unwrap();
        let err = ctx
            .write_interleaved(packet(0, 0, Rational::new(1, 25), 0))
            .unwrap_err();
        assert!(matches!(err, HuiError::Format(_)));
        assert!(matches!(ctx.write_trailer(), Err(HuiError::Format(_))));
    }
}
