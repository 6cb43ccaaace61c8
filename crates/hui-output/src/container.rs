//! 输出容器会话.
//!
//! `OutputContainer` 拥有一个原生格式上下文、全部输出流和会话状态.
//! 状态只会单向推进: 配置中 -> 已开始 (`started`) -> 已关闭 (`done`).

use std::collections::HashSet;
use std::sync::Arc;

use log::warn;

use hui_codec::{CodecId, CodecRegistry};
use hui_core::{Dictionary, HuiResult};
use hui_format::{FormatContext, FormatInfo, FormatRegistry, IoContext};

use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::registry::StreamRegistry;
use crate::stream::OutputStream;

/// 输出容器会话
pub struct OutputContainer {
    /// 原生格式上下文
    pub(crate) format: FormatContext,
    /// 编码器注册表
    pub(crate) codecs: Arc<CodecRegistry>,
    /// 已声明的输出流
    pub(crate) streams: StreamRegistry,
    /// 会话选项, 作用于每条流和头部写入
    pub(crate) options: Dictionary,
    /// 只作用于头部写入的容器选项
    pub(crate) container_options: Dictionary,
    /// 容器级元数据, 开始时复制到头部
    pub(crate) metadata: Dictionary,
    /// 已被消费的选项键
    pub(crate) used_options: HashSet<String>,
    /// 是否已开始
    pub(crate) started: bool,
    /// 是否已关闭
    pub(crate) done: bool,
    /// I/O 是否由本会话打开
    pub(crate) io_owned: bool,
    /// 诊断接收者
    pub(crate) diagnostics: Box<dyn DiagnosticSink>,
}

impl OutputContainer {
    /// 以指定格式创建会话
    pub fn new(
        url: impl Into<String>,
        format: &FormatInfo,
        codecs: Arc<CodecRegistry>,
    ) -> HuiResult<Self> {
        Ok(Self {
            format: FormatContext::new(format, url)?,
            codecs,
            streams: StreamRegistry::new(),
            options: Dictionary::new(),
            container_options: Dictionary::new(),
            metadata: Dictionary::new(),
            used_options: HashSet::new(),
            started: false,
            done: false,
            io_owned: false,
            diagnostics: Box::new(NullSink),
        })
    }

    /// 创建会话, 未给出格式名称时按文件扩展名猜测
    pub fn open(
        url: impl Into<String>,
        format_name: Option<&str>,
        formats: &FormatRegistry,
        codecs: Arc<CodecRegistry>,
    ) -> HuiResult<Self> {
        let url = url.into();
        let format = formats.guess_output(format_name, &url)?;
        Self::new(url, format, codecs)
    }

    /// 设置会话选项
    pub fn with_options(mut self, options: Dictionary) -> Self {
        self.options = options;
        self
    }

    /// 设置只用于头部写入的容器选项
    pub fn with_container_options(mut self, options: Dictionary) -> Self {
        self.container_options = options;
        self
    }

    /// 使用调用方提供的 I/O, 会话不会关闭它
    pub fn with_io(mut self, io: IoContext) -> Self {
        self.format.set_io(io);
        self.io_owned = false;
        self
    }

    /// 设置诊断接收者
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    /// 输出目标名称
    pub fn url(&self) -> &str {
        self.format.url()
    }

    /// 输出格式
    pub fn format(&self) -> &FormatInfo {
        self.format.format()
    }

    /// 原生格式上下文
    pub fn format_context(&self) -> &FormatContext {
        &self.format
    }

    /// 会话选项
    pub fn options(&self) -> &Dictionary {
        &self.options
    }

    /// 容器选项
    pub fn container_options(&self) -> &Dictionary {
        &self.container_options
    }

    /// 容器级元数据
    pub fn metadata(&self) -> &Dictionary {
        &self.metadata
    }

    /// 可修改的容器级元数据
    pub fn metadata_mut(&mut self) -> &mut Dictionary {
        &mut self.metadata
    }

    /// 已声明的输出流
    pub fn streams(&self) -> &StreamRegistry {
        &self.streams
    }

    /// 按索引获取流
    pub fn stream(&self, index: usize) -> Option<&OutputStream> {
        self.streams.get(index)
    }

    /// 按索引获取可修改的流
    pub fn stream_mut(&mut self, index: usize) -> Option<&mut OutputStream> {
        self.streams.get_mut(index)
    }

    /// 是否已开始
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// 是否已关闭
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 已被消费的会话/容器选项键 (按字典序)
    pub fn used_options(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.used_options.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// 可以在此容器中声明的编解码器 (格式兼容且有可用编码器)
    pub fn supported_codecs(&self) -> Vec<CodecId> {
        self.format()
            .supported_codecs()
            .into_iter()
            .filter(|id| self.codecs.find_encoder(*id).is_some())
            .collect()
    }

    /// 格式的默认视频编解码器名称
    pub fn default_video_codec(&self) -> Option<&'static str> {
        codec_name(self.format().default_video_codec)
    }

    /// 格式的默认音频编解码器名称
    pub fn default_audio_codec(&self) -> Option<&'static str> {
        codec_name(self.format().default_audio_codec)
    }
}

fn codec_name(id: CodecId) -> Option<&'static str> {
    (id != CodecId::None).then(|| id.name())
}

impl Drop for OutputContainer {
    fn drop(&mut self) {
        if self.started && !self.done {
            warn!("输出容器 {} 未调用 close(), 尾部没有写出", self.url());
        }
    }
}

impl std::fmt::Debug for OutputContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputContainer")
            .field("format", &self.format)
            .field("streams", &self.streams.len())
            .field("options", &self.options)
            .field("started", &self.started)
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GLOBAL_HEADER_FORMAT, codecs, container, format, null_container};
    use hui_format::FormatId;

    #[test]
    fn test_可用编解码器需要编码器() {
        let wav = container(&format(FormatId::Wav));
        let supported = wav.supported_codecs();
        assert!(supported.contains(&CodecId::PcmS16le));
        assert!(supported.contains(&CodecId::PcmU8));
        assert!(!supported.contains(&CodecId::PcmS16be));
        assert!(!supported.contains(&CodecId::RawVideo));

        let null = null_container();
        let supported = null.supported_codecs();
        assert!(supported.contains(&CodecId::RawVideo));
        assert!(supported.contains(&CodecId::H264));
        // 格式接受但没有编码器
        assert!(!supported.contains(&CodecId::Aac));
        // 格式不接受字幕
        assert!(!supported.contains(&CodecId::Srt));
    }

    #[test]
    fn test_默认编解码器名称() {
        let wav = container(&format(FormatId::Wav));
        assert_eq!(wav.default_video_codec(), None);
        assert_eq!(wav.default_audio_codec(), Some("pcm_s16le"));

        let global = container(&GLOBAL_HEADER_FORMAT);
        assert_eq!(global.default_video_codec(), Some("h264"));
        assert_eq!(global.default_audio_codec(), Some("aac"));
    }

    #[test]
    fn test_按扩展名打开() {
        let mut formats = FormatRegistry::new();
        hui_format::register_all(&mut formats);
        let output = OutputContainer::open("clip.yuv", None, &formats, codecs()).unwrap();
        assert_eq!(output.format().id, FormatId::RawVideo);
        assert_eq!(output.url(), "clip.yuv");
        assert!(!output.is_started());
        assert!(!output.is_done());

        let output = OutputContainer::open("clip.yuv", Some("null"), &formats, codecs()).unwrap();
        assert_eq!(output.format().id, FormatId::Null);
        assert!(OutputContainer::open("clip", None, &formats, codecs()).is_err());
    }
}
