//! 输出流.
//!
//! `OutputStream` 独占一个编码器上下文. 时间基在会话开始时定型,
//! 之后写入的数据包都重定到这个时间基.

use log::debug;

use hui_codec::{
    CodecId, EncoderContext, EncoderInfo, EncoderSettings, Frame, Packet,
};
use hui_core::{Dictionary, HuiError, HuiResult, MediaType, Rational};
use hui_format::Stream;

/// 流模板
///
/// 从已有流复制配置时使用. 编码器和参数都必须存在才能用于声明新流.
#[derive(Debug, Clone, Default)]
pub struct StreamTemplate {
    /// 解析出的编码器
    pub encoder: Option<EncoderInfo>,
    /// 编码参数
    pub settings: Option<EncoderSettings>,
}

impl StreamTemplate {
    /// 由编码器和参数构造模板
    pub fn new(encoder: EncoderInfo, settings: EncoderSettings) -> Self {
        Self {
            encoder: Some(encoder),
            settings: Some(settings),
        }
    }

    /// 编码器和参数是否都已给出
    pub fn is_complete(&self) -> bool {
        self.encoder.is_some() && self.settings.is_some()
    }
}

/// 输出流
#[derive(Debug)]
pub struct OutputStream {
    /// 流索引, 等于声明顺序
    index: usize,
    /// 独占的编码器上下文
    context: EncoderContext,
    /// 流时间基
    time_base: Rational,
    /// 流级元数据, 定型时复制到原生流槽位
    metadata: Dictionary,
    /// 是否已为输出定型
    finalized: bool,
}

impl OutputStream {
    pub(crate) fn new(index: usize, context: EncoderContext, time_base: Rational) -> Self {
        Self {
            index,
            context,
            time_base,
            metadata: Dictionary::new(),
            finalized: false,
        }
    }

    /// 流索引
    pub fn index(&self) -> usize {
        self.index
    }

    /// 媒体类型
    pub fn media_type(&self) -> MediaType {
        self.context.settings().media_type
    }

    /// 编解码器标识
    pub fn codec_id(&self) -> CodecId {
        self.context.encoder().codec_id
    }

    /// 编码器上下文
    pub fn context(&self) -> &EncoderContext {
        &self.context
    }

    /// 可修改的编码器上下文
    pub fn context_mut(&mut self) -> &mut EncoderContext {
        &mut self.context
    }

    /// 编码参数
    pub fn settings(&self) -> &EncoderSettings {
        self.context.settings()
    }

    /// 流专属选项, 优先于会话选项
    pub fn options_mut(&mut self) -> &mut Dictionary {
        self.context.options_mut()
    }

    /// 流时间基
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /// 设置流时间基, 会话开始后不可修改
    pub fn set_time_base(&mut self, time_base: Rational) -> HuiResult<()> {
        if self.finalized {
            return Err(HuiError::InvalidArgument(format!(
                "流 {} 已开始编码, 时间基不可修改",
                self.index
            )));
        }
        self.time_base = time_base;
        Ok(())
    }

    /// 流级元数据
    pub fn metadata(&self) -> &Dictionary {
        &self.metadata
    }

    /// 可修改的流级元数据
    pub fn metadata_mut(&mut self) -> &mut Dictionary {
        &mut self.metadata
    }

    /// 编码器是否已打开
    pub fn is_open(&self) -> bool {
        self.context.is_open()
    }

    /// 复制当前配置为模板
    pub fn as_template(&self) -> StreamTemplate {
        StreamTemplate::new(*self.context.encoder(), self.context.settings().clone())
    }

    /// 合并会话选项后打开编码器
    ///
    /// 会话选项只在流专属选项没有同名键时生效. 返回打开后不再留在
    /// 流选项中的会话选项键, 即被消费的键.
    pub(crate) fn open_with(&mut self, session_options: &Dictionary) -> HuiResult<Vec<String>> {
        let options = self.context.options_mut();
        for (key, value) in session_options.iter() {
            options.set_if_absent(key, value);
        }
        self.context.open()?;

        let remaining = self.context.options();
        Ok(session_options
            .keys()
            .filter(|key| !remaining.contains_key(key))
            .map(String::from)
            .collect())
    }

    /// 为输出定型: 把参数、时间基和元数据写入原生流槽位
    ///
    /// 时间基尚未设置时采用编码器上下文的时间基. 可重复调用.
    pub fn finalize_for_output(&mut self, slot: &mut Stream) {
        let settings = self.context.settings();
        if self.time_base.num == 0 || !self.time_base.is_valid() {
            self.time_base = settings.time_base;
        }
        slot.time_base = self.time_base;
        slot.avg_frame_rate = match settings.media_type {
            MediaType::Video => settings.frame_rate,
            _ => Rational::UNDEFINED,
        };
        slot.codec_params = self.context.parameters();
        slot.metadata = self.metadata.clone();
        self.finalized = true;
        debug!(
            "流 {} 定型: {}, 时间基={}, extradata={} 字节",
            self.index,
            self.context.encoder().name,
            self.time_base,
            slot.codec_params.extra_data.len()
        );
    }

    /// 编码一帧并取出全部输出数据包
    ///
    /// 编码器未打开时先打开. `None` 表示刷新编码器.
    /// 输出数据包带有本流索引和编码器时间基.
    pub fn encode(&mut self, frame: Option<&Frame>) -> HuiResult<Vec<Packet>> {
        self.context.open()?;
        self.context.send_frame(frame)?;

        let time_base = self.context.settings().time_base;
        let mut packets = Vec::new();
        loop {
            match self.context.receive_packet() {
                Ok(mut packet) => {
                    packet.stream_index = self.index;
                    packet.time_base = time_base;
                    packets.push(packet);
                }
                Err(HuiError::NeedMoreData) | Err(HuiError::Eof) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(packets)
    }

    /// 关闭编码器, 可重复调用
    pub(crate) fn close(&mut self) {
        self.context.close();
    }
}
