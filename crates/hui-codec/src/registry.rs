//! 编码器注册表.
//!
//! 支持按编码器名称查找, 或按编解码器描述名 (含别名) 查找首个可用编码器.

use log::debug;

use hui_core::{HuiError, HuiResult, MediaType, PixelFormat, SampleFormat};

use crate::codec_id::CodecId;
use crate::encoder::Encoder;

/// 编码器工厂函数类型
pub type EncoderFactory = fn() -> HuiResult<Box<dyn Encoder>>;

/// 编码器描述 (不透明的编码器句柄)
///
/// 注册表中的一个条目, 描述编码器能力并负责实例化.
#[derive(Debug, Clone, Copy)]
pub struct EncoderInfo {
    /// 编码器名称
    pub name: &'static str,
    /// 编解码器标识
    pub codec_id: CodecId,
    /// 支持的采样格式, 第一个为首选
    pub sample_formats: &'static [SampleFormat],
    /// 支持的像素格式, 第一个为首选
    pub pixel_formats: &'static [PixelFormat],
    /// 工厂函数
    pub factory: EncoderFactory,
}

impl EncoderInfo {
    /// 媒体类型
    pub fn media_type(&self) -> MediaType {
        self.codec_id.media_type()
    }

    /// 创建编码器实例
    pub fn create(&self) -> HuiResult<Box<dyn Encoder>> {
        (self.factory)()
    }
}

/// 编码器注册表
///
/// 按注册顺序保存编码器; 同一编解码器的多个实现中, 先注册的优先.
#[derive(Default)]
pub struct CodecRegistry {
    encoders: Vec<EncoderInfo>,
}

impl CodecRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个编码器
    pub fn register_encoder(&mut self, info: EncoderInfo) {
        self.encoders.push(info);
    }

    /// 按编码器名称精确查找
    pub fn find_encoder_by_name(&self, name: &str) -> Option<&EncoderInfo> {
        self.encoders.iter().find(|e| e.name == name)
    }

    /// 查找指定编解码器的首个编码器
    pub fn find_encoder(&self, codec_id: CodecId) -> Option<&EncoderInfo> {
        self.encoders.iter().find(|e| e.codec_id == codec_id)
    }

    /// 解析编码器: 先按编码器名称, 再按编解码器描述名/别名
    pub fn resolve_encoder(&self, name: &str) -> HuiResult<&EncoderInfo> {
        if let Some(info) = self.find_encoder_by_name(name) {
            return Ok(info);
        }
        let info = CodecId::from_name(name)
            .and_then(|id| self.find_encoder(id))
            .ok_or_else(|| HuiError::UnknownCodec(name.to_string()))?;
        debug!("编解码器 {} 通过描述名解析为编码器 {}", name, info.name);
        Ok(info)
    }

    /// 获取所有已注册的编码器
    pub fn list_encoders(&self) -> Vec<(CodecId, &str)> {
        self.encoders.iter().map(|e| (e.codec_id, e.name)).collect()
    }
}
