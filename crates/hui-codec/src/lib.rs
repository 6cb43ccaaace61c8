//! # hui-codec
//!
//! Hui 封装会话框架编码器库, 提供编码器注册、编码器上下文与 Packet/Frame 抽象.
//!
//! ## 内置编码器
//!
//! - **视频**: rawvideo
//! - **音频**: pcm_u8, pcm_s16le, pcm_s16be, pcm_s32le, pcm_f32le
//!
//! ## 使用示例
//!
//! ```rust
//! use hui_codec::{CodecId, CodecRegistry};
//!
//! let mut reg = CodecRegistry::new();
//! hui_codec::register_all(&mut reg);
//!
//! // 按编码器名称或编解码器描述名解析
//! let info = reg.resolve_encoder("pcm_s16le").unwrap();
//! assert_eq!(info.codec_id, CodecId::PcmS16le);
//! ```

pub mod codec_id;
pub mod codec_parameters;
pub mod context;
pub mod encoder;
pub mod encoders;
pub mod frame;
pub mod packet;
pub mod registry;

// 重导出常用类型
pub use codec_id::CodecId;
pub use codec_parameters::{AudioParams, CodecParameters, MediaParams, VideoParams};
pub use context::{CodecFlags, EncoderContext, EncoderSettings};
pub use encoder::Encoder;
pub use frame::{AudioFrame, Frame, VideoFrame};
pub use packet::Packet;
pub use registry::{CodecRegistry, EncoderInfo};

/// 注册所有内置编码器
pub fn register_all(registry: &mut CodecRegistry) {
    encoders::register_all_encoders(registry);
}
