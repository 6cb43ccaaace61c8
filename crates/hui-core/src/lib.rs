//! # hui-core
//!
//! Hui 封装会话框架核心库, 提供基础类型定义、错误处理和工具函数.
//!
//! 其余 crate 共用的有理数、时间戳、媒体类型、采样/像素格式、
//! 声道布局以及键值字典都定义在这里.

pub mod channel_layout;
pub mod dictionary;
pub mod error;
pub mod media_type;
pub mod pixel_format;
pub mod rational;
pub mod sample_format;
pub mod timestamp;

// 重导出常用类型
pub use channel_layout::ChannelLayout;
pub use dictionary::Dictionary;
pub use error::{HuiError, HuiResult};
pub use media_type::MediaType;
pub use pixel_format::PixelFormat;
pub use rational::Rational;
pub use sample_format::SampleFormat;
pub use timestamp::{NOPTS_VALUE, to_micros};
