//! # Hui (汇)
//!
//! 纯 Rust 实现的多路复用输出会话框架.
//!
//! 一个输出会话把若干条编码流汇入同一个容器:
//! - **声明流**: 按编解码器名称或已有流模板配置编码器, 校验容器兼容性
//! - **开始**: 打开编码器, 写入容器头部, 报告未被使用的选项
//! - **写入**: 把数据包重定到流时间基后交给交错写入器
//! - **关闭**: 写入尾部, 释放编码器和 I/O
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use hui::output::StreamRequest;
//!
//! let mut output = hui::open_output("tone.wav", None).unwrap();
//! output.declare_stream(StreamRequest::codec("pcm_s16le").rate(48000)).unwrap();
//! output.start().unwrap();
//! output.close(false).unwrap();
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `hui-core` | 核心类型与工具 |
//! | `hui-codec` | 编码器框架 |
//! | `hui-format` | 容器格式与交错写入 |
//! | `hui-output` | 输出会话编排 |

use std::sync::Arc;

pub mod logging;

/// 核心类型与工具 (时间基、字典、错误)
pub use hui_core as core;

/// 编码器框架
pub use hui_codec as codec;

/// 容器格式框架
pub use hui_format as format;

/// 输出会话编排
pub use hui_output as output;

/// 获取 Hui 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册所有内置编码器的共享注册表
pub fn default_codec_registry() -> Arc<hui_codec::CodecRegistry> {
    let mut registry = hui_codec::CodecRegistry::new();
    hui_codec::register_all(&mut registry);
    Arc::new(registry)
}

/// 创建已注册所有内置容器格式的注册表
pub fn default_format_registry() -> hui_format::FormatRegistry {
    let mut registry = hui_format::FormatRegistry::new();
    hui_format::register_all(&mut registry);
    registry
}

/// 使用内置注册表创建输出会话
///
/// 未给出格式名称时按 `url` 的扩展名猜测格式.
pub fn open_output(
    url: &str,
    format_name: Option<&str>,
) -> hui_core::HuiResult<hui_output::OutputContainer> {
    hui_output::OutputContainer::open(
        url,
        format_name,
        &default_format_registry(),
        default_codec_registry(),
    )
}
