//! # hui-format
//!
//! Hui 封装会话框架容器格式库, 提供封装框架.
//!
//! - [`FormatInfo`]: 输出格式描述 (标志位、编解码器兼容性、默认编解码器)
//! - [`Muxer`]: 各格式的码流写入器
//! - [`FormatContext`]: 一个输出容器的原生上下文 (流槽位、元数据、I/O、交错写入)
//! - [`IoContext`]: 写入侧 I/O 抽象 (文件、共享内存、空输出)

pub mod context;
pub mod format;
pub mod format_id;
pub mod interleave;
pub mod io;
pub mod muxer;
pub mod muxers;
pub mod registry;
pub mod stream;

// 重导出常用类型
pub use context::FormatContext;
pub use format::{FormatFlags, FormatInfo};
pub use format_id::FormatId;
pub use interleave::Interleaver;
pub use io::IoContext;
pub use muxer::Muxer;
pub use registry::FormatRegistry;
pub use stream::Stream;

/// 注册所有内置容器格式
pub fn register_all(registry: &mut FormatRegistry) {
    muxers::register_all_muxers(registry);
}
