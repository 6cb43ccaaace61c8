//! # hui-output
//!
//! Hui 封装会话框架输出容器编排库.
//!
//! 一个 [`OutputContainer`] 对应一次输出会话, 生命周期为:
//!
//! 1. `declare_stream()` 声明输出流 (只能在开始前)
//! 2. `start()` 打开所有编码器并写入容器头部 (首次 `write()` 时自动调用)
//! 3. `write()` / `write_all()` 写入已编码的数据包
//! 4. `close()` 写入尾部并释放编码器和 I/O
//!
//! 会话不使用隐式析构收尾: 没有调用 `close()` 时尾部不会写出.

pub mod configure;
pub mod container;
pub mod diagnostics;
pub mod mux;
pub mod registry;
pub mod session;
pub mod shutdown;
pub mod stream;

#[cfg(test)]
mod test_support;

// 重导出常用类型
pub use configure::StreamRequest;
pub use container::OutputContainer;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, NullSink};
pub use registry::StreamRegistry;
pub use stream::{OutputStream, StreamTemplate};
