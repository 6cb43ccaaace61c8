//! 会话关闭.

use log::debug;

use hui_core::{HuiError, HuiResult};

use crate::container::OutputContainer;

impl OutputContainer {
    /// 关闭会话
    ///
    /// - 已关闭: 不做任何事; `strict` 时返回 `AlreadyClosed`
    /// - 未开始: 不做任何事; `strict` 时返回 `NotStarted`
    /// - 已开始: 写入尾部, 按注册顺序关闭编码器, 关闭本会话打开的 I/O
    ///
    /// 尾部写入失败时仍会释放编码器和 I/O 并进入关闭状态, 然后返回该错误.
    pub fn close(&mut self, strict: bool) -> HuiResult<()> {
        if self.done {
            return if strict {
                Err(HuiError::AlreadyClosed)
            } else {
                Ok(())
            };
        }
        if !self.started {
            return if strict {
                Err(HuiError::NotStarted)
            } else {
                Ok(())
            };
        }

        let trailer = self.format.write_trailer().map_err(HuiError::into_mux);

        for stream in self.streams.iter_mut() {
            stream.close();
        }

        let io = if self.io_owned && !self.format.format().is_file_less() {
            self.format.close_io().map_err(HuiError::into_mux)
        } else {
            Ok(())
        };

        self.done = true;
        debug!("输出容器 {} 已关闭", self.url());
        trailer.and(io)
    }
}
