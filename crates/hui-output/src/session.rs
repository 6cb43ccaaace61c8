//! 会话开始: 打开编码器并写入容器头部.

use log::debug;

use hui_core::{HuiError, HuiResult};

use crate::container::OutputContainer;
use crate::diagnostics::Diagnostic;

impl OutputContainer {
    /// 开始编码
    ///
    /// 按注册顺序打开尚未打开的编码器 (先合并会话选项), 为每条流定型,
    /// 必要时打开输出 I/O, 复制元数据后写入头部. 已开始时直接返回.
    ///
    /// I/O 打开或头部写入失败返回 `Mux` 错误, 会话停留在部分开始的状态,
    /// 不能重试, 调用方仍应调用 `close()` 做清理.
    pub fn start(&mut self) -> HuiResult<()> {
        if self.started {
            return Ok(());
        }

        for stream in self.streams.iter_mut() {
            if !stream.is_open() {
                let consumed = stream.open_with(&self.options)?;
                self.used_options.extend(consumed);
            }
        }

        for stream in self.streams.iter_mut() {
            let slot = self.format.stream_mut(stream.index()).ok_or_else(|| {
                HuiError::InvalidArgument(format!("流 {} 没有对应的原生槽位", stream.index()))
            })?;
            stream.finalize_for_output(slot);
        }

        if !self.format.has_io() && !self.format.format().is_file_less() {
            self.format.open_io().map_err(HuiError::into_mux)?;
            self.io_owned = true;
        }

        *self.format.metadata_mut() = self.metadata.clone();

        let mut all_options = self.options.clone();
        all_options.update(&self.container_options);
        let mut header_options = all_options.clone();
        self.format
            .write_header(&mut header_options)
            .map_err(HuiError::into_mux)?;
        for key in all_options.keys() {
            if !header_options.contains_key(key) {
                self.used_options.insert(key.to_string());
            }
        }

        let unused: Vec<String> = self
            .options
            .keys()
            .filter(|key| !self.used_options.contains(*key))
            .map(String::from)
            .collect();
        if !unused.is_empty() {
            self.diagnostics.report(&Diagnostic::UnusedOptions(unused));
        }

        self.started = true;
        debug!(
            "输出容器 {} 开始编码: {} 条流",
            self.url(),
            self.streams.len()
        );
        Ok(())
    }
}
