//! 容器格式注册表.
//!
//! 管理所有已注册的输出格式, 支持按名称、标识和文件名查找.

use log::debug;

use hui_core::{HuiError, HuiResult};

use crate::format::FormatInfo;
use crate::format_id::FormatId;

/// 容器格式注册表
#[derive(Default)]
pub struct FormatRegistry {
    /// 按注册顺序保存的格式描述
    formats: Vec<FormatInfo>,
}

impl FormatRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个输出格式, 同一标识重复注册时替换旧条目
    pub fn register_format(&mut self, info: FormatInfo) {
        if let Some(slot) = self.formats.iter_mut().find(|f| f.id == info.id) {
            *slot = info;
        } else {
            self.formats.push(info);
        }
    }

    /// 按格式标识查找
    pub fn find(&self, id: FormatId) -> Option<&FormatInfo> {
        self.formats.iter().find(|f| f.id == id)
    }

    /// 按格式名称查找
    pub fn find_by_name(&self, name: &str) -> Option<&FormatInfo> {
        self.formats.iter().find(|f| f.name == name)
    }

    /// 根据可选的格式名称和输出文件名确定输出格式
    ///
    /// 给出名称时只按名称查找; 否则按文件扩展名猜测.
    pub fn guess_output(&self, name: Option<&str>, filename: &str) -> HuiResult<&FormatInfo> {
        if let Some(name) = name {
            return self
                .find_by_name(name)
                .ok_or_else(|| HuiError::FormatNotFound(format!("未知的输出格式: {name}")));
        }
        let info = FormatId::from_filename(filename)
            .and_then(|id| self.find(id))
            .ok_or_else(|| {
                HuiError::FormatNotFound(format!("无法从文件名猜测输出格式: {filename}"))
            })?;
        debug!("根据文件名 {} 选择输出格式 {}", filename, info.name);
        Ok(info)
    }

    /// 获取所有已注册的格式
    pub fn list_formats(&self) -> Vec<(FormatId, &str)> {
        self.formats.iter().map(|f| (f.id, f.name)).collect()
    }
}
