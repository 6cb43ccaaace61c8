//! 会话诊断输出.
//!
//! 会话不直接依赖全局日志: 非致命的诊断信息交给构造时注入的
//! [`DiagnosticSink`], 默认丢弃.

use std::fmt;
use std::sync::{Arc, Mutex};

/// 诊断信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// 会话选项中没有被任何流或头部写入消费的键 (按提供顺序)
    UnusedOptions(Vec<String>),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnusedOptions(keys) => write!(f, "以下选项未被使用: {}", keys.join(", ")),
        }
    }
}

/// 诊断接收者
pub trait DiagnosticSink: Send {
    /// 上报一条诊断
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&Diagnostic) + Send,
{
    fn report(&mut self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// 丢弃所有诊断
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: &Diagnostic) {}
}

/// 以 `warn` 级别写入 `log`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// 收集诊断, 克隆的句柄共享同一份记录
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    /// 创建空的收集器
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收集的诊断
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 是否还没有收到诊断
    pub fn is_empty(&self) -> bool {
        self.diagnostics().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_收集器共享记录() {
        let sink = CollectingSink::new();
        let mut handle: Box<dyn DiagnosticSink> = Box::new(sink.clone());
        handle.report(&Diagnostic::UnusedOptions(vec!["crf".into(), "preset".into()]));
        assert_eq!(
            sink.diagnostics(),
            vec![Diagnostic::UnusedOptions(vec!["crf".into(), "preset".into()])]
        );
        assert_eq!(
            sink.diagnostics()[0].to_string(),
            "以下选项未被使用: crf, preset"
        );
    }

    #[test]
    fn test_闭包作为接收者() {
        let mut seen = Vec::new();
        {
            let mut sink = |d: &Diagnostic| seen.push(d.to_string());
            sink.report(&Diagnostic::UnusedOptions(vec!["x".into()]));
        }
        assert_eq!(seen, vec!["以下选项未被使用: x".to_string()]);
    }
}
