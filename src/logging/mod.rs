//! 日志初始化.
//!
//! 库 crate 通过 `log` 门面输出, 这里安装 tracing 订阅器并桥接 `log` 记录.
//! - console: 彩色, 带源码位置
//! - file: 无色, 按天滚动, 文件名为 `{prefix}.{date}.log`
//!
//! 过滤级别取 `HUI_LOG` 环境变量, 未设置时使用配置中的级别.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// 覆盖配置级别的环境变量
pub const LOG_ENV: &str = "HUI_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// 日志目录, 为空时不写文件
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_true")]
    pub console: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "hui".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
            file_prefix: default_file_prefix(),
            console: true,
        }
    }
}

impl LoggingConfig {
    /// 从 JSON 文件读取配置, 缺省字段取默认值
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取日志配置失败, path={}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("解析日志配置失败, path={}", path.display()))
    }

    /// 按 -v 次数提升级别: 0 保持配置, 1=debug, 2+=trace
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        match verbosity {
            0 => {}
            1 => self.level = "debug".to_string(),
            _ => self.level = "trace".to_string(),
        }
        self
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level))
}

/// 初始化全局日志, 只能成功调用一次
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file_layer = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("创建日志目录失败, path={directory}"))?;
            let appender = tracing_appender::rolling::RollingFileAppender::builder()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .build(directory)
                .context("创建日志文件失败")?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            LOG_GUARD.set(guard).ok();
            Some(
                fmt::Layer::default()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .event_format(LineFormat { ansi: false })
                    .with_filter(build_filter(&config.level)),
            )
        }
        None => None,
    };

    let console_layer = config.console.then(|| {
        fmt::Layer::default()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .event_format(LineFormat { ansi: true })
            .with_filter(build_filter(&config.level))
    });

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("日志系统已初始化")?;
    Ok(())
}

/// 单行事件格式: `[月-日 时:分:秒.毫秒] 级别 target > 消息`
///
/// 控制台输出带颜色和 target, 文件输出两者都不带.
struct LineFormat {
    ansi: bool,
}

impl LineFormat {
    fn level_color(level: tracing::Level) -> &'static str {
        match level {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            _ => "\x1b[34m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = meta.level().to_string();
        write!(writer, "[{}] ", Local::now().format("%m-%d %H:%M:%S%.3f"))?;
        if self.ansi {
            let color = Self::level_color(*meta.level());
            write!(writer, "{color}{level:5}\x1b[0m {} > ", meta.target())?;
        } else {
            write!(writer, "{level:5} > ")?;
        }
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
