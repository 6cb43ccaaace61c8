//! 统一错误类型定义.
//!
//! 所有 Hui crate 共用的错误类型, 支持跨模块传播.
//! 每个错误都能映射为一个稳定的负数状态码 (errno 风格), 供封装层上报.

use thiserror::Error;

/// errno 风格的原生状态码
pub mod code {
    /// ENOENT
    pub const NOT_FOUND: i32 = -2;
    /// EIO
    pub const IO: i32 = -5;
    /// EAGAIN
    pub const AGAIN: i32 = -11;
    /// ENOMEM
    pub const NO_MEMORY: i32 = -12;
    /// EINVAL
    pub const INVALID: i32 = -22;
    /// EPIPE, 流已结束
    pub const EOF: i32 = -32;
    /// ENOSYS
    pub const NOT_SUPPORTED: i32 = -38;
    /// EBADF, 会话状态不允许该操作
    pub const BAD_STATE: i32 = -9;
}

/// Hui 框架统一错误类型
#[derive(Debug, Error)]
pub enum HuiError {
    /// 无效参数 (调用方输入有误)
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 无法解析的编解码器名称
    #[error("未知编解码器: {0}")]
    UnknownCodec(String),

    /// 容器格式不支持该编解码器
    #[error("{format} 格式不支持 {codec} 编解码器")]
    UnsupportedCodecForFormat {
        /// 编解码器名称
        codec: String,
        /// 容器格式名称
        format: String,
    },

    /// 底层 I/O 或容器格式写入失败, 携带原生状态码
    #[error("封装错误 ({code}): {message}")]
    Mux {
        /// 原生状态码
        code: i32,
        /// 底层错误描述
        message: String,
    },

    /// 会话已关闭
    #[error("输出容器已关闭")]
    AlreadyClosed,

    /// 会话尚未开始
    #[error("输出容器尚未开始编码")]
    NotStarted,

    /// 不支持的操作
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 编解码器错误
    #[error("编解码器错误: {0}")]
    Codec(String),

    /// 容器格式错误
    #[error("格式错误: {0}")]
    Format(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 数据不足, 需要更多输入
    #[error("数据不足, 需要更多输入")]
    NeedMoreData,

    /// 已到达流末尾
    #[error("已到达流末尾")]
    Eof,

    /// 未找到指定的编码器实现
    #[error("未找到编解码器: {0}")]
    CodecNotFound(String),

    /// 未找到指定的容器格式
    #[error("未找到容器格式: {0}")]
    FormatNotFound(String),

    /// 无效数据 (时间戳倒退等)
    #[error("无效数据: {0}")]
    InvalidData(String),
}

impl HuiError {
    /// 获取错误对应的原生状态码
    pub fn code(&self) -> i32 {
        match self {
            Self::Mux { code, .. } => *code,
            Self::Io(e) => e.raw_os_error().map_or(code::IO, |errno| -errno),
            Self::InvalidArgument(_) | Self::InvalidData(_) => code::INVALID,
            Self::UnknownCodec(_) | Self::CodecNotFound(_) | Self::FormatNotFound(_) => {
                code::NOT_FOUND
            }
            Self::UnsupportedCodecForFormat { .. } | Self::Unsupported(_) => code::NOT_SUPPORTED,
            Self::AlreadyClosed | Self::NotStarted => code::BAD_STATE,
            Self::NeedMoreData => code::AGAIN,
            Self::Eof => code::EOF,
            Self::Codec(_) | Self::Format(_) => code::INVALID,
        }
    }

    /// 转换为携带原生状态码的封装错误
    ///
    /// 已经是 `Mux` 的错误原样返回.
    pub fn into_mux(self) -> Self {
        match self {
            Self::Mux { .. } => self,
            other => Self::Mux {
                code: other.code(),
                message: other.to_string(),
            },
        }
    }
}

/// Hui 框架统一 Result 类型
pub type HuiResult<T> = Result<T, HuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_os_errno() {
        let err = HuiError::from(std::io::Error::from_raw_os_error(13));
        assert_eq!(err.code(), -13);
    }

    #[test]
    fn test_into_mux_carries_code() {
        let err = HuiError::InvalidData("dts 倒退".into()).into_mux();
        match err {
            HuiError::Mux { code, message } => {
                assert_eq!(code, code::INVALID);
                assert!(message.contains("dts 倒退"));
            }
            other => panic!("期望 Mux 错误, 实际为 {other:?}"),
        }
    }

    #[test]
    fn test_into_mux_is_stable() {
        let err = HuiError::Mux {
            code: -5,
            message: "写入失败".into(),
        };
        assert_eq!(err.into_mux().code(), -5);
    }
}
