//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型，调用方可以区分网络故障、非成功状态码和响应格式错误

use thiserror::Error;

use crate::env::EnvError;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 翻译服务返回非成功状态码
    #[error("翻译服务错误 (HTTP {status}: {reason})")]
    HttpStatus { status: u16, reason: String },

    /// 翻译服务响应格式不符合预期
    #[error("响应格式错误: {0}")]
    MalformedResponse(String),

    /// 输出流写入错误
    #[error("输出写入错误: {0}")]
    IoError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 处理错误
    #[error("处理错误: {0}")]
    ProcessingError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            // 5xx 和 429 视为暂时性故障
            TranslationError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            TranslationError::ConfigError(_) => false,
            TranslationError::MalformedResponse(_) => false,
            TranslationError::IoError(_) => false,
            TranslationError::SerializationError(_) => false,
            TranslationError::ProcessingError(_) => false,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::HttpStatus { .. } => ErrorCategory::Service,
            TranslationError::MalformedResponse(_) => ErrorCategory::Parsing,
            TranslationError::IoError(_) => ErrorCategory::Output,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::ProcessingError(_) => ErrorCategory::Processing,
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Service,
    Parsing,
    Output,
    Serialization,
    Processing,
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::MalformedResponse(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        TranslationError::NetworkError(error.to_string())
    }
}

impl From<EnvError> for TranslationError {
    fn from(error: EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;
