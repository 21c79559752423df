//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。单个实体的错误（检测、翻译、重命名）
//! 在重命名器边界被转换为 `Failed` 结果，不会中断整个批次；
//! 批次级别的前置条件失败使用 [`AbortReason`] 表示。

use std::fmt;

use thiserror::Error;

use crate::env::EnvError;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 语言检测失败
    #[error("语言检测失败: {0}")]
    DetectionError(String),

    /// 翻译服务错误
    #[error("翻译服务错误: {0}")]
    TranslationServiceError(String),

    /// 速率限制错误
    #[error("请求速率过快，已达到限制")]
    RateLimitExceeded,

    /// 远程重命名失败
    #[error("重命名失败: {0}")]
    RenameError(String),

    /// 授权错误
    #[error("授权错误: {0}")]
    AuthorizationError(String),

    /// 平台接口错误（列举频道、角色等）
    #[error("平台错误: {0}")]
    PlatformError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::TranslationServiceError(_) => true,
            TranslationError::DetectionError(_) => true,
            TranslationError::PlatformError(_) => true,
            TranslationError::RateLimitExceeded => false, // 需要等待
            TranslationError::RenameError(_) => false,
            TranslationError::AuthorizationError(_) => false,
            TranslationError::ConfigError(_) => false,
            TranslationError::ParseError(_) => false,
            TranslationError::InvalidInput(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::DetectionError(_) => ErrorSeverity::Warning,
            TranslationError::TranslationServiceError(_) => ErrorSeverity::Error,
            TranslationError::RateLimitExceeded => ErrorSeverity::Warning,
            TranslationError::RenameError(_) => ErrorSeverity::Error,
            TranslationError::AuthorizationError(_) => ErrorSeverity::Critical,
            TranslationError::PlatformError(_) => ErrorSeverity::Error,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::ParseError(_) => ErrorSeverity::Error,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::DetectionError(_) => ErrorCategory::Detection,
            TranslationError::TranslationServiceError(_) => ErrorCategory::Translation,
            TranslationError::RateLimitExceeded => ErrorCategory::RateLimit,
            TranslationError::RenameError(_) => ErrorCategory::Rename,
            TranslationError::AuthorizationError(_) => ErrorCategory::Authorization,
            TranslationError::PlatformError(_) => ErrorCategory::Platform,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::ParseError(_) => ErrorCategory::Parsing,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
        }
    }

    /// 面向用户展示的错误种类名称
    pub fn kind_label(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Detection => "detection error",
            ErrorCategory::Translation => "translation error",
            ErrorCategory::RateLimit => "rate limited",
            ErrorCategory::Rename => "rename error",
            ErrorCategory::Authorization => "authorization error",
            ErrorCategory::Platform => "platform error",
            ErrorCategory::Configuration => "configuration error",
            ErrorCategory::Network => "network error",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Parsing => "malformed response",
            ErrorCategory::Input => "invalid input",
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            TranslationError::DetectionError(ref mut msg)
            | TranslationError::TranslationServiceError(ref mut msg)
            | TranslationError::RenameError(ref mut msg)
            | TranslationError::AuthorizationError(ref mut msg)
            | TranslationError::PlatformError(ref mut msg)
            | TranslationError::ConfigError(ref mut msg)
            | TranslationError::NetworkError(ref mut msg)
            | TranslationError::TimeoutError(ref mut msg)
            | TranslationError::ParseError(ref mut msg)
            | TranslationError::InvalidInput(ref mut msg) => {
                *msg = format!("{} (上下文: {})", msg, context)
            }
            TranslationError::RateLimitExceeded => {}
        }

        self
    }

    /// 将后端错误归入语言检测失败
    ///
    /// 网络、超时、解析错误在检测阶段都视为 `DetectionError`。
    pub fn into_detection(self) -> Self {
        match self {
            TranslationError::DetectionError(_) => self,
            other => TranslationError::DetectionError(other.to_string()),
        }
    }

    /// 将后端错误归入翻译失败
    ///
    /// 速率限制保持原样，其他错误视为翻译服务错误。
    pub fn into_translation(self) -> Self {
        match self {
            TranslationError::TranslationServiceError(_) | TranslationError::RateLimitExceeded => {
                self
            }
            other => TranslationError::TranslationServiceError(other.to_string()),
        }
    }

    /// 将平台错误归入重命名失败
    pub fn into_rename(self) -> Self {
        match self {
            TranslationError::RenameError(_) => self,
            other => TranslationError::RenameError(other.to_string()),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Detection,
    Translation,
    RateLimit,
    Rename,
    Authorization,
    Platform,
    Configuration,
    Network,
    Timeout,
    Parsing,
    Input,
}

/// 批次中止原因
///
/// 只有在批次开始之前的前置条件失败才会中止整个批次。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// 机器人缺少管理频道和角色的权限
    #[error("缺少管理频道和角色的权限")]
    PermissionPrecondition,

    /// 权限检查本身失败
    #[error("权限检查失败: {0}")]
    PermissionCheckFailed(String),

    /// 无法列举频道或角色
    #[error("无法列举服务器实体: {0}")]
    ListingFailed(String),
}

impl AbortReason {
    /// 面向用户展示的中止原因
    pub fn describe(&self) -> String {
        match self {
            AbortReason::PermissionPrecondition => {
                "I don't have the Manage Channels and Manage Roles permissions.".to_string()
            }
            AbortReason::PermissionCheckFailed(msg) => {
                format!("Could not verify my permissions: {}", msg)
            }
            AbortReason::ListingFailed(msg) => {
                format!("Could not list the channels and roles: {}", msg)
            }
        }
    }
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ParseError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(format!("请求超时: {}", error))
        } else if error.is_decode() {
            TranslationError::ParseError(format!("响应解析失败: {}", error))
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<EnvError> for TranslationError {
    fn from(error: EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

#[cfg(feature = "discord")]
impl From<serenity::Error> for TranslationError {
    fn from(error: serenity::Error) -> Self {
        TranslationError::PlatformError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误统计信息
#[derive(Debug, Clone, Default)]
pub struct ErrorStats {
    pub total_errors: usize,
    pub by_category: std::collections::HashMap<ErrorCategory, usize>,
    pub by_severity: std::collections::HashMap<ErrorSeverity, usize>,
    pub retryable_errors: usize,
    pub critical_errors: usize,
}

impl ErrorStats {
    /// 记录错误
    pub fn record_error(&mut self, error: &TranslationError) {
        self.total_errors += 1;

        let category = error.category();
        *self.by_category.entry(category).or_insert(0) += 1;

        let severity = error.severity();
        *self.by_severity.entry(severity).or_insert(0) += 1;

        if error.is_retryable() {
            self.retryable_errors += 1;
        }

        if severity == ErrorSeverity::Critical {
            self.critical_errors += 1;
        }
    }

    /// 某一类别的错误数量
    pub fn count(&self, category: ErrorCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// 获取错误率
    pub fn error_rate(&self, total_operations: usize) -> f64 {
        if total_operations == 0 {
            0.0
        } else {
            self.total_errors as f64 / total_operations as f64
        }
    }
}

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError, entity_name: &str) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("实体 {} 处理信息: {}", entity_name, error),
            ErrorSeverity::Warning => tracing::warn!("实体 {} 处理警告: {}", entity_name, error),
            ErrorSeverity::Error => tracing::error!("实体 {} 处理错误: {}", entity_name, error),
            ErrorSeverity::Critical => {
                tracing::error!("实体 {} 处理严重错误: {}", entity_name, error)
            }
        }
    }
}
