//! 翻译模块
//!
//! 把服务器中频道和角色的名称批量翻译成目标语言：
//! - **core**: 翻译后端客户端和统一服务
//! - **pipeline**: 批次编排、单实体重命名、节流
//! - **storage**: 进程级翻译缓存
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use guild_translator::translation::{ConfigManager, TranslationService};
//!
//! # async fn example(server: &dyn guild_translator::platform::ServerHandle)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigManager::new()?.into_config();
//! let service = TranslationService::new(config)?;
//! let result = service.run(server, "auto", "en", false).await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 配置管理模块 - 语言、后端地址、节流间隔等
pub mod config;

/// 核心模块 - 翻译后端和翻译服务
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 批次管道模块 - 编排、重命名与节流
pub mod pipeline;

/// 存储模块 - 翻译缓存
pub mod storage;

// ============================================================================
// 核心API导出
// ============================================================================

pub use self::core::{LibreTranslateClient, ServiceStats, TranslationBackend, TranslationService};

pub use config::{constants, ConfigManager, TranslationConfig};

pub use error::{
    AbortReason, ErrorCategory, ErrorSeverity, TranslationError, TranslationResult,
};

pub use pipeline::{
    BatchResult, BatchStatus, BatchSummary, BatchTranslationOrchestrator, EntityRenamer, Pacer,
    RenameOutcome, RenameStatus, SkipReason,
};

pub use storage::{CacheEntry, CacheStats, TranslationCache};
