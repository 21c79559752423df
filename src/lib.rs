//! # Guild Translator
//!
//! 一个聊天机器人库，把服务器中所有频道和角色的名称翻译成同一种目标语言。
//!
//! ## 模块组织
//!
//! - `translation` - 批次翻译管道、翻译后端、缓存和配置
//! - `platform` - 聊天平台抽象（以及 Discord 适配器，可选）
//! - `bot` - 聊天命令解析、报告格式化和事件处理
//! - `env` - 类型化的环境变量
//! - `logging` - 日志初始化

pub mod bot;
pub mod env;
pub mod logging;
pub mod platform;
pub mod translation;

pub use translation::{
    BatchResult, TranslationConfig, TranslationError, TranslationResult, TranslationService,
};

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
