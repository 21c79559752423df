//! 翻译系统核心模块
//!
//! - **client** (`client.rs`): 外部翻译后端接口与 LibreTranslate 实现
//! - **service** (`service.rs`): 统一的批次翻译服务
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── TranslationConfig (config/manager.rs)
//!     ├── TranslationCache (storage/cache.rs)
//!     └── BatchTranslationOrchestrator (pipeline/orchestrator.rs)
//!             └── EntityRenamer (pipeline/renamer.rs)
//!                     ├── TranslationBackend (client.rs)
//!                     └── Pacer (pipeline/pacer.rs)
//! ```

pub mod client;
pub mod service;

pub use client::{LibreTranslateClient, TranslationBackend};
pub use service::{ServiceStats, ServiceStatsSnapshot, TranslationService};
