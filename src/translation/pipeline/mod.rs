//! 批次重命名管道
//!
//! - **renamer**: 单个实体的检测、翻译和重命名
//! - **orchestrator**: 服务器级别的批次编排
//! - **pacer**: 写操作节流
//! - **outcome**: 批次结果类型

pub mod orchestrator;
pub mod outcome;
pub mod pacer;
pub mod renamer;

pub use orchestrator::BatchTranslationOrchestrator;
pub use outcome::{BatchResult, BatchStatus, BatchSummary, RenameOutcome, RenameStatus, SkipReason};
pub use pacer::Pacer;
pub use renamer::EntityRenamer;
