//! 批次结果类型
//!
//! 每个实体在一次批次运行中产生一个 [`RenameOutcome`]，
//! 批次结束时汇总为 [`BatchResult`] 返回给调用方。

use std::fmt;

use crate::platform::EntityKind;
use crate::translation::error::{AbortReason, ErrorStats, TranslationError};

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// 私有频道
    Private,
    /// 服务器默认角色
    Excluded,
    /// 名称已经是目标语言
    AlreadyInTargetLanguage,
    /// 译文与原名相同
    Unchanged,
    /// 预览模式，只计算不修改
    PreviewOnly,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Private => "private",
            SkipReason::Excluded => "excluded",
            SkipReason::AlreadyInTargetLanguage => "already in target language",
            SkipReason::Unchanged => "unchanged",
            SkipReason::PreviewOnly => "preview only",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个实体的处理状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    Renamed,
    Skipped(SkipReason),
    Failed(TranslationError),
}

/// 单个实体的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub entity_id: u64,
    pub kind: EntityKind,
    pub original_name: String,
    pub translated_name: Option<String>,
    pub status: RenameStatus,
}

impl RenameOutcome {
    pub fn renamed(entity_id: u64, kind: EntityKind, original: String, translated: String) -> Self {
        Self {
            entity_id,
            kind,
            original_name: original,
            translated_name: Some(translated),
            status: RenameStatus::Renamed,
        }
    }

    pub fn skipped(
        entity_id: u64,
        kind: EntityKind,
        original: String,
        translated: Option<String>,
        reason: SkipReason,
    ) -> Self {
        Self {
            entity_id,
            kind,
            original_name: original,
            translated_name: translated,
            status: RenameStatus::Skipped(reason),
        }
    }

    pub fn failed(
        entity_id: u64,
        kind: EntityKind,
        original: String,
        translated: Option<String>,
        error: TranslationError,
    ) -> Self {
        Self {
            entity_id,
            kind,
            original_name: original,
            translated_name: translated,
            status: RenameStatus::Failed(error),
        }
    }

    pub fn is_renamed(&self) -> bool {
        matches!(self.status, RenameStatus::Renamed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, RenameStatus::Failed(_))
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self.status {
            RenameStatus::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TranslationError> {
        match &self.status {
            RenameStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// 批次终止状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Completed,
    Aborted(AbortReason),
}

/// 批次汇总计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub previewed: usize,
    pub failed: usize,
}

/// 一次批次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub source_lang: String,
    pub target_lang: String,
    pub dry_run: bool,
    /// 按处理顺序排列：先频道，后角色
    pub outcomes: Vec<RenameOutcome>,
    pub status: BatchStatus,
}

impl BatchResult {
    pub fn completed(
        source_lang: &str,
        target_lang: &str,
        dry_run: bool,
        outcomes: Vec<RenameOutcome>,
    ) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            dry_run,
            outcomes,
            status: BatchStatus::Completed,
        }
    }

    /// 前置条件失败，没有处理任何实体
    pub fn aborted(source_lang: &str, target_lang: &str, dry_run: bool, reason: AbortReason) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            dry_run,
            outcomes: Vec::new(),
            status: BatchStatus::Aborted(reason),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.status, BatchStatus::Aborted(_))
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            match &outcome.status {
                RenameStatus::Renamed => summary.renamed += 1,
                RenameStatus::Skipped(SkipReason::PreviewOnly) => summary.previewed += 1,
                RenameStatus::Skipped(_) => summary.skipped += 1,
                RenameStatus::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn failures(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes.iter().filter(move |outcome| outcome.kind == kind)
    }

    /// 按类别统计本批次的失败
    pub fn error_stats(&self) -> ErrorStats {
        let mut stats = ErrorStats::default();
        for error in self.outcomes.iter().filter_map(RenameOutcome::error) {
            stats.record_error(error);
        }
        stats
    }
}
