//! 批次编排器
//!
//! 一次批次：权限检查 → 列举频道和角色 → 先频道后角色顺序处理。
//! 只有前置条件失败会中止批次；单实体失败记录在结果中，批次继续。

use std::sync::Arc;

use super::outcome::{BatchResult, RenameOutcome};
use super::renamer::{is_reserved_role, EntityRenamer};
use crate::platform::ServerHandle;
use crate::translation::error::{AbortReason, TranslationResult};

/// 批次翻译编排器
pub struct BatchTranslationOrchestrator {
    renamer: Arc<EntityRenamer>,
}

impl BatchTranslationOrchestrator {
    pub fn new(renamer: Arc<EntityRenamer>) -> Self {
        Self { renamer }
    }

    pub fn renamer(&self) -> &EntityRenamer {
        &self.renamer
    }

    /// 翻译服务器中所有频道和角色的名称
    pub async fn run(
        &self,
        server: &dyn ServerHandle,
        source_hint: &str,
        target_lang: &str,
        dry_run: bool,
    ) -> BatchResult {
        tracing::info!(
            "开始批次翻译: 服务器 {}, {} -> {}, 预览模式: {}",
            server.id(),
            source_hint,
            target_lang,
            dry_run
        );

        match server.has_manage_channels_and_roles().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("服务器 {} 中缺少管理频道和角色的权限", server.id());
                return BatchResult::aborted(
                    source_hint,
                    target_lang,
                    dry_run,
                    AbortReason::PermissionPrecondition,
                );
            }
            Err(e) => {
                tracing::error!("服务器 {} 权限检查失败: {}", server.id(), e);
                return BatchResult::aborted(
                    source_hint,
                    target_lang,
                    dry_run,
                    AbortReason::PermissionCheckFailed(e.to_string()),
                );
            }
        }

        // 两份列表都取到之后才开始处理，列举失败时不会留下半途的重命名
        let listing: TranslationResult<_> = async {
            let channels = server.list_channels().await?;
            let roles = server.list_roles().await?;
            Ok((channels, roles))
        }
        .await;
        let (channels, roles) = match listing {
            Ok(lists) => lists,
            Err(e) => {
                tracing::error!("服务器 {} 列举实体失败: {}", server.id(), e);
                return BatchResult::aborted(
                    source_hint,
                    target_lang,
                    dry_run,
                    AbortReason::ListingFailed(e.to_string()),
                );
            }
        };

        let roles: Vec<_> = roles
            .into_iter()
            .filter(|role| !is_reserved_role(role.as_ref()))
            .collect();
        tracing::debug!("待处理: {} 个频道, {} 个角色", channels.len(), roles.len());

        let mut outcomes: Vec<RenameOutcome> = Vec::with_capacity(channels.len() + roles.len());
        for entity in channels.iter().chain(roles.iter()) {
            let outcome = self
                .renamer
                .process(entity.as_ref(), target_lang, dry_run)
                .await;
            outcomes.push(outcome);
        }

        let result = BatchResult::completed(source_hint, target_lang, dry_run, outcomes);
        let summary = result.summary();
        let cache = self.renamer.cache();
        let cache_stats = cache.get_stats();
        tracing::info!(
            "批次完成: 共 {} 个, 已重命名 {}, 预览 {}, 跳过 {}, 失败 {}",
            summary.total,
            summary.renamed,
            summary.previewed,
            summary.skipped,
            summary.failed
        );
        if cache.is_enabled() {
            tracing::debug!(
                "缓存: {} 条, 命中 {}, 未命中 {}, 命中率 {:.1}%",
                cache_stats.total_entries,
                cache_stats.cache_hits,
                cache_stats.cache_misses,
                cache_stats.hit_rate() * 100.0
            );
        }

        result
    }
}
