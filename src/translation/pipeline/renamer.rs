//! 实体重命名器
//!
//! 对单个频道或角色执行：排除检查 → 语言检测 → 缓存翻译 → 远程重命名 → 节流。
//! 所有单实体错误都在这里被转换为 `Failed` 结果，不会向上传播。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use super::outcome::{RenameOutcome, SkipReason};
use super::pacer::Pacer;
use crate::platform::{EntityKind, RenameableEntity};
use crate::translation::config::constants;
use crate::translation::core::TranslationBackend;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::storage::TranslationCache;

/// 单实体重命名器
pub struct EntityRenamer {
    backend: Arc<dyn TranslationBackend>,
    cache: Arc<TranslationCache>,
    pacer: Arc<Pacer>,
    call_timeout: Duration,
}

impl EntityRenamer {
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        cache: Arc<TranslationCache>,
        pacer: Arc<Pacer>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            cache,
            pacer,
            call_timeout,
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// 处理一个实体
    ///
    /// 翻译时总是以检测到的语言作为源语言。
    /// `dry_run` 为 true 时计算译文但不修改远程名称。
    pub async fn process(
        &self,
        entity: &dyn RenameableEntity,
        target_lang: &str,
        dry_run: bool,
    ) -> RenameOutcome {
        let id = entity.id();
        let kind = entity.kind();
        let original = entity.name().to_string();

        if kind == EntityKind::Channel && entity.is_private() {
            return RenameOutcome::skipped(id, kind, original, None, SkipReason::Private);
        }
        if is_reserved_role(entity) {
            return RenameOutcome::skipped(id, kind, original, None, SkipReason::Excluded);
        }

        let detected = match self
            .bounded(self.backend.detect_language(&original))
            .await
            .map_err(TranslationError::into_detection)
        {
            Ok(language) => language,
            Err(e) => {
                helpers::log_error(&e, &original);
                return RenameOutcome::failed(id, kind, original, None, e);
            }
        };

        if same_language(&detected, target_lang) {
            tracing::debug!("{} {} 已经是目标语言 {}", kind, original, target_lang);
            return RenameOutcome::skipped(
                id,
                kind,
                original,
                None,
                SkipReason::AlreadyInTargetLanguage,
            );
        }

        let translated = match self
            .cache
            .lookup_or_translate(&original, &detected, target_lang, |text, source, target| {
                self.bounded(self.backend.translate(text, source, target))
            })
            .await
            .map_err(TranslationError::into_translation)
        {
            Ok(text) if text.trim().is_empty() => {
                let e = TranslationError::TranslationServiceError("后端返回了空译文".to_string());
                helpers::log_error(&e, &original);
                return RenameOutcome::failed(id, kind, original, None, e);
            }
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                helpers::log_error(&e, &original);
                return RenameOutcome::failed(id, kind, original, None, e);
            }
        };

        if translated == original {
            return RenameOutcome::skipped(
                id,
                kind,
                original,
                Some(translated),
                SkipReason::Unchanged,
            );
        }

        if dry_run {
            return RenameOutcome::skipped(
                id,
                kind,
                original,
                Some(translated),
                SkipReason::PreviewOnly,
            );
        }

        let result = self
            .bounded(entity.rename(&translated))
            .await
            .map_err(TranslationError::into_rename);
        self.pacer.wait().await;

        match result {
            Ok(()) => {
                tracing::info!("{} {} 已翻译为 {}", kind, original, translated);
                RenameOutcome::renamed(id, kind, original, translated)
            }
            Err(e) => {
                helpers::log_error(&e, &original);
                RenameOutcome::failed(id, kind, original, Some(translated), e)
            }
        }
    }

    /// 为远程调用加上超时，超时按调用所属的错误种类上报
    async fn bounded<T>(
        &self,
        call: impl Future<Output = TranslationResult<T>>,
    ) -> TranslationResult<T> {
        match timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(elapsed) => Err(elapsed.into()),
        }
    }
}

/// 服务器默认角色永远不会被重命名
pub fn is_reserved_role(entity: &dyn RenameableEntity) -> bool {
    entity.kind() == EntityKind::Role
        && (entity.is_default_role() || entity.name() == constants::EVERYONE_ROLE_NAME)
}

/// 比较语言代码，忽略大小写；只有一方带地区时按主语言比较
fn same_language(detected: &str, target: &str) -> bool {
    let detected = detected.to_lowercase();
    let target = target.to_lowercase();
    if detected == target {
        return true;
    }
    match (detected.split_once('-'), target.split_once('-')) {
        (Some(_), Some(_)) => false,
        (Some((primary, _)), None) => primary == target,
        (None, Some((primary, _))) => primary == detected,
        (None, None) => false,
    }
}
