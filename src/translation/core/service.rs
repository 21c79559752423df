//! 翻译服务
//!
//! [`TranslationService`] 是批次翻译的主要入口点。它持有翻译后端、
//! 进程级缓存和节流器，并在多个服务器、多次批次之间共享它们。
//!
//! ```rust,no_run
//! use guild_translator::translation::{TranslationConfig, TranslationService};
//!
//! # async fn example(server: &dyn guild_translator::platform::ServerHandle)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::new(TranslationConfig::default())?;
//! let result = service.run(server, "auto", "en", true).await;
//! println!("预览了 {} 个实体", result.summary().previewed);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::client::{LibreTranslateClient, TranslationBackend};
use crate::platform::ServerHandle;
use crate::translation::config::TranslationConfig;
use crate::translation::error::TranslationResult;
use crate::translation::pipeline::{
    BatchResult, BatchTranslationOrchestrator, EntityRenamer, Pacer,
};
use crate::translation::storage::{CacheStats, TranslationCache};

/// 统一的翻译服务
///
/// 所有字段都可以跨任务共享；同一服务器上的并发批次由调用方排除。
pub struct TranslationService {
    config: TranslationConfig,
    orchestrator: BatchTranslationOrchestrator,
    cache: Arc<TranslationCache>,
    stats: ServiceStats,
}

impl TranslationService {
    /// 使用 LibreTranslate 后端创建服务
    pub fn new(config: TranslationConfig) -> TranslationResult<Self> {
        config.validate()?;
        let backend = Arc::new(LibreTranslateClient::from_config(&config)?);
        tracing::info!("翻译后端: {}", backend.api_url());
        Ok(Self::with_backend(config, backend))
    }

    /// 使用指定的后端创建服务
    pub fn with_backend(config: TranslationConfig, backend: Arc<dyn TranslationBackend>) -> Self {
        let cache = Arc::new(TranslationCache::with_enabled(config.cache_enabled));
        let pacer = Arc::new(Pacer::new(config.rename_interval()));
        let renamer = EntityRenamer::new(
            backend,
            Arc::clone(&cache),
            pacer,
            config.request_timeout(),
        );

        Self {
            config,
            orchestrator: BatchTranslationOrchestrator::new(Arc::new(renamer)),
            cache,
            stats: ServiceStats::default(),
        }
    }

    /// 在一个服务器上运行一次批次
    pub async fn run(
        &self,
        server: &dyn ServerHandle,
        source_hint: &str,
        target_lang: &str,
        dry_run: bool,
    ) -> BatchResult {
        let start_time = Instant::now();
        let result = self
            .orchestrator
            .run(server, source_hint, target_lang, dry_run)
            .await;
        self.stats.record(&result, start_time);
        result
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn pacer(&self) -> &Pacer {
        self.orchestrator.renamer().pacer()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }

    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }
}

/// 服务运行统计
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub batches_run: AtomicUsize,
    pub batches_aborted: AtomicUsize,
    pub entities_renamed: AtomicUsize,
    pub entities_failed: AtomicUsize,
    /// 累计处理时间（毫秒）
    pub processing_time: AtomicU64,
}

impl ServiceStats {
    fn record(&self, result: &BatchResult, start_time: Instant) {
        self.batches_run.fetch_add(1, Ordering::Relaxed);
        if result.is_aborted() {
            self.batches_aborted.fetch_add(1, Ordering::Relaxed);
        }
        let summary = result.summary();
        self.entities_renamed
            .fetch_add(summary.renamed, Ordering::Relaxed);
        self.entities_failed
            .fetch_add(summary.failed, Ordering::Relaxed);
        self.processing_time
            .fetch_add(start_time.elapsed().as_millis() as u64, Ordering::Relaxed);
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            batches_run: self.batches_run.load(Ordering::Relaxed),
            batches_aborted: self.batches_aborted.load(Ordering::Relaxed),
            entities_renamed: self.entities_renamed.load(Ordering::Relaxed),
            entities_failed: self.entities_failed.load(Ordering::Relaxed),
            processing_time_ms: self.processing_time.load(Ordering::Relaxed),
        }
    }
}

/// 统计快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatsSnapshot {
    pub batches_run: usize,
    pub batches_aborted: usize,
    pub entities_renamed: usize,
    pub entities_failed: usize,
    pub processing_time_ms: u64,
}
