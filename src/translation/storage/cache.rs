//! 翻译缓存模块
//!
//! 进程生命周期内的翻译结果缓存。缓存是纯函数记忆：同一个键在进程内
//! 始终映射到同一个值，不做过期也不做驱逐（频道和角色名称的词汇量很小）。
//!
//! 缓存键由目标语言和原文组成，同一个缓存实例可以安全地服务于
//! 不同目标语言的批次。

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::translation::error::TranslationResult;

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub original_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub created_at: Instant,
    pub access_count: u64,
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_entries: usize,
}

/// 翻译缓存
///
/// 批次内按顺序访问，锁只在查询和写入时短暂持有，不会跨越 `.await`。
pub struct TranslationCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: RwLock<CacheStats>,
    enabled: bool,
}

// ============================================================================
// 实现
// ============================================================================

impl CacheEntry {
    /// 创建新的缓存条目
    pub fn new(
        original_text: String,
        translated_text: String,
        source_lang: String,
        target_lang: String,
    ) -> Self {
        Self {
            original_text,
            translated_text,
            source_lang,
            target_lang,
            created_at: Instant::now(),
            access_count: 0,
        }
    }

    /// 生成缓存键
    pub fn cache_key(&self) -> String {
        generate_cache_key(&self.original_text, &self.target_lang)
    }
}

impl TranslationCache {
    /// 创建新的翻译缓存
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// 创建缓存，`enabled` 为 false 时每次查询都直接调用翻译函数
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
            enabled,
        }
    }

    /// 查询缓存，未命中时调用 `translate_fn` 并记住结果
    ///
    /// 翻译失败不会写入缓存，下一次查询会重新调用后端。
    pub async fn lookup_or_translate<'a, F, Fut>(
        &self,
        text: &'a str,
        source_lang: &'a str,
        target_lang: &'a str,
        translate_fn: F,
    ) -> TranslationResult<String>
    where
        F: FnOnce(&'a str, &'a str, &'a str) -> Fut,
        Fut: Future<Output = TranslationResult<String>>,
    {
        if !self.enabled {
            return translate_fn(text, source_lang, target_lang).await;
        }

        if let Some(translated) = self.get(text, target_lang) {
            tracing::debug!("缓存命中: {} -> {}", text, translated);
            return Ok(translated);
        }

        let translated = translate_fn(text, source_lang, target_lang).await?;
        self.insert(CacheEntry::new(
            text.to_string(),
            translated.clone(),
            source_lang.to_string(),
            target_lang.to_string(),
        ));
        Ok(translated)
    }

    /// 获取缓存条目
    pub fn get(&self, text: &str, target_lang: &str) -> Option<String> {
        let key = generate_cache_key(text, target_lang);
        let mut stats = self.write_stats();
        stats.total_requests += 1;

        let mut entries = self.write_entries();
        match entries.get_mut(&key) {
            Some(entry) => {
                entry.access_count += 1;
                stats.cache_hits += 1;
                Some(entry.translated_text.clone())
            }
            None => {
                stats.cache_misses += 1;
                None
            }
        }
    }

    /// 插入缓存条目
    ///
    /// 已存在的键保持原值不变，保证同一个键始终得到同一个翻译。
    pub fn insert(&self, entry: CacheEntry) {
        let total_entries = {
            let mut entries = self.write_entries();
            entries.entry(entry.cache_key()).or_insert(entry);
            entries.len()
        };

        self.write_stats().total_entries = total_entries;
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> CacheStats {
        let mut result = self.stats.read().unwrap_or_else(PoisonError::into_inner).clone();
        result.total_entries = self.size();
        result
    }

    /// 获取缓存大小
    pub fn size(&self) -> usize {
        self.read_entries().len()
    }

    /// 检查是否包含指定键
    pub fn contains(&self, text: &str, target_lang: &str) -> bool {
        self.read_entries()
            .contains_key(&generate_cache_key(text, target_lang))
    }

    /// 缓存是否启用
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_stats(&self) -> RwLockWriteGuard<'_, CacheStats> {
        self.stats.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 实用函数
// ============================================================================

/// 生成缓存键
pub fn generate_cache_key(text: &str, target_lang: &str) -> String {
    format!("{}:{}", target_lang, text)
}

impl CacheStats {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::error::TranslationError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = TranslationCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let translated = cache
                .lookup_or_translate("général", "fr", "en", |_, _, _| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("general".to_string())
                })
                .await
                .unwrap();
            assert_eq!(translated, "general");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.get_stats();
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_key_includes_target_language() {
        let cache = TranslationCache::new();

        let en = cache
            .lookup_or_translate("bonjour", "fr", "en", |_, _, _| async {
                Ok("hello".to_string())
            })
            .await
            .unwrap();
        let de = cache
            .lookup_or_translate("bonjour", "fr", "de", |_, _, _| async {
                Ok("hallo".to_string())
            })
            .await
            .unwrap();

        assert_eq!(en, "hello");
        assert_eq!(de, "hallo");
        assert_eq!(cache.size(), 2);
    }

    #[tokio::test]
    async fn test_source_hint_does_not_split_entries() {
        let cache = TranslationCache::new();
        cache
            .lookup_or_translate("annonces", "fr", "en", |_, _, _| async {
                Ok("announcements".to_string())
            })
            .await
            .unwrap();

        let translated = cache
            .lookup_or_translate("annonces", "auto", "en", |_, _, _| async {
                Ok("ads".to_string())
            })
            .await
            .unwrap();
        assert_eq!(translated, "announcements");
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = TranslationCache::new();

        let result = cache
            .lookup_or_translate("règles", "fr", "en", |_, _, _| async {
                Err(TranslationError::RateLimitExceeded)
            })
            .await;
        assert_eq!(result, Err(TranslationError::RateLimitExceeded));
        assert!(!cache.contains("règles", "en"));

        let translated = cache
            .lookup_or_translate("règles", "fr", "en", |_, _, _| async {
                Ok("rules".to_string())
            })
            .await
            .unwrap();
        assert_eq!(translated, "rules");
    }

    #[tokio::test]
    async fn test_disabled_cache_always_translates() {
        let cache = TranslationCache::with_enabled(false);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .lookup_or_translate("salon", "fr", "en", |_, _, _| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("lounge".to_string())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_insert_keeps_first_value() {
        let cache = TranslationCache::new();
        cache.insert(CacheEntry::new(
            "aide".to_string(),
            "help".to_string(),
            "fr".to_string(),
            "en".to_string(),
        ));
        cache.insert(CacheEntry::new(
            "aide".to_string(),
            "assistance".to_string(),
            "fr".to_string(),
            "en".to_string(),
        ));

        assert_eq!(cache.get("aide", "en"), Some("help".to_string()));
        assert_eq!(cache.get_stats().hit_rate(), 1.0);
    }
}
