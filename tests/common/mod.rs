// 集成测试公共模块
//
// 提供模拟服务器、模拟实体、模拟翻译后端和测试环境

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use guild_translator::platform::{EntityKind, RenameableEntity, ServerHandle};
use guild_translator::translation::{
    BatchResult, TranslationBackend, TranslationConfig, TranslationError, TranslationResult,
    TranslationService,
};

// ============================================================================
// 模拟翻译后端
// ============================================================================

/// 模拟翻译后端
///
/// 未登记的文本被检测为 `en`，未登记的翻译原样返回。
#[derive(Default)]
pub struct MockBackend {
    languages: HashMap<String, String>,
    translations: HashMap<(String, String), String>,
    failing_detection: HashSet<String>,
    failing_translation: HashSet<String>,
    rate_limited: HashSet<String>,
    delay: Option<Duration>,
    pub detect_calls: AtomicUsize,
    translate_calls: Mutex<Vec<(String, String, String)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个名称的语言和它的目标语言译文
    pub fn with_name(mut self, text: &str, language: &str, target: &str, translated: &str) -> Self {
        self.languages.insert(text.to_string(), language.to_string());
        self.translations
            .insert((text.to_string(), target.to_string()), translated.to_string());
        self
    }

    pub fn with_language(mut self, text: &str, language: &str) -> Self {
        self.languages.insert(text.to_string(), language.to_string());
        self
    }

    pub fn failing_detection(mut self, text: &str) -> Self {
        self.failing_detection.insert(text.to_string());
        self
    }

    pub fn failing_translation(mut self, text: &str) -> Self {
        self.failing_translation.insert(text.to_string());
        self
    }

    pub fn rate_limited(mut self, text: &str) -> Self {
        self.rate_limited.insert(text.to_string());
        self
    }

    /// 每次调用前等待
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn detect_count(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }

    pub fn translate_count(&self) -> usize {
        lock(&self.translate_calls).len()
    }

    /// 某个文本被翻译的次数
    pub fn translate_count_for(&self, text: &str) -> usize {
        lock(&self.translate_calls)
            .iter()
            .filter(|(t, _, _)| t == text)
            .count()
    }

    pub fn translate_calls(&self) -> Vec<(String, String, String)> {
        lock(&self.translate_calls).clone()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn detect_language(&self, text: &str) -> TranslationResult<String> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_detection.contains(text) {
            return Err(TranslationError::NetworkError("connection refused".to_string()));
        }
        Ok(self
            .languages
            .get(text)
            .cloned()
            .unwrap_or_else(|| "en".to_string()))
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        lock(&self.translate_calls).push((
            text.to_string(),
            source_lang.to_string(),
            target_lang.to_string(),
        ));
        if self.rate_limited.contains(text) {
            return Err(TranslationError::RateLimitExceeded);
        }
        if self.failing_translation.contains(text) {
            return Err(TranslationError::TranslationServiceError(
                "HTTP 500".to_string(),
            ));
        }
        Ok(self
            .translations
            .get(&(text.to_string(), target_lang.to_string()))
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

// ============================================================================
// 模拟服务器
// ============================================================================

/// 模拟实体的定义
#[derive(Debug, Clone)]
pub struct EntitySpec {
    pub id: u64,
    pub kind: EntityKind,
    pub name: String,
    pub private: bool,
    pub default_role: bool,
    pub fail_rename: bool,
}

impl EntitySpec {
    pub fn channel(id: u64, name: &str) -> Self {
        Self {
            id,
            kind: EntityKind::Channel,
            name: name.to_string(),
            private: false,
            default_role: false,
            fail_rename: false,
        }
    }

    pub fn role(id: u64, name: &str) -> Self {
        Self {
            kind: EntityKind::Role,
            ..Self::channel(id, name)
        }
    }

    pub fn everyone(id: u64) -> Self {
        Self {
            default_role: true,
            ..Self::role(id, "@everyone")
        }
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn failing_rename(mut self) -> Self {
        self.fail_rename = true;
        self
    }
}

/// 一次远程重命名调用
#[derive(Debug, Clone)]
pub struct RenameCall {
    pub entity_id: u64,
    pub new_name: String,
    pub at: Instant,
    pub succeeded: bool,
}

#[derive(Default)]
struct ServerState {
    channels: Vec<EntitySpec>,
    roles: Vec<EntitySpec>,
    rename_calls: Vec<RenameCall>,
    listing_calls: usize,
}

/// 模拟服务器
pub struct MockServer {
    id: u64,
    state: Arc<Mutex<ServerState>>,
    has_permission: bool,
    permission_check_fails: bool,
    role_listing_fails: bool,
}

impl MockServer {
    pub fn new(channels: Vec<EntitySpec>, roles: Vec<EntitySpec>) -> Self {
        Self {
            id: 1,
            state: Arc::new(Mutex::new(ServerState {
                channels,
                roles,
                ..Default::default()
            })),
            has_permission: true,
            permission_check_fails: false,
            role_listing_fails: false,
        }
    }

    pub fn without_permission(mut self) -> Self {
        self.has_permission = false;
        self
    }

    pub fn with_failing_permission_check(mut self) -> Self {
        self.permission_check_fails = true;
        self
    }

    pub fn with_failing_role_listing(mut self) -> Self {
        self.role_listing_fails = true;
        self
    }

    pub fn channel_names(&self) -> Vec<String> {
        lock(&self.state).channels.iter().map(|e| e.name.clone()).collect()
    }

    pub fn role_names(&self) -> Vec<String> {
        lock(&self.state).roles.iter().map(|e| e.name.clone()).collect()
    }

    pub fn rename_calls(&self) -> Vec<RenameCall> {
        lock(&self.state).rename_calls.clone()
    }

    pub fn listing_calls(&self) -> usize {
        lock(&self.state).listing_calls
    }

    fn entities(&self, kind: EntityKind) -> Vec<Box<dyn RenameableEntity>> {
        let mut state = lock(&self.state);
        state.listing_calls += 1;
        let specs = match kind {
            EntityKind::Channel => state.channels.clone(),
            EntityKind::Role => state.roles.clone(),
        };
        specs
            .into_iter()
            .map(|spec| {
                Box::new(MockEntity {
                    spec,
                    state: Arc::clone(&self.state),
                }) as Box<dyn RenameableEntity>
            })
            .collect()
    }
}

#[async_trait]
impl ServerHandle for MockServer {
    fn id(&self) -> u64 {
        self.id
    }

    async fn has_manage_channels_and_roles(&self) -> TranslationResult<bool> {
        if self.permission_check_fails {
            return Err(TranslationError::PlatformError("HTTP 503".to_string()));
        }
        Ok(self.has_permission)
    }

    async fn list_channels(&self) -> TranslationResult<Vec<Box<dyn RenameableEntity>>> {
        Ok(self.entities(EntityKind::Channel))
    }

    async fn list_roles(&self) -> TranslationResult<Vec<Box<dyn RenameableEntity>>> {
        if self.role_listing_fails {
            return Err(TranslationError::PlatformError("HTTP 500".to_string()));
        }
        Ok(self.entities(EntityKind::Role))
    }
}

/// 列举时的实体快照，重命名写回服务器状态
pub struct MockEntity {
    spec: EntitySpec,
    state: Arc<Mutex<ServerState>>,
}

#[async_trait]
impl RenameableEntity for MockEntity {
    fn id(&self) -> u64 {
        self.spec.id
    }

    fn name(&self) -> &str {
        &self.spec.name
    }

    fn kind(&self) -> EntityKind {
        self.spec.kind
    }

    fn is_private(&self) -> bool {
        self.spec.private
    }

    fn is_default_role(&self) -> bool {
        self.spec.default_role
    }

    async fn rename(&self, new_name: &str) -> TranslationResult<()> {
        let mut state = lock(&self.state);
        state.rename_calls.push(RenameCall {
            entity_id: self.spec.id,
            new_name: new_name.to_string(),
            at: Instant::now(),
            succeeded: !self.spec.fail_rename,
        });
        if self.spec.fail_rename {
            return Err(TranslationError::RenameError("Missing Permissions".to_string()));
        }

        let entities = match self.spec.kind {
            EntityKind::Channel => &mut state.channels,
            EntityKind::Role => &mut state.roles,
        };
        if let Some(entity) = entities.iter_mut().find(|e| e.id == self.spec.id) {
            entity.name = new_name.to_string();
        }
        Ok(())
    }
}

// ============================================================================
// 测试环境
// ============================================================================

/// 测试配置：1 秒节流，10 秒调用超时
pub fn test_config() -> TranslationConfig {
    TranslationConfig {
        rename_interval_ms: 1000,
        request_timeout_secs: 10,
        ..TranslationConfig::default()
    }
}

/// 共享一个模拟后端的翻译服务
pub struct TestEnvironment {
    pub backend: Arc<MockBackend>,
    pub service: TranslationService,
}

impl TestEnvironment {
    pub fn new(backend: MockBackend) -> Self {
        Self::with_config(backend, test_config())
    }

    pub fn with_config(backend: MockBackend, config: TranslationConfig) -> Self {
        let backend = Arc::new(backend);
        let service = TranslationService::with_backend(config, backend.clone());
        Self { backend, service }
    }

    pub async fn translate(&self, server: &MockServer, source: &str, target: &str) -> BatchResult {
        self.service.run(server, source, target, false).await
    }

    pub async fn preview(&self, server: &MockServer, source: &str, target: &str) -> BatchResult {
        self.service.run(server, source, target, true).await
    }
}

/// 法语服务器：两个频道，一个角色，以及默认角色
pub fn french_guild() -> (MockBackend, MockServer) {
    let backend = MockBackend::new()
        .with_name("général", "fr", "en", "general")
        .with_name("annonces", "fr", "en", "announcements")
        .with_name("modérateur", "fr", "en", "moderator");
    let server = MockServer::new(
        vec![EntitySpec::channel(10, "général"), EntitySpec::channel(11, "annonces")],
        vec![EntitySpec::everyone(1), EntitySpec::role(20, "modérateur")],
    );
    (backend, server)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}
