//! 批次管道集成测试
//!
//! 使用模拟服务器和模拟后端测试完整的批次流程。节流使用暂停的 tokio 时钟。

use std::time::Duration;

use tokio::time::Instant;

use guild_translator::platform::EntityKind;
use guild_translator::translation::{
    AbortReason, BatchStatus, ErrorCategory, RenameStatus, SkipReason,
};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{french_guild, EntitySpec, MockBackend, MockServer, TestEnvironment};

/// 两个法语频道被翻译成英语，每次重命名之后各等待一次
#[tokio::test(start_paused = true)]
async fn test_french_channels_are_renamed_with_pacing() {
    let backend = MockBackend::new()
        .with_name("général", "fr", "en", "general")
        .with_name("annonces", "fr", "en", "announcements");
    let server = MockServer::new(
        vec![EntitySpec::channel(10, "général"), EntitySpec::channel(11, "annonces")],
        vec![],
    );
    let env = TestEnvironment::new(backend);

    let start = Instant::now();
    let result = env.translate(&server, "auto", "en").await;

    assert_eq!(result.status, BatchStatus::Completed);
    assert_eq!(server.channel_names(), vec!["general", "announcements"]);
    assert_eq!(result.summary().renamed, 2);
    assert_eq!(env.service.pacer().wait_count(), 2);

    let calls = server.rename_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].at - calls[0].at >= Duration::from_secs(1));
    assert!(start.elapsed() >= Duration::from_secs(2));
}

/// 第二次运行不会再修改任何名称
#[tokio::test(start_paused = true)]
async fn test_second_run_is_idempotent() {
    let (backend, server) = french_guild();
    let env = TestEnvironment::new(backend);

    let first = env.translate(&server, "auto", "en").await;
    assert_eq!(first.summary().renamed, 3);
    let names_after_first = (server.channel_names(), server.role_names());

    let second = env.translate(&server, "auto", "en").await;
    assert_eq!(second.summary().renamed, 0);
    assert!(second
        .outcomes
        .iter()
        .all(|o| o.skip_reason() == Some(SkipReason::AlreadyInTargetLanguage)));
    assert_eq!((server.channel_names(), server.role_names()), names_after_first);
    assert_eq!(server.rename_calls().len(), 3);
}

/// 每个 (目标语言, 文本) 最多调用一次后端翻译
#[tokio::test(start_paused = true)]
async fn test_translation_is_cached_per_target_language() {
    let backend = MockBackend::new()
        .with_name("général", "fr", "en", "general")
        .with_name("général", "fr", "de", "allgemein");
    let env = TestEnvironment::new(backend);

    let server = MockServer::new(
        vec![EntitySpec::channel(10, "général")],
        vec![EntitySpec::role(20, "général")],
    );
    env.preview(&server, "auto", "en").await;
    assert_eq!(env.backend.translate_count_for("général"), 1);

    // 缓存跨批次、跨服务器共享
    let other = MockServer::new(vec![EntitySpec::channel(30, "général")], vec![]);
    let result = env.translate(&other, "auto", "en").await;
    assert_eq!(env.backend.translate_count_for("général"), 1);
    assert_eq!(other.channel_names(), vec!["general"]);
    assert_eq!(result.summary().renamed, 1);

    // 不同的目标语言是不同的键
    let result = env.preview(&server, "auto", "de").await;
    assert_eq!(env.backend.translate_count_for("général"), 2);
    assert_eq!(result.outcomes[0].translated_name.as_deref(), Some("allgemein"));

    let stats = env.service.cache_stats();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.cache_hits, 3);
}

/// 预览模式计算译文但不修改名称
#[tokio::test(start_paused = true)]
async fn test_preview_leaves_names_untouched() {
    let (backend, server) = french_guild();
    let env = TestEnvironment::new(backend);
    let before = (server.channel_names(), server.role_names());

    let result = env.preview(&server, "auto", "en").await;

    assert!(result.dry_run);
    assert_eq!((server.channel_names(), server.role_names()), before);
    assert!(server.rename_calls().is_empty());
    assert_eq!(env.service.pacer().wait_count(), 0);

    let planned: Vec<_> = result
        .outcomes
        .iter()
        .map(|o| (o.original_name.as_str(), o.translated_name.as_deref()))
        .collect();
    assert_eq!(
        planned,
        vec![
            ("général", Some("general")),
            ("annonces", Some("announcements")),
            ("modérateur", Some("moderator")),
        ]
    );
    assert_eq!(result.summary().previewed, 3);
}

/// 默认角色不出现在结果中，私有频道被跳过
#[tokio::test(start_paused = true)]
async fn test_default_role_and_private_channels_are_excluded() {
    let backend = MockBackend::new()
        .with_name("général", "fr", "en", "general")
        .with_name("équipe", "fr", "en", "staff");
    let server = MockServer::new(
        vec![
            EntitySpec::channel(10, "général"),
            EntitySpec::channel(11, "équipe").private(),
        ],
        vec![EntitySpec::everyone(1)],
    );
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    assert!(result.outcomes.iter().all(|o| o.original_name != "@everyone"));
    assert_eq!(result.of_kind(EntityKind::Role).count(), 0);
    assert_eq!(result.outcomes[1].skip_reason(), Some(SkipReason::Private));
    assert_eq!(server.channel_names(), vec!["general", "équipe"]);
    assert_eq!(server.role_names(), vec!["@everyone"]);

    // 被排除的实体不会调用后端
    assert_eq!(env.backend.detect_count(), 1);
    assert_eq!(env.backend.translate_count_for("équipe"), 0);
}

/// 一个实体失败后，后面的实体照常处理
#[tokio::test(start_paused = true)]
async fn test_failure_does_not_stop_the_batch() {
    let backend = MockBackend::new()
        .with_name("un", "fr", "en", "one")
        .with_name("deux", "fr", "en", "two")
        .with_name("trois", "fr", "en", "three")
        .with_name("quatre", "fr", "en", "four");
    let server = MockServer::new(
        vec![
            EntitySpec::channel(1, "un"),
            EntitySpec::channel(2, "deux"),
            EntitySpec::channel(3, "trois").failing_rename(),
            EntitySpec::channel(4, "quatre"),
        ],
        vec![],
    );
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    assert_eq!(server.channel_names(), vec!["one", "two", "trois", "four"]);
    let failed = &result.outcomes[2];
    assert_eq!(failed.error().map(|e| e.category()), Some(ErrorCategory::Rename));
    assert_eq!(failed.translated_name.as_deref(), Some("three"));
    assert!(result.outcomes[3].is_renamed());

    let summary = result.summary();
    assert_eq!((summary.renamed, summary.failed), (3, 1));

    // 失败的重命名同样消耗一次等待
    assert_eq!(env.service.pacer().wait_count(), 4);
}

/// 缺少权限时在列举之前中止
#[tokio::test(start_paused = true)]
async fn test_missing_permission_aborts_before_listing() {
    let (backend, server) = french_guild();
    let server = server.without_permission();
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    assert_eq!(
        result.status,
        BatchStatus::Aborted(AbortReason::PermissionPrecondition)
    );
    assert!(result.outcomes.is_empty());
    assert_eq!(server.listing_calls(), 0);
    assert_eq!(env.backend.detect_count(), 0);
    assert_eq!(env.backend.translate_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_listing_failure_aborts_without_renames() {
    let (backend, server) = french_guild();
    let server = server.with_failing_role_listing();
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    assert!(matches!(
        result.status,
        BatchStatus::Aborted(AbortReason::ListingFailed(_))
    ));
    assert!(server.rename_calls().is_empty());
    assert_eq!(server.channel_names(), vec!["général", "annonces"]);
}

#[tokio::test(start_paused = true)]
async fn test_permission_check_failure_aborts() {
    let (backend, server) = french_guild();
    let server = server.with_failing_permission_check();
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    assert!(matches!(
        result.status,
        BatchStatus::Aborted(AbortReason::PermissionCheckFailed(_))
    ));
    assert_eq!(server.listing_calls(), 0);
}

/// 先处理频道，后处理角色
#[tokio::test(start_paused = true)]
async fn test_channels_are_processed_before_roles() {
    let (backend, server) = french_guild();
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    let kinds: Vec<_> = result.outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![EntityKind::Channel, EntityKind::Channel, EntityKind::Role]
    );
    let renamed: Vec<_> = server.rename_calls().iter().map(|c| c.entity_id).collect();
    assert_eq!(renamed, vec![10, 11, 20]);
}

/// 显式的源语言只用于报告，后端总是收到检测到的语言
#[tokio::test(start_paused = true)]
async fn test_explicit_source_language_does_not_override_detection() {
    let backend =
        MockBackend::new().with_name("Ankündigungen", "de", "en", "announcements");
    let server = MockServer::new(vec![EntitySpec::channel(10, "Ankündigungen")], vec![]);
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "fr", "en").await;

    let calls = env.backend.translate_calls();
    assert_eq!(
        calls,
        vec![("Ankündigungen".to_string(), "de".to_string(), "en".to_string())]
    );
    assert_eq!(result.source_lang, "fr");
    assert_eq!(server.channel_names(), vec!["announcements"]);
}

#[tokio::test(start_paused = true)]
async fn test_detected_language_is_used_for_auto() {
    let backend = MockBackend::new().with_name("anuncios", "es", "en", "announcements");
    let server = MockServer::new(vec![EntitySpec::channel(10, "anuncios")], vec![]);
    let env = TestEnvironment::new(backend);

    env.preview(&server, "auto", "en").await;

    assert_eq!(env.backend.translate_calls()[0].1, "es");
}

/// 译文与原名相同时不调用重命名
#[tokio::test(start_paused = true)]
async fn test_unchanged_translation_is_skipped() {
    let backend = MockBackend::new().with_language("Minecraft", "de");
    let server = MockServer::new(vec![EntitySpec::channel(10, "Minecraft")], vec![]);
    let env = TestEnvironment::new(backend);

    let result = env.translate(&server, "auto", "en").await;

    assert_eq!(
        result.outcomes[0].status,
        RenameStatus::Skipped(SkipReason::Unchanged)
    );
    assert!(server.rename_calls().is_empty());
    assert_eq!(env.service.pacer().wait_count(), 0);
}

/// 服务统计记录每次批次
#[tokio::test(start_paused = true)]
async fn test_service_stats() {
    let (backend, server) = french_guild();
    let env = TestEnvironment::new(backend);

    env.translate(&server, "auto", "en").await;
    env.translate(&server.without_permission(), "auto", "en").await;

    let stats = env.service.get_stats().snapshot();
    assert_eq!(stats.batches_run, 2);
    assert_eq!(stats.batches_aborted, 1);
    assert_eq!(stats.entities_renamed, 3);
    assert_eq!(stats.entities_failed, 0);
}
