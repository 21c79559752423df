//! 聊天命令层
//!
//! 解析命令、调用翻译服务并把结果格式化为回复消息。
//! 与具体平台无关的部分在这里，Discord 事件处理在 `handler` 中。

pub mod commands;
pub mod guard;
#[cfg(feature = "discord")]
pub mod handler;
pub mod report;

pub use commands::Command;
pub use guard::{InFlightGuard, InFlightGuilds};

use crate::platform::{RenameableEntity, ServerHandle};
use crate::translation::pipeline::renamer::is_reserved_role;
use crate::translation::{TranslationResult, TranslationService};

/// 执行命令，返回要发送的回复（已按消息长度上限分段）
pub async fn execute(
    service: &TranslationService,
    server: &dyn ServerHandle,
    command: &Command,
) -> Vec<String> {
    let text = match command {
        Command::TranslateServer { source, target } => {
            let result = service.run(server, source, target, false).await;
            report::format_batch_report(&result)
        }
        Command::PreviewTranslation { source, target } => {
            let result = service.run(server, source, target, true).await;
            report::format_batch_report(&result)
        }
        Command::ListChannelsAndRoles => match list_channels_and_roles(server).await {
            Ok((channels, roles)) => report::format_listing(&channels, &roles),
            Err(e) => {
                tracing::error!("服务器 {} 列举实体失败: {}", server.id(), e);
                format!("Could not list the channels and roles: {}", e.kind_label())
            }
        },
    };
    report::split_for_discord(&text)
}

/// 当前的频道和角色名称，不包含默认角色
pub async fn list_channels_and_roles(
    server: &dyn ServerHandle,
) -> TranslationResult<(Vec<String>, Vec<String>)> {
    let channels = server.list_channels().await?;
    let roles = server.list_roles().await?;

    let names = |entities: &[Box<dyn RenameableEntity>]| -> Vec<String> {
        entities
            .iter()
            .filter(|entity| !is_reserved_role(entity.as_ref()))
            .map(|entity| entity.name().to_string())
            .collect()
    };
    Ok((names(&channels), names(&roles)))
}
