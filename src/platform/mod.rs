//! 聊天平台抽象
//!
//! 批次管道只依赖这里的两个特性：
//!
//! - [`RenameableEntity`]: 一个可重命名的远程实体（频道或角色）
//! - [`ServerHandle`]: 一个服务器，负责权限检查和实体列举
//!
//! 频道与角色只在远程重命名的调用方式上不同，因此共用同一个特性，
//! 由平台适配器分别实现。

use std::fmt;

use async_trait::async_trait;

use crate::translation::error::TranslationResult;

#[cfg(feature = "discord")]
pub mod discord;

/// 实体种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Channel,
    Role,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Channel => write!(f, "channel"),
            EntityKind::Role => write!(f, "role"),
        }
    }
}

/// 可重命名的远程实体
///
/// 实体归远程平台所有，批次只在运行期间持有其句柄。
#[async_trait]
pub trait RenameableEntity: Send + Sync {
    /// 平台上的实体 ID
    fn id(&self) -> u64;

    /// 当前名称
    fn name(&self) -> &str;

    fn kind(&self) -> EntityKind;

    /// 是否为私有实体（私有频道不参与翻译）
    fn is_private(&self) -> bool {
        false
    }

    /// 是否为服务器默认角色（`@everyone`）
    fn is_default_role(&self) -> bool {
        false
    }

    /// 在远程平台上重命名
    ///
    /// 失败时返回 `RenameError`，平台上的名称保持不变。
    async fn rename(&self, new_name: &str) -> TranslationResult<()>;
}

/// 远程服务器句柄
#[async_trait]
pub trait ServerHandle: Send + Sync {
    /// 服务器 ID
    fn id(&self) -> u64;

    /// 当前身份是否同时拥有管理频道和管理角色的权限
    async fn has_manage_channels_and_roles(&self) -> TranslationResult<bool>;

    /// 按平台的自然顺序列举频道
    async fn list_channels(&self) -> TranslationResult<Vec<Box<dyn RenameableEntity>>>;

    /// 按平台的自然顺序列举角色
    async fn list_roles(&self) -> TranslationResult<Vec<Box<dyn RenameableEntity>>>;
}
