//! Discord 平台适配器
//!
//! 基于 serenity 的 HTTP 客户端实现 [`ServerHandle`] 和 [`RenameableEntity`]。
//! 只处理文字频道和语音频道，其他种类（分类、论坛等）不参与翻译。

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelId, ChannelType, EditChannel, EditRole, GuildChannel, GuildId, PermissionOverwrite,
    PermissionOverwriteType, Permissions, Role, RoleId, UserId,
};
use serenity::http::Http;

use super::{EntityKind, RenameableEntity, ServerHandle};
use crate::translation::error::{TranslationError, TranslationResult};

/// 一个 Discord 服务器
pub struct DiscordGuild {
    http: Arc<Http>,
    guild_id: GuildId,
    bot_user_id: UserId,
}

impl DiscordGuild {
    pub fn new(http: Arc<Http>, guild_id: GuildId, bot_user_id: UserId) -> Self {
        Self {
            http,
            guild_id,
            bot_user_id,
        }
    }

    /// `@everyone` 角色的 ID 与服务器 ID 相同
    fn everyone_role(&self) -> RoleId {
        RoleId::new(self.guild_id.get())
    }
}

#[async_trait]
impl ServerHandle for DiscordGuild {
    fn id(&self) -> u64 {
        self.guild_id.get()
    }

    async fn has_manage_channels_and_roles(&self) -> TranslationResult<bool> {
        let guild = self.guild_id.to_partial_guild(&*self.http).await?;
        if guild.owner_id == self.bot_user_id {
            return Ok(true);
        }

        let member = self.guild_id.member(&*self.http, self.bot_user_id).await?;
        let everyone = self.everyone_role();
        let permissions = guild
            .roles
            .iter()
            .filter(|(id, _)| **id == everyone || member.roles.contains(*id))
            .fold(Permissions::empty(), |acc, (_, role)| acc | role.permissions);

        tracing::debug!("服务器 {} 中的机器人权限: {:?}", self.guild_id, permissions);
        Ok(grants_manage_channels_and_roles(permissions))
    }

    async fn list_channels(&self) -> TranslationResult<Vec<Box<dyn RenameableEntity>>> {
        let mut channels: Vec<GuildChannel> = self
            .guild_id
            .channels(&self.http)
            .await?
            .into_values()
            .filter(|channel| is_renameable_kind(channel.kind))
            .collect();
        channels.sort_by_key(|channel| (channel.position, channel.id));

        let everyone = self.everyone_role();
        Ok(channels
            .into_iter()
            .map(|channel| {
                let private = channel.kind == ChannelType::Private
                    || hidden_from(&channel.permission_overwrites, everyone);
                Box::new(DiscordChannel {
                    http: Arc::clone(&self.http),
                    id: channel.id,
                    name: channel.name,
                    private,
                }) as Box<dyn RenameableEntity>
            })
            .collect())
    }

    async fn list_roles(&self) -> TranslationResult<Vec<Box<dyn RenameableEntity>>> {
        let mut roles: Vec<Role> = self.guild_id.roles(&self.http).await?.into_values().collect();
        roles.sort_by_key(|role| (role.position, role.id));

        let everyone = self.everyone_role();
        Ok(roles
            .into_iter()
            .map(|role| {
                Box::new(DiscordRole {
                    http: Arc::clone(&self.http),
                    guild_id: self.guild_id,
                    id: role.id,
                    default: role.id == everyone,
                    name: role.name,
                }) as Box<dyn RenameableEntity>
            })
            .collect())
    }
}

/// 文字或语音频道
pub struct DiscordChannel {
    http: Arc<Http>,
    id: ChannelId,
    name: String,
    private: bool,
}

#[async_trait]
impl RenameableEntity for DiscordChannel {
    fn id(&self) -> u64 {
        self.id.get()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Channel
    }

    fn is_private(&self) -> bool {
        self.private
    }

    async fn rename(&self, new_name: &str) -> TranslationResult<()> {
        self.id
            .edit(&*self.http, EditChannel::new().name(new_name))
            .await
            .map(|_| ())
            .map_err(|e| TranslationError::RenameError(e.to_string()))
    }
}

/// 服务器角色
pub struct DiscordRole {
    http: Arc<Http>,
    guild_id: GuildId,
    id: RoleId,
    name: String,
    default: bool,
}

#[async_trait]
impl RenameableEntity for DiscordRole {
    fn id(&self) -> u64 {
        self.id.get()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Role
    }

    fn is_default_role(&self) -> bool {
        self.default
    }

    async fn rename(&self, new_name: &str) -> TranslationResult<()> {
        self.guild_id
            .edit_role(&*self.http, self.id, EditRole::new().name(new_name))
            .await
            .map(|_| ())
            .map_err(|e| TranslationError::RenameError(e.to_string()))
    }
}

/// 所有者和管理员拥有全部权限
fn grants_manage_channels_and_roles(permissions: Permissions) -> bool {
    permissions.administrator()
        || permissions.contains(Permissions::MANAGE_CHANNELS | Permissions::MANAGE_ROLES)
}

/// 参与翻译的频道类型：文字（含公告）和语音频道
fn is_renameable_kind(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text | ChannelType::News | ChannelType::Voice | ChannelType::Private
    )
}

/// 频道是否对 `@everyone` 隐藏
fn hidden_from(overwrites: &[PermissionOverwrite], everyone: RoleId) -> bool {
    overwrites.iter().any(|overwrite| {
        matches!(overwrite.kind, PermissionOverwriteType::Role(id) if id == everyone)
            && overwrite.deny.contains(Permissions::VIEW_CHANNEL)
    })
}
