//! Discord 事件处理

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready, UserId};
use tracing::{info, warn};

use super::{execute, report, Command, InFlightGuilds};
use crate::platform::discord::DiscordGuild;
use crate::translation::TranslationService;

/// 机器人需要的网关意图
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// 处理服务器消息中的命令
pub struct BotHandler {
    service: Arc<TranslationService>,
    in_flight: Arc<InFlightGuilds>,
    bot_user_id: OnceLock<UserId>,
}

impl BotHandler {
    pub fn new(service: Arc<TranslationService>) -> Self {
        Self {
            service,
            in_flight: InFlightGuilds::new(),
            bot_user_id: OnceLock::new(),
        }
    }

    async fn reply(&self, ctx: &Context, msg: &Message, content: impl Into<String>) {
        if let Err(e) = msg.channel_id.say(&ctx.http, content).await {
            warn!("发送消息到频道 {} 失败: {}", msg.channel_id, e);
        }
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("已连接为 {} ({} 个服务器)", ready.user.name, ready.guilds.len());
        let _ = self.bot_user_id.set(ready.user.id);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(command) = Command::parse(&msg.content, self.service.config()) else {
            return;
        };
        let Some(guild_id) = msg.guild_id else {
            self.reply(&ctx, &msg, "This command only works inside a server.")
                .await;
            return;
        };
        let Some(bot_user_id) = self.bot_user_id.get().copied() else {
            warn!("尚未收到 ready 事件，忽略命令 {}", command.name());
            return;
        };

        info!(
            "用户 {} 在服务器 {} 中执行命令 {}",
            msg.author.name,
            guild_id,
            command.name()
        );

        let _guard = if command.runs_batch() {
            match self.in_flight.try_acquire(guild_id.get()) {
                Some(guard) => Some(guard),
                None => {
                    self.reply(
                        &ctx,
                        &msg,
                        "A translation is already running on this server.",
                    )
                    .await;
                    return;
                }
            }
        } else {
            None
        };

        match &command {
            Command::TranslateServer { source, target } => {
                self.reply(&ctx, &msg, report::started_notice(false, source, target))
                    .await;
            }
            Command::PreviewTranslation { source, target } => {
                self.reply(&ctx, &msg, report::started_notice(true, source, target))
                    .await;
            }
            Command::ListChannelsAndRoles => {}
        }

        let server = DiscordGuild::new(Arc::clone(&ctx.http), guild_id, bot_user_id);
        for chunk in execute(&self.service, &server, &command).await {
            self.reply(&ctx, &msg, chunk).await;
        }
    }
}
