//! 聊天命令解析

use crate::translation::config::TranslationConfig;

/// 机器人支持的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 翻译并重命名所有频道和角色
    TranslateServer { source: String, target: String },
    /// 只计算译文，不修改任何名称
    PreviewTranslation { source: String, target: String },
    /// 列出当前的频道和角色名称
    ListChannelsAndRoles,
}

impl Command {
    pub const TRANSLATE_SERVER: &'static str = "translate_server";
    pub const PREVIEW_TRANSLATION: &'static str = "preview_translation";
    pub const LIST_CHANNELS_AND_ROLES: &'static str = "list_channels_and_roles";

    /// 解析一条消息
    ///
    /// 第一个词必须是带前缀的命令名。恰好带两个参数时依次作为源语言和
    /// 目标语言，否则使用配置中的默认语言。不是命令的消息返回 `None`。
    pub fn parse(content: &str, config: &TranslationConfig) -> Option<Self> {
        let mut words = content.split_whitespace();
        let name = words.next()?.strip_prefix(config.command_prefix.as_str())?;
        let args: Vec<&str> = words.collect();

        let (source, target) = match args.as_slice() {
            [source, target] => (source.to_string(), target.to_string()),
            _ => (config.source_lang.clone(), config.target_lang.clone()),
        };

        match name {
            Self::TRANSLATE_SERVER => Some(Command::TranslateServer { source, target }),
            Self::PREVIEW_TRANSLATION => Some(Command::PreviewTranslation { source, target }),
            Self::LIST_CHANNELS_AND_ROLES => Some(Command::ListChannelsAndRoles),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::TranslateServer { .. } => Self::TRANSLATE_SERVER,
            Command::PreviewTranslation { .. } => Self::PREVIEW_TRANSLATION,
            Command::ListChannelsAndRoles => Self::LIST_CHANNELS_AND_ROLES,
        }
    }

    /// 是否会启动一次批次
    pub fn runs_batch(&self) -> bool {
        !matches!(self, Command::ListChannelsAndRoles)
    }
}
