//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 语言设置
    pub const DEFAULT_TARGET_LANG: &str = "en";
    /// 源语言自动检测标记
    pub const AUTO_DETECT: &str = "auto";

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "http://localhost:5000";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    // 平台速率设置
    pub const DEFAULT_RENAME_INTERVAL: Duration = Duration::from_millis(1000);

    // 聊天命令
    pub const DEFAULT_COMMAND_PREFIX: &str = "!";
    pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

    /// 服务器默认角色，永远不会被重命名
    pub const EVERYONE_ROLE_NAME: &str = "@everyone";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "guild-translator.toml",
        "config.toml",
        ".guild-translator.toml",
        "~/.config/guild-translator/config.toml",
        "/etc/guild-translator/config.toml",
    ];
}
