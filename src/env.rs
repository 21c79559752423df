//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量管理

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 读取可选变量：未设置时为 `None`，已设置则必须能解析
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "GUILD_TRANSLATOR_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// Discord 相关环境变量
pub mod discord {
    use super::*;

    /// 机器人令牌
    pub struct Token;
    impl EnvVar<String> for Token {
        const NAME: &'static str = "DISCORD_TOKEN";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Discord bot token (required to run the bot)";

        fn parse(value: &str) -> EnvResult<String> {
            let token = value.trim();
            if token.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Token cannot be empty".to_string(),
                });
            }
            Ok(token.to_string())
        }
    }

    /// 命令前缀
    pub struct CommandPrefix;
    impl EnvVar<String> for CommandPrefix {
        const NAME: &'static str = "GUILD_TRANSLATOR_COMMAND_PREFIX";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("!".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Prefix of chat commands";

        fn parse(value: &str) -> EnvResult<String> {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Prefix must be non-empty and contain no whitespace".to_string(),
                });
            }
            Ok(value.to_string())
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 目标语言
    pub struct TargetLang;
    impl EnvVar<String> for TargetLang {
        const NAME: &'static str = "GUILD_TRANSLATOR_TARGET_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Default target language (ISO 639-1 code)";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim().to_lowercase();
            if !is_language_code(&lang) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Language code must look like 'en' or 'zh-CN'".to_string(),
                });
            }
            Ok(lang)
        }
    }

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "GUILD_TRANSLATOR_SOURCE_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("auto".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Default source language ('auto' for detection)";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim().to_lowercase();
            if lang == "auto" || is_language_code(&lang) {
                Ok(lang)
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Language code must be 'auto' or look like 'en'".to_string(),
                })
            }
        }
    }

    /// API URL
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "GUILD_TRANSLATOR_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("http://localhost:5000".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Base URL of the LibreTranslate-compatible backend";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim().trim_end_matches('/');
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// API 密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "GUILD_TRANSLATOR_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "API key of the translation backend (optional)";

        fn parse(value: &str) -> EnvResult<String> {
            if value.trim().is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API key cannot be empty".to_string(),
                });
            }
            Ok(value.trim().to_string())
        }
    }

    /// 单次请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "GUILD_TRANSLATOR_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Timeout of each remote call in seconds (1-300)";

        fn parse(value: &str) -> EnvResult<Duration> {
            let secs = parse_positive_usize(value, Self::NAME, 1, 300)?;
            Ok(Duration::from_secs(secs as u64))
        }
    }

    /// 重命名调用之间的最小间隔
    pub struct RenameInterval;
    impl EnvVar<Duration> for RenameInterval {
        const NAME: &'static str = "GUILD_TRANSLATOR_RENAME_INTERVAL_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_millis(1000));
        const DESCRIPTION: &'static str =
            "Minimum spacing between two rename calls in milliseconds (0-60000)";

        fn parse(value: &str) -> EnvResult<Duration> {
            let millis = value.trim().parse::<u64>().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("Invalid number '{}'", value),
            })?;
            if millis > 60_000 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Interval must be at most 60000 ms".to_string(),
                });
            }
            Ok(Duration::from_millis(millis))
        }
    }

    fn is_language_code(lang: &str) -> bool {
        let mut parts = lang.splitn(2, '-');
        let primary = parts.next().unwrap_or_default();
        let primary_ok =
            (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
        let region_ok = parts
            .next()
            .map_or(true, |region| !region.is_empty() && region.chars().all(|c| c.is_ascii_alphanumeric()));
        primary_ok && region_ok
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "GUILD_TRANSLATOR_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Memoize translations for the lifetime of the process";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid boolean '{}'. Use: true/false, 1/0, yes/no, on/off", value),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let parsed = value.trim().parse::<usize>().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: format!("Invalid number '{}'", value),
    })?;
    if parsed < min || parsed > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(parsed)
}

/// 完整的环境变量配置
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: String,

    // Discord 配置
    pub discord_token: Option<String>,
    pub command_prefix: String,

    // 翻译配置
    pub target_lang: String,
    pub source_lang: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub rename_interval: Duration,

    // 缓存配置
    pub cache_enabled: bool,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,

            discord_token: discord::Token::get_optional()?,
            command_prefix: discord::CommandPrefix::get()?,

            target_lang: translation::TargetLang::get()?,
            source_lang: translation::SourceLang::get()?,
            api_url: translation::ApiUrl::get()?,
            api_key: translation::ApiKey::get_optional()?,
            request_timeout: translation::RequestTimeout::get()?,
            rename_interval: translation::RenameInterval::get()?,

            cache_enabled: cache::Enabled::get()?,
        })
    }

    /// 打印配置摘要（隐藏敏感信息）
    pub fn print_summary(&self) {
        println!("Environment Configuration Summary:");
        println!("  Log Level: {}", self.log_level);
        println!(
            "  Discord Token: {}",
            if self.discord_token.is_some() { "[configured]" } else { "[missing]" }
        );
        println!("  Languages: {} -> {}", self.source_lang, self.target_lang);
        println!("  Backend: {}", self.api_url);
        if self.api_key.is_some() {
            println!("  API Key: [configured]");
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    fn line<T: fmt::Debug>(name: &str, description: &str, default: Option<T>) -> String {
        format!("- `{}`: {} (default: {:?})\n", name, description, default)
    }

    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&line(
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        Some("info"),
    ));

    docs.push_str("\n## Discord Configuration\n\n");
    docs.push_str(&line(
        discord::Token::NAME,
        discord::Token::DESCRIPTION,
        discord::Token::DEFAULT,
    ));
    docs.push_str(&line(
        discord::CommandPrefix::NAME,
        discord::CommandPrefix::DESCRIPTION,
        Some("!"),
    ));

    docs.push_str("\n## Translation Configuration\n\n");
    docs.push_str(&line(
        translation::TargetLang::NAME,
        translation::TargetLang::DESCRIPTION,
        Some("en"),
    ));
    docs.push_str(&line(
        translation::SourceLang::NAME,
        translation::SourceLang::DESCRIPTION,
        Some("auto"),
    ));
    docs.push_str(&line(
        translation::ApiUrl::NAME,
        translation::ApiUrl::DESCRIPTION,
        Some("http://localhost:5000"),
    ));
    docs.push_str(&line(
        translation::ApiKey::NAME,
        translation::ApiKey::DESCRIPTION,
        translation::ApiKey::DEFAULT,
    ));
    docs.push_str(&line(
        translation::RequestTimeout::NAME,
        translation::RequestTimeout::DESCRIPTION,
        translation::RequestTimeout::DEFAULT,
    ));
    docs.push_str(&line(
        translation::RenameInterval::NAME,
        translation::RenameInterval::DESCRIPTION,
        translation::RenameInterval::DEFAULT,
    ));

    docs.push_str("\n## Cache Configuration\n\n");
    docs.push_str(&line(
        cache::Enabled::NAME,
        cache::Enabled::DESCRIPTION,
        cache::Enabled::DEFAULT,
    ));

    docs
}
