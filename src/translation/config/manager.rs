//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 机器人运行配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 语言配置
    pub target_lang: String,
    pub source_lang: String,

    // 翻译后端配置
    pub api_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,

    // 平台配置
    pub command_prefix: String,
    pub rename_interval_ms: u64,

    // 缓存配置
    pub cache_enabled: bool,

    // 日志配置
    pub log_level: String,
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.target_lang.trim().is_empty() || self.target_lang == constants::AUTO_DETECT {
            return Err(TranslationError::ConfigError(
                "目标语言不能为空或 auto".to_string(),
            ));
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(TranslationError::ConfigError(format!(
                "无效的翻译服务地址: {}",
                self.api_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时不能为0".to_string()));
        }

        if self.command_prefix.is_empty() {
            return Err(TranslationError::ConfigError("命令前缀不能为空".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    ///
    /// 只有显式设置的变量才会覆盖配置文件中的值，无效值会被忽略并记录警告。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, core, discord, translation, EnvVar};

        fn explicit<T, V: EnvVar<T>>() -> Option<T> {
            std::env::var(V::NAME).ok()?;
            match V::get() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("忽略无效的环境变量: {}", e);
                    None
                }
            }
        }

        if let Some(target_lang) = explicit::<_, translation::TargetLang>() {
            self.target_lang = target_lang;
        }

        if let Some(source_lang) = explicit::<_, translation::SourceLang>() {
            self.source_lang = source_lang;
        }

        if let Some(api_url) = explicit::<_, translation::ApiUrl>() {
            self.api_url = api_url;
            tracing::info!("环境变量覆盖 API URL: {}", self.api_url);
        }

        if let Some(api_key) = explicit::<_, translation::ApiKey>() {
            self.api_key = Some(api_key);
        }

        if let Some(timeout) = explicit::<_, translation::RequestTimeout>() {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(interval) = explicit::<_, translation::RenameInterval>() {
            self.rename_interval_ms = interval.as_millis() as u64;
        }

        if let Some(prefix) = explicit::<_, discord::CommandPrefix>() {
            self.command_prefix = prefix;
        }

        if let Some(enabled) = explicit::<_, cache::Enabled>() {
            self.cache_enabled = enabled;
        }

        if let Some(level) = explicit::<_, core::LogLevel>() {
            self.log_level = level;
        }
    }

    /// 转换为Duration类型
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn rename_interval(&self) -> Duration {
        Duration::from_millis(self.rename_interval_ms)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            source_lang: constants::AUTO_DETECT.to_string(),

            api_url: constants::DEFAULT_API_URL.to_string(),
            api_key: None,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            command_prefix: constants::DEFAULT_COMMAND_PREFIX.to_string(),
            rename_interval_ms: constants::DEFAULT_RENAME_INTERVAL.as_millis() as u64,

            cache_enabled: true,

            log_level: "info".to_string(),
        }
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    ///
    /// 依次加载 `.env` 文件、配置文件（或默认值）、环境变量覆盖，最后校验。
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 使用指定的配置文件创建配置管理器
    pub fn from_path(path: &str) -> TranslationResult<Self> {
        Self::load_dotenv();
        let expanded_path = shellexpand::tilde(path);
        tracing::info!("加载配置文件: {}", expanded_path);
        let config = Self::load_from_file(&expanded_path)?;
        Self::finish(config)
    }

    fn finish(mut config: TranslationConfig) -> TranslationResult<Self> {
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self { config })
    }

    /// 取出配置
    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从搜索路径加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        // 尝试TOML格式
        if path.ends_with(".toml") {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        } else {
            // 尝试JSON格式
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
