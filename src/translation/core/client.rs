//! 翻译后端客户端
//!
//! [`TranslationBackend`] 抽象外部机器翻译服务的两个能力：语言检测与文本翻译。
//! 这一层不做重试，失败原样上报给调用方。
//!
//! [`LibreTranslateClient`] 是基于 HTTP 的默认实现，兼容 LibreTranslate 的
//! `/detect` 和 `/translate` 接口。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 外部翻译后端
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// 检测文本的语言，返回语言代码（如 `fr`）
    ///
    /// 后端不可达或返回格式错误时返回 `DetectionError`。
    async fn detect_language(&self, text: &str) -> TranslationResult<String>;

    /// 翻译文本
    ///
    /// 失败时返回 `TranslationServiceError`，后端限流时返回 `RateLimitExceeded`。
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>;
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct DetectResponse {
    language: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// LibreTranslate 兼容的 HTTP 客户端
pub struct LibreTranslateClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    /// 创建新的客户端，每个请求都带有 `timeout` 超时
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> TranslationResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// 根据配置创建客户端
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )
    }

    /// 后端地址
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> TranslationResult<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.api_url, endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| TranslationError::from(e).with_context(endpoint))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslationError::RateLimitExceeded);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::AuthorizationError(format!(
                "{} - {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::TranslationServiceError(format!(
                "API错误: {} - {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslateClient {
    async fn detect_language(&self, text: &str) -> TranslationResult<String> {
        let request = DetectRequest {
            q: text,
            api_key: self.api_key.as_deref(),
        };

        let detect = async {
            let response = self.post("detect", &request).await?;
            let results: Vec<DetectResponse> = response.json().await?;
            results
                .into_iter()
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
                .map(|best| best.language.to_lowercase())
                .ok_or_else(|| TranslationError::DetectionError("后端未返回任何语言".to_string()))
        };

        let language = detect.await.map_err(TranslationError::into_detection)?;
        tracing::debug!("检测语言: {} -> {}", text, language);
        Ok(language)
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let request = TranslateRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let translate = async {
            let response = self.post("translate", &request).await?;
            let body: TranslateResponse = response.json().await?;
            Ok::<_, TranslationError>(body.translated_text)
        };

        translate.await.map_err(TranslationError::into_translation)
    }
}
