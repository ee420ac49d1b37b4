//! Google 翻译后端
//!
//! 通过 URL 查询参数提交文本：
//!
//! ```text
//! GET {endpoint}?key=K&source=en&target=de&format=text&q=...&q=...
//! ```
//!
//! 响应中的 `data.translations` 数组与请求中的 `q` 参数按下标对应。请求 URL
//! 有长度和段数上限，由 [`LengthBoundedSplitter`] 拆成顺序发送的子批次；
//! 任一子批次失败都会终止整次翻译，后续子批次不再发送。

use serde::Deserialize;
use url::form_urlencoded;

use crate::translation::backend::TranslationBackend;
use crate::translation::config::GoogleConfig;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::batch::{
    restore_batch_whitespace, BatchLimits, LengthBoundedSplitter,
};
use crate::translation::unit::{TranslationRequest, TranslationUnit};

/// HTTP 响应
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 发送 GET 请求的传输层
pub trait Transport {
    fn get(&self, url: &str) -> TranslationResult<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> TranslationResult<TransportResponse> {
        (**self).get(url)
    }
}

/// 基于 reqwest 阻塞客户端的传输层
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &GoogleConfig) -> TranslationResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranslationError::NetworkError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> TranslationResult<TransportResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// 单段文本在 URL 中的编码形式
pub fn encode_query_segment(text: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("&q={}", encoded)
}

/// 解析响应体中的译文列表
pub fn parse_translations(body: &str) -> TranslationResult<Vec<String>> {
    let response: GoogleResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .translations
        .into_iter()
        .map(|t| t.translated_text)
        .collect())
}

fn validate_api_key(config: &GoogleConfig) -> TranslationResult<()> {
    if config.api_key.trim().is_empty() {
        return Err(TranslationError::ConfigError(
            "Google 翻译需要 API 密钥".to_string(),
        ));
    }
    Ok(())
}

/// Google 翻译后端
pub struct GoogleTranslationBackend<T = ReqwestTransport> {
    config: GoogleConfig,
    transport: T,
}

impl GoogleTranslationBackend<ReqwestTransport> {
    /// 使用 reqwest 传输层创建后端
    pub fn new(config: GoogleConfig) -> TranslationResult<Self> {
        validate_api_key(&config)?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> GoogleTranslationBackend<T> {
    pub fn with_transport(config: GoogleConfig, transport: T) -> TranslationResult<Self> {
        validate_api_key(&config)?;
        Ok(Self { config, transport })
    }

    pub fn limits(&self) -> BatchLimits {
        BatchLimits {
            max_segments: self.config.max_segments,
            max_length: self.config.max_url_length,
        }
    }

    /// 所有子请求共享的 URL 前缀
    fn base_url(&self, request: &TranslationRequest) -> String {
        let params: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("key", &self.config.api_key)
            .append_pair("source", &request.source_language)
            .append_pair("target", &request.target_language)
            .append_pair("format", "text")
            .finish();

        format!("{}?{}", self.config.endpoint, params)
    }

    /// 发送一个子批次，可重试的错误按配置重试
    fn call(&self, url: &str, batch: usize) -> TranslationResult<Vec<String>> {
        let mut attempt = 0;

        loop {
            let result = self.transport.get(url).and_then(|response| {
                if !response.is_success() {
                    return Err(TranslationError::HttpStatus {
                        status: response.status,
                        reason: response.reason,
                    });
                }
                parse_translations(&response.body)
            });

            match result {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!("子批次 {} 第 {} 次重试: {}", batch, attempt, e);
                }
                other => return other,
            }
        }
    }

    fn apply(units: &mut [TranslationUnit], translations: Vec<String>) -> TranslationResult<()> {
        if translations.len() > units.len() {
            return Err(TranslationError::MalformedResponse(format!(
                "请求 {} 段文本，返回 {} 段译文",
                units.len(),
                translations.len()
            )));
        }

        if translations.len() < units.len() {
            tracing::warn!(
                "请求 {} 段文本，只返回 {} 段译文，其余保留原文",
                units.len(),
                translations.len()
            );
        }

        for (unit, translated) in units.iter_mut().zip(translations) {
            unit.target_text = Some(translated);
        }

        restore_batch_whitespace(units);
        Ok(())
    }
}

impl<T: Transport> TranslationBackend for GoogleTranslationBackend<T> {
    fn provider_name(&self) -> &str {
        "Google"
    }

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()> {
        if request.is_empty() {
            return Ok(());
        }

        let splitter =
            LengthBoundedSplitter::new(self.base_url(request), self.limits(), encode_query_segment);
        let sources: Vec<&str> = request
            .units
            .iter()
            .map(|unit| unit.source_text.as_str())
            .collect();
        let batches = splitter.plan(&sources);

        for (index, batch) in batches.into_iter().enumerate() {
            tracing::debug!(
                "发送子批次 {}: {} 段文本, URL 长度 {}",
                index,
                batch.range.len(),
                batch.request.len()
            );

            let translations = self.call(&batch.request, index)?;
            Self::apply(&mut request.units[batch.range], translations)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_segment_is_form_encoded() {
        assert_eq!(encode_query_segment("submit it"), "&q=submit+it");
        assert_eq!(encode_query_segment("a&b=c"), "&q=a%26b%3Dc");
        assert_eq!(encode_query_segment("ü"), "&q=%C3%BC");
    }

    #[test]
    fn test_parse_translations() {
        let body = r#"{"data":{"translations":[{"translatedText":"Hallo"},{"translatedText":"Welt","detectedSourceLanguage":"en"}]}}"#;
        assert_eq!(parse_translations(body).unwrap(), vec!["Hallo", "Welt"]);
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let result = parse_translations(r#"{"error":{"code":400}}"#);
        assert!(matches!(result, Err(TranslationError::MalformedResponse(_))));
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = GoogleTranslationBackend::new(GoogleConfig::default());
        assert!(matches!(result, Err(TranslationError::ConfigError(_))));
    }

    #[test]
    fn test_surplus_translations_are_malformed() {
        let mut units = vec![TranslationUnit::new("a")];
        let result = GoogleTranslationBackend::<ReqwestTransport>::apply(
            &mut units,
            vec!["x".to_string(), "y".to_string()],
        );
        assert!(matches!(result, Err(TranslationError::MalformedResponse(_))));
    }
}
