// 集成测试公共模块
//
// 提供记录请求的翻译后端和可编排响应的 HTTP 传输层

use std::collections::VecDeque;
use std::sync::Mutex;

use autoweb_translator::translation::backends::google::{Transport, TransportResponse};
use autoweb_translator::translation::{
    GoogleConfig, TranslationBackend, TranslationError, TranslationRequest, TranslationResult,
};

/// 把所有文本译成同一个字符串，并记录每次请求的源文本
pub struct RecordingBackend {
    replacement: String,
    requests: Mutex<Vec<Vec<String>>>,
}

impl RecordingBackend {
    pub fn new(replacement: &str) -> Self {
        Self {
            replacement: replacement.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl TranslationBackend for RecordingBackend {
    fn provider_name(&self) -> &str {
        "recording"
    }

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()> {
        self.requests
            .lock()
            .unwrap()
            .push(request.units.iter().map(|u| u.source_text.clone()).collect());

        for unit in request.units.iter_mut() {
            unit.target_text = Some(self.replacement.clone());
        }
        Ok(())
    }
}

/// 只翻译已知的文本，其余保持未翻译
pub struct PartialBackend {
    known: Vec<(String, String)>,
}

impl PartialBackend {
    pub fn new(known: &[(&str, &str)]) -> Self {
        Self {
            known: known
                .iter()
                .map(|(s, t)| (s.to_string(), t.to_string()))
                .collect(),
        }
    }
}

impl TranslationBackend for PartialBackend {
    fn provider_name(&self) -> &str {
        "partial"
    }

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()> {
        for unit in request.units.iter_mut() {
            unit.target_text = self
                .known
                .iter()
                .find(|(source, _)| *source == unit.source_text)
                .map(|(_, target)| target.clone());
        }
        Ok(())
    }
}

/// 总是返回指定错误
pub struct FailingBackend {
    error: TranslationError,
}

impl FailingBackend {
    pub fn new(error: TranslationError) -> Self {
        Self { error }
    }

    pub fn service_unavailable() -> Self {
        Self::new(TranslationError::HttpStatus {
            status: 503,
            reason: "Service Unavailable".to_string(),
        })
    }
}

impl TranslationBackend for FailingBackend {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn translate(&self, _request: &mut TranslationRequest) -> TranslationResult<()> {
        Err(self.error.clone())
    }
}

/// 按顺序返回预先编排的响应，并记录请求的 URL
pub struct FakeTransport {
    responses: Mutex<VecDeque<TranslationResult<TransportResponse>>>,
    urls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// 编排一个成功响应
    pub fn push_translations(&self, translations: &[&str]) {
        let items: Vec<serde_json::Value> = translations
            .iter()
            .map(|text| serde_json::json!({ "translatedText": text }))
            .collect();
        let body = serde_json::json!({ "data": { "translations": items } }).to_string();

        self.push_body(200, &body);
    }

    pub fn push_body(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(TransportResponse {
            status,
            reason: if status == 200 { "OK" } else { "Error" }.to_string(),
            body: body.to_string(),
        }));
    }

    pub fn push_status(&self, status: u16, reason: &str) {
        self.responses.lock().unwrap().push_back(Ok(TransportResponse {
            status,
            reason: reason.to_string(),
            body: String::new(),
        }));
    }

    pub fn push_network_error(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TranslationError::NetworkError("connection reset".to_string())));
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// 每个请求中的 `q` 参数
    pub fn queries(&self) -> Vec<Vec<String>> {
        self.urls()
            .iter()
            .map(|url| query_values(url, "q"))
            .collect()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> TranslationResult<TransportResponse> {
        self.urls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TranslationError::NetworkError("no scripted response".to_string())))
    }
}

/// 解码 URL 中某个参数的所有取值
pub fn query_values(url: &str, name: &str) -> Vec<String> {
    url::Url::parse(url)
        .unwrap()
        .query_pairs()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .collect()
}

pub fn google_config() -> GoogleConfig {
    GoogleConfig {
        api_key: "test-key".to_string(),
        endpoint: "https://translate.example.com/v2".to_string(),
        ..GoogleConfig::default()
    }
}
