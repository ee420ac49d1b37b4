//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 未遇到 `</html>` 就结束的文档的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnterminatedPolicy {
    /// 流结束时原样输出已缓冲的内容
    #[default]
    PassThrough,
    /// 丢弃已缓冲的内容
    Discard,
}

/// 过滤器配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterOptions {
    /// 内部文本不参与翻译的元素
    pub excluded_tags: Vec<String>,
    /// `value` 属性参与翻译的 `input` 类型
    pub input_types: Vec<String>,
    /// 等待 `</html>` 时最多缓冲的字节数
    pub max_buffered_bytes: usize,
    pub unterminated: UnterminatedPolicy,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            excluded_tags: to_strings(constants::DEFAULT_EXCLUDED_TAGS),
            input_types: to_strings(constants::DEFAULT_INPUT_TYPES),
            max_buffered_bytes: constants::DEFAULT_MAX_BUFFERED_BYTES,
            unterminated: UnterminatedPolicy::default(),
        }
    }
}

/// Google 翻译后端配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: String,
    pub endpoint: String,
    /// 单次请求最多携带的文本段数
    pub max_segments: usize,
    /// 单次请求 URL 的最大长度
    pub max_url_length: usize,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: constants::GOOGLE_ENDPOINT.to_string(),
            max_segments: constants::GOOGLE_MAX_SEGMENTS,
            max_url_length: constants::GOOGLE_MAX_URL_LENGTH,
            timeout_secs: constants::GOOGLE_TIMEOUT_SECS,
            max_retries: 0,
        }
    }
}

impl GoogleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Web 服务配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_addr: String,
    pub port: u16,
    /// 携带目标语言的查询参数名
    pub lang_param: String,
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: constants::DEFAULT_BIND_ADDR.to_string(),
            port: constants::DEFAULT_PORT,
            lang_param: constants::DEFAULT_LANG_PARAM.to_string(),
            static_dir: constants::DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub source_lang: String,
    pub filter: FilterOptions,
    pub google: GoogleConfig,
    pub web: WebConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            filter: FilterOptions::default(),
            google: GoogleConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl TranslatorConfig {
    /// 解析 TOML 配置
    pub fn from_toml_str(content: &str) -> TranslationResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.source_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError("源语言不能为空".to_string()));
        }

        if self.filter.excluded_tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(TranslationError::ConfigError("排除的元素名不能为空".to_string()));
        }

        if self.filter.max_buffered_bytes == 0 {
            return Err(TranslationError::ConfigError("缓冲区上限不能为0".to_string()));
        }

        if self.google.max_segments == 0 {
            return Err(TranslationError::ConfigError("单次请求段数不能为0".to_string()));
        }

        if self.google.max_url_length <= self.google.endpoint.len() {
            return Err(TranslationError::ConfigError(format!(
                "URL 长度上限 {} 不足以容纳接口地址",
                self.google.max_url_length
            )));
        }

        if !(self.google.endpoint.starts_with("http://")
            || self.google.endpoint.starts_with("https://"))
        {
            return Err(TranslationError::ConfigError(format!(
                "接口地址必须以 http:// 或 https:// 开头: {}",
                self.google.endpoint
            )));
        }

        if self.web.lang_param.trim().is_empty() {
            return Err(TranslationError::ConfigError("语言参数名不能为空".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    ///
    /// 已设置但无法解析的变量视为配置错误。
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{google, translation, web, EnvVar};

        if let Some(source_lang) = translation::SourceLang::get_override()? {
            self.source_lang = source_lang;
        }

        if let Some(max_bytes) = translation::MaxBufferedBytes::get_override()? {
            self.filter.max_buffered_bytes = max_bytes;
        }

        if let Some(api_key) = google::ApiKey::get_override()? {
            self.google.api_key = api_key;
        }

        if let Some(endpoint) = google::Endpoint::get_override()? {
            tracing::info!("环境变量覆盖 API URL: {}", endpoint);
            self.google.endpoint = endpoint;
        }

        if let Some(max_retries) = google::MaxRetries::get_override()? {
            self.google.max_retries = max_retries;
        }

        if let Some(bind_addr) = web::BindAddress::get_override()? {
            self.web.bind_addr = bind_addr;
        }

        if let Some(port) = web::Port::get_override()? {
            self.web.port = port;
        }

        Ok(())
    }
}

/// 简化的配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: TranslatorConfig,
    loaded_from: Option<PathBuf>,
}

impl ConfigManager {
    /// 按默认搜索路径创建配置管理器
    pub fn new() -> TranslationResult<Self> {
        Self::load(None)
    }

    /// 从指定文件创建配置管理器
    pub fn from_path(path: &Path) -> TranslationResult<Self> {
        Self::load(Some(path))
    }

    /// 加载配置文件、应用环境变量并验证
    ///
    /// 查找顺序：显式路径、`AUTOWEB_CONFIG`、`constants::CONFIG_PATHS`。
    pub fn load(explicit: Option<&Path>) -> TranslationResult<Self> {
        use crate::env::{translation::ConfigPath, EnvVar};

        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => match ConfigPath::get_override()? {
                Some(path) => Some(PathBuf::from(path)),
                None => constants::CONFIG_PATHS
                    .iter()
                    .map(PathBuf::from)
                    .find(|path| path.exists()),
            },
        };

        let mut config = match &path {
            Some(path) => {
                tracing::info!("加载配置文件: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                tracing::info!("未找到配置文件，使用默认配置");
                TranslatorConfig::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self {
            config,
            loaded_from: path,
        })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslatorConfig {
        self.config
    }

    /// 配置来源文件
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> TranslationResult<TranslatorConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取配置文件失败 {}: {}", path.display(), e))
        })?;

        TranslatorConfig::from_toml_str(&content)
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> TranslationResult<()> {
        let config = TranslatorConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
