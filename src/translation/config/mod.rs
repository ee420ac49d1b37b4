//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持配置文件、环境变量和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, FilterOptions, GoogleConfig, TranslatorConfig, UnterminatedPolicy, WebConfig};

/// 配置常量
pub mod constants {
    // 过滤器相关
    pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &["script", "style", "link"];
    pub const DEFAULT_INPUT_TYPES: &[&str] = &["submit", "button", "reset"];
    pub const DEFAULT_MAX_BUFFERED_BYTES: usize = 8 * 1024 * 1024;
    pub const DEFAULT_SOURCE_LANG: &str = "en";

    // Google 后端
    pub const GOOGLE_ENDPOINT: &str = "https://www.googleapis.com/language/translate/v2";
    pub const GOOGLE_MAX_SEGMENTS: usize = 128;
    pub const GOOGLE_MAX_URL_LENGTH: usize = 1800;
    pub const GOOGLE_TIMEOUT_SECS: u64 = 30;

    // Web 服务
    pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 7080;
    pub const DEFAULT_LANG_PARAM: &str = "lang";
    pub const DEFAULT_STATIC_DIR: &str = "static";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "autoweb-translator.toml",
        ".autoweb-translator.toml",
        "/etc/autoweb-translator/config.toml",
    ];
}
