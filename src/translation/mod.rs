//! 翻译模块
//!
//! 以流过滤器的形式翻译 HTML 响应：
//! - **core**: 翻译引擎和响应流过滤器
//! - **pipeline**: 候选位置选择、批次拆分
//! - **backends**: 翻译服务实现
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use autoweb_translator::translation::{
//!     GoogleConfig, GoogleTranslationBackend, TranslationFilter,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GoogleConfig {
//!     api_key: "KEY".to_string(),
//!     ..GoogleConfig::default()
//! };
//! let backend = GoogleTranslationBackend::new(config)?;
//!
//! let mut filter = TranslationFilter::new(Vec::new(), backend, "en", "de");
//! filter.write_chunk(b"<html><body><p>Hello</p></body></html>")?;
//! let translated = filter.finish()?;
//! # Ok(())
//! # }
//! ```

/// 翻译后端接口
pub mod backend;

/// 翻译服务实现
pub mod backends;

/// 配置管理模块
///
/// 配置文件、环境变量覆盖和默认值
pub mod config;

/// 核心模块 - 翻译引擎和流过滤器
pub mod core;

/// 错误处理模块
pub mod error;

/// 文本处理管道 - 位置选择和批次拆分
pub mod pipeline;

/// 翻译单元和请求
pub mod unit;

// ============================================================================
// 重新导出
// ============================================================================

pub use backend::{SharedBackend, TranslationBackend};
pub use backends::GoogleTranslationBackend;
pub use config::{
    ConfigManager, FilterOptions, GoogleConfig, TranslatorConfig, UnterminatedPolicy, WebConfig,
};
pub use core::{FilterState, PassStats, TranslationEngine, TranslationFilter};
pub use error::{ErrorCategory, TranslationError, TranslationResult};
pub use unit::{source_key, TranslationRequest, TranslationUnit};
