//! # Autoweb Translator
//!
//! 在响应流中就地机器翻译 HTML 页面文本的过滤器。
//!
//! ## 模块组织
//!
//! - `parsers` - HTML 解析与序列化
//! - `translation` - 翻译引擎、流过滤器和翻译后端
//! - `env` - 类型安全的环境变量
//! - `web` - axum 翻译中间件（可选）

pub mod env;
pub mod parsers;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use parsers::*;
