//! 核心翻译模块
//!
//! - `engine`: 对完整 DOM 执行一次去重翻译
//! - `filter`: 缓冲响应流并在文档完整后调用引擎

pub mod engine;
pub mod filter;

pub use engine::{PassStats, TranslationEngine};
pub use filter::{FilterState, TranslationFilter};
