//! # 解析器模块
//!
//! 负责把响应中的 HTML 转换为 DOM 并在翻译后重新序列化。
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM节点读写、序列化

pub mod html;

pub use html::{html_to_dom, parse_html, serialize_document};
