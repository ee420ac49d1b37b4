//! HTML解析和处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `dom`: 解析与基础DOM操作
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod utils;

pub use dom::{
    get_enclosing_element_name, get_node_attr, get_node_name, get_parent_node, get_text_content,
    html_to_dom, parse_html, set_node_attr, set_text_content,
};
pub use serializer::serialize_document;
pub use utils::{is_blank, leading_whitespace, tag_in_list, trailing_whitespace};
