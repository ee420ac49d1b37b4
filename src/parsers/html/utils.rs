/// 文本为空或只包含空白
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// 文本开头的空白部分
pub fn leading_whitespace(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}

/// 文本结尾的空白部分
///
/// 全空白的文本整体算作开头空白，这里返回空串。
pub fn trailing_whitespace(text: &str) -> &str {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return "";
    }
    &text[trimmed.len()..]
}

/// 检查标签名是否在列表中（不区分大小写）
pub fn tag_in_list(tag: &str, list: &[String]) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(tag))
}
