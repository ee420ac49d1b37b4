use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::translation::error::{TranslationError, TranslationResult};

/// 序列化文档
///
/// 与 `parse_html` 保持一致，按关闭脚本模式输出 `<noscript>` 内容。
pub fn serialize_document(dom: &RcDom) -> TranslationResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    let opts = SerializeOpts {
        scripting_enabled: false,
        ..Default::default()
    };

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, opts)
        .map_err(|e| TranslationError::SerializationError(e.to_string()))?;

    String::from_utf8(buf).map_err(|e| TranslationError::SerializationError(e.to_string()))
}
