use encoding_rs::{Encoding, UTF_8};
use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// 将 HTML 字节转换为 DOM
///
/// 未知的编码标签按 UTF-8 处理，解码时会识别 BOM。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> RcDom {
    let encoding = Encoding::for_label(document_encoding.as_bytes()).unwrap_or(UTF_8);
    let (text, used_encoding, had_errors) = encoding.decode(data);

    if had_errors {
        tracing::debug!("文档中存在无法按 {} 解码的字节，已替换", used_encoding.name());
    }

    parse_html(&text)
}

/// 将 HTML 文本解析为 DOM
///
/// 关闭脚本模式解析，`<noscript>` 的内容会成为普通节点而不是原始文本。
/// `<template>` 的内容会并入该元素的子节点，遍历和序列化都能看到它。
pub fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts).one(html);
    inline_template_contents(&dom.document);
    dom
}

/// 把 `<template>` 的文档片段移到模板元素的 `children` 下
///
/// rcdom 把模板内容放在单独的片段节点中，序列化时不会输出。
fn inline_template_contents(root: &Handle) {
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if let NodeData::Element {
            template_contents, ..
        } = &node.data
        {
            let fragment = template_contents.borrow_mut().take();
            if let Some(fragment) = fragment {
                let moved: Vec<Handle> = fragment.children.borrow_mut().drain(..).collect();
                for child in &moved {
                    child.parent.set(Some(Rc::downgrade(&node)));
                }
                node.children.borrow_mut().extend(moved);
            }
        }

        stack.extend(node.children.borrow().iter().cloned());
    }
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| (&*attr.name.local).eq_ignore_ascii_case(attr_name))
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取父节点
///
/// 父指针存放在 `Cell` 中，读取后需要放回原处。
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// 获取最近的外层元素名称（小写）
pub fn get_enclosing_element_name(node: &Handle) -> Option<String> {
    let mut current = get_parent_node(node);

    while let Some(parent) = current {
        if let Some(name) = get_node_name(&parent) {
            return Some(name.to_ascii_lowercase());
        }
        current = get_parent_node(&parent);
    }

    None
}

/// 读取文本节点内容
pub fn get_text_content(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// 替换文本节点内容，非文本节点不做处理
pub fn set_text_content(node: &Handle, text: &str) {
    if let NodeData::Text { contents } = &node.data {
        *contents.borrow_mut() = StrTendril::from_slice(text);
    }
}

/// 设置节点属性
///
/// `attr_value` 为 `None` 时删除该属性。
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<&str>) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::{namespace_url, ns, LocalName};

    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs_mut = attrs.borrow_mut();

        match attr_value {
            Some(value) => {
                let mut found_existing_attr = false;

                for attr in attrs_mut
                    .iter_mut()
                    .filter(|attr| (&*attr.name.local).eq_ignore_ascii_case(attr_name))
                {
                    attr.value = StrTendril::from_slice(value);
                    found_existing_attr = true;
                }

                if !found_existing_attr {
                    attrs_mut.push(Attribute {
                        name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                        value: StrTendril::from_slice(value),
                    });
                }
            }
            None => attrs_mut.retain(|attr| !(&*attr.name.local).eq_ignore_ascii_case(attr_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(dom: &RcDom, tag: &str) -> Handle {
        let mut stack = vec![dom.document.clone()];
        while let Some(node) = stack.pop() {
            if get_node_name(&node) == Some(tag) {
                return node;
            }
            stack.extend(node.children.borrow().iter().rev().cloned());
        }
        panic!("no <{tag}> element in document");
    }

    #[test]
    fn parent_pointer_survives_lookup() {
        let dom = parse_html("<html><body><p>hello</p></body></html>");
        let p = first_element(&dom, "p");
        let text = p.children.borrow()[0].clone();

        let first = get_parent_node(&text).expect("text has a parent");
        let second = get_parent_node(&text).expect("parent is still reachable");
        assert_eq!(get_node_name(&first), Some("p"));
        assert_eq!(get_node_name(&second), Some("p"));
    }

    #[test]
    fn enclosing_element_name_is_lowercase() {
        let dom = parse_html("<html><body><SCRIPT>var a = 1;</SCRIPT></body></html>");
        let script = first_element(&dom, "script");
        let text = script.children.borrow()[0].clone();

        assert_eq!(get_enclosing_element_name(&text).as_deref(), Some("script"));
    }

    #[test]
    fn text_content_round_trip() {
        let dom = parse_html("<html><body><p>hello</p></body></html>");
        let p = first_element(&dom, "p");
        let text = p.children.borrow()[0].clone();

        assert_eq!(get_text_content(&text).as_deref(), Some("hello"));
        set_text_content(&text, "hallo");
        assert_eq!(get_text_content(&text).as_deref(), Some("hallo"));
        assert_eq!(get_text_content(&p), None);
    }

    #[test]
    fn set_attr_replaces_adds_and_removes() {
        let dom = parse_html(r#"<html><body><input type="submit" value="go"></body></html>"#);
        let input = first_element(&dom, "input");

        set_node_attr(&input, "value", Some("los"));
        assert_eq!(get_node_attr(&input, "value").as_deref(), Some("los"));

        set_node_attr(&input, "title", Some("tip"));
        assert_eq!(get_node_attr(&input, "title").as_deref(), Some("tip"));

        set_node_attr(&input, "title", None);
        assert_eq!(get_node_attr(&input, "title"), None);
    }

    #[test]
    fn attr_lookup_ignores_case() {
        let dom = parse_html(r#"<html><body><input type="reset" value="go"></body></html>"#);
        let input = first_element(&dom, "input");

        assert_eq!(get_node_attr(&input, "VALUE").as_deref(), Some("go"));
        set_node_attr(&input, "Value", Some("los"));
        assert_eq!(get_node_attr(&input, "value").as_deref(), Some("los"));
        set_node_attr(&input, "TYPE", None);
        assert_eq!(get_node_attr(&input, "type"), None);
    }

    #[test]
    fn template_contents_become_children() {
        let dom = parse_html(
            "<html><body><template><p>inside</p><template>deep</template></template></body></html>",
        );
        let template = first_element(&dom, "template");
        let p = first_element(&dom, "p");
        let text = p.children.borrow()[0].clone();

        assert_eq!(template.children.borrow().len(), 2);
        assert_eq!(get_text_content(&text).as_deref(), Some("inside"));
        assert_eq!(
            get_parent_node(&p).and_then(|parent| get_node_name(&parent).map(str::to_string)),
            Some("template".to_string())
        );
    }

    #[test]
    fn unknown_encoding_label_falls_back_to_utf8() {
        let dom = html_to_dom("<html><body>grüß</body></html>".as_bytes(), "no-such-charset");
        let body = first_element(&dom, "body");
        let text = body.children.borrow()[0].clone();

        assert_eq!(get_text_content(&text).as_deref(), Some("grüß"));
    }
}
