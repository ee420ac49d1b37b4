//! 候选位置选择器
//!
//! 遍历 DOM，按固定顺序的规则判断每个节点是否承载可翻译文本：
//! 文本节点规则、`input` 元素规则，其余节点一律不参与翻译。

use markup5ever_rcdom::{Handle, NodeData};

use crate::html::{
    get_enclosing_element_name, get_node_attr, get_node_name, get_text_content, is_blank,
    set_node_attr, set_text_content, tag_in_list,
};
use crate::translation::config::FilterOptions;

/// 可以写回译文的位置
#[derive(Debug, Clone)]
pub enum CandidateLocation {
    /// 文本节点
    Text(Handle),
    /// `input` 元素的 `value` 属性
    InputValue(Handle),
}

impl CandidateLocation {
    /// 读取当前文本
    pub fn read(&self) -> Option<String> {
        match self {
            CandidateLocation::Text(node) => get_text_content(node),
            CandidateLocation::InputValue(node) => get_node_attr(node, "value"),
        }
    }

    /// 写入译文
    pub fn write(&self, text: &str) {
        match self {
            CandidateLocation::Text(node) => set_text_content(node, text),
            CandidateLocation::InputValue(node) => set_node_attr(node, "value", Some(text)),
        }
    }

    pub fn node(&self) -> &Handle {
        match self {
            CandidateLocation::Text(node) | CandidateLocation::InputValue(node) => node,
        }
    }
}

/// 选择规则，按声明顺序匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    TextNode,
    InputElement,
    Ineligible,
}

impl SelectionRule {
    /// 节点适用的规则
    pub fn for_node(node: &Handle) -> Self {
        match &node.data {
            NodeData::Text { .. } => SelectionRule::TextNode,
            NodeData::Element { .. }
                if get_node_name(node).is_some_and(|name| name.eq_ignore_ascii_case("input")) =>
            {
                SelectionRule::InputElement
            }
            _ => SelectionRule::Ineligible,
        }
    }
}

/// 一个已选中的位置及其源文本
#[derive(Debug, Clone)]
pub struct SelectedText {
    pub location: CandidateLocation,
    pub text: String,
}

/// 节点选择器
#[derive(Debug, Clone)]
pub struct NodeSelector {
    excluded_tags: Vec<String>,
    input_types: Vec<String>,
}

impl Default for NodeSelector {
    fn default() -> Self {
        Self::new(&FilterOptions::default())
    }
}

impl NodeSelector {
    pub fn new(options: &FilterOptions) -> Self {
        Self {
            excluded_tags: options.excluded_tags.clone(),
            input_types: options.input_types.clone(),
        }
    }

    /// 判断单个节点，返回可翻译的位置及其文本
    pub fn select(&self, node: &Handle) -> Option<SelectedText> {
        match SelectionRule::for_node(node) {
            SelectionRule::TextNode => {
                let text = get_text_content(node)?;
                if is_blank(&text) {
                    return None;
                }

                // 文本节点总有父元素；没有时按不排除处理
                if let Some(parent) = get_enclosing_element_name(node) {
                    if tag_in_list(&parent, &self.excluded_tags) {
                        return None;
                    }
                }

                Some(SelectedText {
                    location: CandidateLocation::Text(node.clone()),
                    text,
                })
            }
            SelectionRule::InputElement => {
                let text = get_node_attr(node, "value")?;
                if is_blank(&text) {
                    return None;
                }

                let input_type = get_node_attr(node, "type").unwrap_or_default();
                if !tag_in_list(input_type.trim(), &self.input_types) {
                    return None;
                }

                Some(SelectedText {
                    location: CandidateLocation::InputValue(node.clone()),
                    text,
                })
            }
            SelectionRule::Ineligible => None,
        }
    }

    /// 按文档顺序收集所有可翻译位置
    pub fn collect(&self, root: &Handle) -> Vec<SelectedText> {
        let mut selected = Vec::new();
        let mut stack = vec![root.clone()];

        while let Some(node) = stack.pop() {
            if let Some(item) = self.select(&node) {
                selected.push(item);
            }

            // 逆序入栈以保持前序遍历顺序
            stack.extend(node.children.borrow().iter().rev().cloned());
        }

        selected
    }
}
