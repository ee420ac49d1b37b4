//! 文档翻译引擎
//!
//! 对一个完整的 DOM 执行一次翻译：
//!
//! 1. 按文档顺序收集所有候选位置
//! 2. 按源文本去重，构建一个翻译请求
//! 3. 调用一次翻译后端
//! 4. 第二遍按源文本查找译文并写回每个位置
//!
//! 同一段文本出现在多个位置时只翻译一次，后端调用量取决于不同文本的数量。

use std::collections::HashMap;

use markup5ever_rcdom::RcDom;

use crate::html::{parse_html, serialize_document};
use crate::translation::backend::TranslationBackend;
use crate::translation::config::FilterOptions;
use crate::translation::error::TranslationResult;
use crate::translation::pipeline::selector::NodeSelector;
use crate::translation::unit::{source_key, TranslationRequest, TranslationUnit};

/// 单次翻译的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// 候选位置数
    pub locations: usize,
    /// 去重后的文本数
    pub distinct: usize,
    /// 实际写回的位置数
    pub applied: usize,
}

/// 翻译引擎
#[derive(Debug, Clone, Default)]
pub struct TranslationEngine {
    selector: NodeSelector,
}

impl TranslationEngine {
    pub fn new(options: &FilterOptions) -> Self {
        Self {
            selector: NodeSelector::new(options),
        }
    }

    /// 就地翻译 DOM
    ///
    /// 后端出错时直接返回错误，此时 DOM 未被修改。
    pub fn translate_dom<B>(
        &self,
        dom: &RcDom,
        backend: &B,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<PassStats>
    where
        B: TranslationBackend + ?Sized,
    {
        let selected = self.selector.collect(&dom.document);
        let mut request = TranslationRequest::from_sources(
            source_lang,
            target_lang,
            selected.iter().map(|item| item.text.as_str()),
        );

        let mut stats = PassStats {
            locations: selected.len(),
            distinct: request.len(),
            applied: 0,
        };

        if request.is_empty() {
            tracing::debug!("文档中没有可翻译的文本");
            return Ok(stats);
        }
        if request.is_same_language() {
            tracing::debug!("源语言与目标语言相同，跳过翻译");
            return Ok(stats);
        }

        tracing::debug!(
            "{} 个位置共 {} 段不同文本，交给 {} 翻译 ({} -> {})",
            stats.locations,
            stats.distinct,
            backend.provider_name(),
            request.source_language,
            request.target_language
        );

        backend.translate(&mut request)?;
        tracing::debug!(
            "{} 返回 {}/{} 段译文",
            backend.provider_name(),
            request.translated_count(),
            request.len()
        );

        let translations: HashMap<&str, &TranslationUnit> = request
            .units
            .iter()
            .map(|unit| (source_key(unit), unit))
            .collect();

        for item in &selected {
            let target = translations
                .get(item.text.as_str())
                .and_then(|unit| unit.target_text.as_deref());

            match target {
                Some(target) => {
                    item.location.write(target);
                    stats.applied += 1;
                }
                None => tracing::trace!("未获得译文，保留原文: {:?}", item.text),
            }
        }

        if stats.applied < stats.locations {
            tracing::debug!(
                "{} 个位置没有译文，保留原文",
                stats.locations - stats.applied
            );
        }

        Ok(stats)
    }

    /// 翻译 HTML 文本并返回序列化结果
    pub fn translate_html<B>(
        &self,
        html: &str,
        backend: &B,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>
    where
        B: TranslationBackend + ?Sized,
    {
        let dom = parse_html(html);
        self.translate_dom(&dom, backend, source_lang, target_lang)?;
        serialize_document(&dom)
    }
}
