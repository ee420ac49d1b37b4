//! 翻译单元与批次请求
//!
//! 一个翻译单元只由源文本标识，译文不参与比较。去重和查找统一通过
//! [`source_key`] 进行。

use std::collections::HashSet;
use std::fmt;

/// 单条待翻译文本及其译文
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// 源文本
    pub source_text: String,
    /// 译文，后端填充前为 `None`
    pub target_text: Option<String>,
}

impl TranslationUnit {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_text: None,
        }
    }

    pub fn is_translated(&self) -> bool {
        self.target_text.is_some()
    }
}

impl fmt::Display for TranslationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {}",
            self.source_text,
            self.target_text.as_deref().unwrap_or("")
        )
    }
}

/// 翻译单元的标识键
pub fn source_key(unit: &TranslationUnit) -> &str {
    &unit.source_text
}

/// 一次发往翻译后端的请求
///
/// 语言代码在构造时统一转为小写；`units` 中不包含重复的源文本。
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub source_language: String,
    pub target_language: String,
    pub units: Vec<TranslationUnit>,
}

impl TranslationRequest {
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: normalize_language(source_language),
            target_language: normalize_language(target_language),
            units: Vec::new(),
        }
    }

    /// 从源文本序列构建请求，按首次出现的顺序去重
    pub fn from_sources<I, S>(source_language: &str, target_language: &str, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::new(source_language, target_language);
        let mut seen: HashSet<String> = HashSet::new();

        for source in sources {
            let unit = TranslationUnit::new(source);
            if seen.insert(source_key(&unit).to_owned()) {
                request.units.push(unit);
            }
        }

        request
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 已获得译文的单元数量
    pub fn translated_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_translated()).count()
    }

    pub fn is_same_language(&self) -> bool {
        self.source_language == self.target_language
    }
}

/// 语言代码规范化
pub fn normalize_language(code: &str) -> String {
    code.trim().to_lowercase()
}
