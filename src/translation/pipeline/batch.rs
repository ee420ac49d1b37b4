//! 长度受限的批次拆分
//!
//! 以 URL 参数传递文本的翻译服务对请求长度和段数都有上限。本模块用贪心的
//! 单次前向扫描把有序文本列表拆成若干子批次：
//!
//! 1. 当前请求从固定前缀开始，依次追加每段文本的编码结果
//! 2. 预先试加下一段，判断再多一段是否会超出长度上限
//! 3. 段数达到上限、到达最后一段、或下一段会超长时，当前批次结束
//!
//! 同时提供空白恢复：很多服务会去掉译文首尾的空白，这里按源文本补回。

use std::ops::Range;

use crate::html::{leading_whitespace, trailing_whitespace};
use crate::translation::unit::TranslationUnit;

/// 批次上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// 单批最多段数
    pub max_segments: usize,
    /// 序列化后请求的最大长度
    pub max_length: usize,
}

/// 一个已规划的子批次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBatch {
    /// 在原列表中的下标范围
    pub range: Range<usize>,
    /// 完整的序列化请求
    pub request: String,
}

/// 长度受限的批次拆分器
pub struct LengthBoundedSplitter<F> {
    base: String,
    limits: BatchLimits,
    encode: F,
}

impl<F> LengthBoundedSplitter<F>
where
    F: Fn(&str) -> String,
{
    /// `base` 是所有子请求共享的前缀，`encode` 给出单段文本追加到请求上的内容
    pub fn new(base: impl Into<String>, limits: BatchLimits, encode: F) -> Self {
        Self {
            base: base.into(),
            limits,
            encode,
        }
    }

    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// 规划子批次，返回的范围按顺序首尾相接并覆盖全部输入
    pub fn plan(&self, sources: &[&str]) -> Vec<PlannedBatch> {
        let mut batches = Vec::new();
        let mut request = self.base.clone();
        let mut batch_start = 0;
        let max_segments = self.limits.max_segments.max(1);

        let encoded: Vec<String> = sources.iter().map(|source| (self.encode)(source)).collect();

        for (i, segment) in encoded.iter().enumerate() {
            request.push_str(segment);

            let is_last = i + 1 == encoded.len();
            let segment_count = i - batch_start + 1;
            let next_overflows = encoded
                .get(i + 1)
                .is_some_and(|next| request.len() + next.len() > self.limits.max_length);

            if segment_count == 1 && request.len() > self.limits.max_length {
                tracing::warn!(
                    "单段文本编码后长度 {} 超过上限 {}，单独发送",
                    request.len(),
                    self.limits.max_length
                );
            }

            if segment_count >= max_segments || is_last || next_overflows {
                batches.push(PlannedBatch {
                    range: batch_start..i + 1,
                    request: std::mem::replace(&mut request, self.base.clone()),
                });
                batch_start = i + 1;
            }
        }

        tracing::debug!("{} 段文本拆分为 {} 个子批次", sources.len(), batches.len());
        batches
    }
}

/// 按源文本恢复译文首尾的空白
///
/// 源文本有开头空白时，用它替换译文的开头空白；结尾同理，两端互不影响。
pub fn restore_whitespace(source: &str, translated: &str) -> String {
    let leading = leading_whitespace(source);
    let trailing = trailing_whitespace(source);

    let mut core = translated;
    if !leading.is_empty() {
        core = core.trim_start();
    }
    if !trailing.is_empty() {
        core = core.trim_end();
    }

    let mut restored = String::with_capacity(leading.len() + core.len() + trailing.len());
    restored.push_str(leading);
    restored.push_str(core);
    restored.push_str(trailing);
    restored
}

/// 对一个子批次中已翻译的单元恢复空白
pub fn restore_batch_whitespace(units: &mut [TranslationUnit]) {
    for unit in units.iter_mut() {
        if let Some(translated) = unit.target_text.take() {
            unit.target_text = Some(restore_whitespace(&unit.source_text, &translated));
        }
    }
}
