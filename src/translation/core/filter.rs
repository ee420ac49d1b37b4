//! 响应流翻译过滤器
//!
//! 过滤器位于响应管道中，持有一个内部缓冲区和下游输出流：
//!
//! - 源语言与目标语言相同时，每次写入原样转发，不缓冲也不解析
//! - 否则缓冲所有字节，直到累计内容中出现 `</html>`（不区分大小写）
//! - 出现结束标记后整体解析、翻译，并一次性写入下游
//!
//! 未结束的文档受 `max_buffered_bytes` 限制，超限后原样输出并转为直通；
//! 流结束时由 [`TranslationFilter::finish`] 按 [`UnterminatedPolicy`] 处理剩余内容。

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::bytes::Regex;

use crate::html::{html_to_dom, serialize_document};
use crate::translation::backend::TranslationBackend;
use crate::translation::config::{FilterOptions, UnterminatedPolicy};
use crate::translation::core::engine::TranslationEngine;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::unit::normalize_language;

const CLOSING_TAG: &str = "</html>";

fn closing_tag_regex() -> &'static Regex {
    static CLOSING_TAG_RE: OnceLock<Regex> = OnceLock::new();
    CLOSING_TAG_RE.get_or_init(|| Regex::new(r"(?i-u)</html>").expect("invalid closing tag regex"))
}

/// 过滤器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// 等待结束标记
    Buffering,
    /// 译文已输出，后续写入原样转发
    Emitted,
    /// 缓冲超限，已原样输出并转为直通
    Bypassed,
    /// 翻译失败，不再输出任何内容
    Failed,
}

/// 响应流翻译过滤器
pub struct TranslationFilter<W, B> {
    sink: W,
    backend: B,
    engine: TranslationEngine,
    source_lang: String,
    target_lang: String,
    options: FilterOptions,
    buffer: Vec<u8>,
    state: FilterState,
}

impl<W, B> TranslationFilter<W, B>
where
    W: Write,
    B: TranslationBackend,
{
    /// 使用默认选项创建过滤器
    pub fn new(sink: W, backend: B, source_lang: &str, target_lang: &str) -> Self {
        Self::with_options(sink, backend, source_lang, target_lang, FilterOptions::default())
    }

    pub fn with_options(
        sink: W,
        backend: B,
        source_lang: &str,
        target_lang: &str,
        options: FilterOptions,
    ) -> Self {
        Self {
            sink,
            backend,
            engine: TranslationEngine::new(&options),
            source_lang: normalize_language(source_lang),
            target_lang: normalize_language(target_lang),
            options,
            buffer: Vec::new(),
            state: FilterState::Buffering,
        }
    }

    /// 源语言与目标语言相同
    pub fn is_passthrough(&self) -> bool {
        self.source_lang == self.target_lang
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// 写入一段响应字节
    ///
    /// 完成文档的那次写入会同步执行翻译，翻译错误从这里返回。
    pub fn write_chunk(&mut self, data: &[u8]) -> TranslationResult<()> {
        if self.is_passthrough() {
            return self.forward(data);
        }

        match self.state {
            FilterState::Emitted | FilterState::Bypassed => self.forward(data),
            FilterState::Failed => Err(TranslationError::ProcessingError(
                "翻译已失败，过滤器不再接受写入".to_string(),
            )),
            FilterState::Buffering => {
                // 结束标记可能跨越两次写入
                let search_from = self.buffer.len().saturating_sub(CLOSING_TAG.len() - 1);
                self.buffer.extend_from_slice(data);

                if closing_tag_regex().is_match(&self.buffer[search_from..]) {
                    return self.emit_translated();
                }

                if self.buffer.len() > self.options.max_buffered_bytes {
                    tracing::warn!(
                        "缓冲 {} 字节仍未遇到 {}，超过上限 {}，原样输出",
                        self.buffer.len(),
                        CLOSING_TAG,
                        self.options.max_buffered_bytes
                    );
                    self.state = FilterState::Bypassed;
                    let buffered = std::mem::take(&mut self.buffer);
                    return self.forward(&buffered);
                }

                Ok(())
            }
        }
    }

    /// 结束输入流并取回下游输出
    pub fn finish(mut self) -> TranslationResult<W> {
        if self.state == FilterState::Buffering && !self.buffer.is_empty() {
            match self.options.unterminated {
                UnterminatedPolicy::PassThrough => {
                    tracing::warn!(
                        "输入结束时未遇到 {}，原样输出 {} 字节",
                        CLOSING_TAG,
                        self.buffer.len()
                    );
                    let buffered = std::mem::take(&mut self.buffer);
                    self.forward(&buffered)?;
                }
                UnterminatedPolicy::Discard => {
                    tracing::warn!(
                        "输入结束时未遇到 {}，丢弃 {} 字节",
                        CLOSING_TAG,
                        self.buffer.len()
                    );
                    self.buffer.clear();
                }
            }
        }

        self.sink.flush()?;
        Ok(self.sink)
    }

    fn emit_translated(&mut self) -> TranslationResult<()> {
        let buffered = std::mem::take(&mut self.buffer);
        let dom = html_to_dom(&buffered, "utf-8");

        let html = self
            .engine
            .translate_dom(&dom, &self.backend, &self.source_lang, &self.target_lang)
            .and_then(|stats| {
                tracing::debug!(
                    "翻译完成: {} 个位置, {} 段文本, {} 处写回",
                    stats.locations,
                    stats.distinct,
                    stats.applied
                );
                serialize_document(&dom)
            });

        let html = match html {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("{} 翻译失败，文档不输出: {}", self.backend.provider_name(), e);
                self.state = FilterState::Failed;
                return Err(e);
            }
        };

        self.state = FilterState::Emitted;
        self.sink.write_all(html.as_bytes())?;
        self.sink.flush()?;

        tracing::info!(
            "输出译文文档 {} 字节 ({} -> {})",
            html.len(),
            self.source_lang,
            self.target_lang
        );
        Ok(())
    }

    fn forward(&mut self, data: &[u8]) -> TranslationResult<()> {
        self.sink.write_all(data)?;
        Ok(())
    }
}

impl<W, B> Write for TranslationFilter<W, B>
where
    W: Write,
    B: TranslationBackend,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
