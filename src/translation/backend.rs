//! 翻译后端接口

use std::sync::Arc;

use crate::translation::error::TranslationResult;
use crate::translation::unit::TranslationRequest;

/// 翻译后端
///
/// `translate` 就地填充请求中各单元的 `target_text`；无法翻译的单元保持 `None`。
/// 重试策略由具体后端自行决定。
pub trait TranslationBackend {
    /// 供日志使用的提供方名称
    fn provider_name(&self) -> &str;

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()>;
}

impl<T: TranslationBackend + ?Sized> TranslationBackend for &T {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()> {
        (**self).translate(request)
    }
}

impl<T: TranslationBackend + ?Sized> TranslationBackend for Box<T> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()> {
        (**self).translate(request)
    }
}

impl<T: TranslationBackend + ?Sized> TranslationBackend for Arc<T> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn translate(&self, request: &mut TranslationRequest) -> TranslationResult<()> {
        (**self).translate(request)
    }
}

/// 共享的后端句柄
pub type SharedBackend = Arc<dyn TranslationBackend + Send + Sync>;
