//! Web 翻译中间件
//!
//! 为 axum 应用提供响应翻译层：请求带有语言参数（默认 `lang`）且响应为
//! `text/html` 时，按帧读取响应体交给 [`TranslationFilter`] 翻译后替换。
//!
//! - 读取量受 `filter.max_buffered_bytes` 限制，超限后已读部分与剩余的流拼接后原样返回
//! - 翻译在阻塞线程池中执行
//! - 翻译服务故障返回 `502 Bad Gateway`，不输出部分文档

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{Body, BodyDataStream, Bytes},
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use futures::{stream, StreamExt};
use tower_http::services::ServeDir;
use url::form_urlencoded;

use crate::translation::unit::normalize_language;
use crate::translation::{
    ErrorCategory, FilterOptions, SharedBackend, TranslationError, TranslationFilter,
    TranslationResult, TranslatorConfig,
};

/// 中间件状态
#[derive(Clone)]
pub struct WebState {
    pub backend: SharedBackend,
    pub source_lang: String,
    pub filter: FilterOptions,
    /// 携带目标语言的查询参数名
    pub lang_param: String,
}

impl WebState {
    pub fn new(backend: SharedBackend, config: &TranslatorConfig) -> Self {
        Self {
            backend,
            source_lang: config.source_lang.clone(),
            filter: config.filter.clone(),
            lang_param: config.web.lang_param.clone(),
        }
    }
}

/// 从查询字符串中取目标语言，空值视为未指定
pub fn target_language(query: Option<&str>, param: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().to_ascii_lowercase().starts_with("text/html"))
}

/// 翻译失败时返回给客户端的状态码
pub fn failure_status(error: &TranslationError) -> StatusCode {
    match error.category() {
        ErrorCategory::Network | ErrorCategory::Service | ErrorCategory::Parsing => {
            StatusCode::BAD_GATEWAY
        }
        ErrorCategory::Configuration
        | ErrorCategory::Output
        | ErrorCategory::Serialization
        | ErrorCategory::Processing => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 按帧读取的响应体
enum CollectedBody {
    /// 在上限内读完
    Complete(Vec<Bytes>),
    /// 超过上限时已读的帧和剩余的流
    Overflow(Vec<Bytes>, BodyDataStream),
}

async fn collect_frames(body: Body, limit: usize) -> Result<CollectedBody, axum::Error> {
    let mut frames = Vec::new();
    let mut total = 0;
    let mut data = body.into_data_stream();

    while let Some(frame) = data.next().await {
        let frame = frame?;
        total += frame.len();
        frames.push(frame);

        if total > limit {
            return Ok(CollectedBody::Overflow(frames, data));
        }
    }

    Ok(CollectedBody::Complete(frames))
}

fn translate_frames(
    state: &WebState,
    target_lang: &str,
    frames: &[Bytes],
) -> TranslationResult<Vec<u8>> {
    let capacity = frames.iter().map(Bytes::len).sum();
    let mut filter = TranslationFilter::with_options(
        Vec::with_capacity(capacity),
        state.backend.clone(),
        &state.source_lang,
        target_lang,
        state.filter.clone(),
    );

    for frame in frames {
        filter.write_chunk(frame)?;
    }
    filter.finish()
}

/// 响应翻译中间件，配合 [`middleware::from_fn_with_state`] 使用
pub async fn translation_layer(
    State(state): State<Arc<WebState>>,
    request: Request,
    next: Next,
) -> Response {
    let target_lang = target_language(request.uri().query(), &state.lang_param);
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(target_lang) = target_lang else {
        return response;
    };
    if !is_html(&response) {
        return response;
    }
    if normalize_language(&target_lang) == normalize_language(&state.source_lang) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let frames = match collect_frames(body, state.filter.max_buffered_bytes).await {
        Ok(CollectedBody::Complete(frames)) => frames,
        Ok(CollectedBody::Overflow(frames, rest)) => {
            tracing::warn!(
                "{} 的响应体超过 {} 字节，原样返回",
                path,
                state.filter.max_buffered_bytes
            );
            let replay = stream::iter(frames.into_iter().map(Ok::<Bytes, axum::Error>));
            return Response::from_parts(parts, Body::from_stream(replay.chain(rest)));
        }
        Err(e) => {
            tracing::error!("读取响应体失败 {}: {}", path, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::debug!("翻译 {} ({} 帧) -> {}", path, frames.len(), target_lang);

    let worker_state = state.clone();
    let result =
        tokio::task::spawn_blocking(move || translate_frames(&worker_state, &target_lang, &frames))
            .await;

    match result {
        Ok(Ok(translated)) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(translated))
        }
        Ok(Err(e)) => {
            tracing::error!("翻译 {} 失败: {}", path, e);
            (failure_status(&e), format!("translation failed: {}", e)).into_response()
        }
        Err(e) => {
            tracing::error!("翻译任务异常退出 {}: {}", path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 给已有路由套上翻译层
pub fn with_translation(router: Router, state: Arc<WebState>) -> Router {
    router.layer(middleware::from_fn_with_state(state, translation_layer))
}

/// 翻译静态目录的路由
pub fn router(state: Arc<WebState>, static_dir: impl AsRef<Path>) -> Router {
    with_translation(
        Router::new().fallback_service(ServeDir::new(static_dir)),
        state,
    )
}
