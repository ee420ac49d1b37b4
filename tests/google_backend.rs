//! Google 翻译后端集成测试
//!
//! 通过可编排的传输层验证子批次拆分、下标对齐、空白恢复和错误处理

use autoweb_translator::translation::{
    GoogleConfig, GoogleTranslationBackend, TranslationBackend, TranslationError,
    TranslationFilter, TranslationRequest,
};

mod common {
    include!("common/mod.rs");
}

use common::{google_config, query_values, FakeTransport};

fn targets(request: &TranslationRequest) -> Vec<Option<String>> {
    request
        .units
        .iter()
        .map(|unit| unit.target_text.clone())
        .collect()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn test_request_carries_languages_and_key() {
    let transport = FakeTransport::new();
    transport.push_translations(&["Hallo Welt"]);
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["Hello world"]);
    backend.translate(&mut request).unwrap();

    let urls = transport.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("https://translate.example.com/v2?"));
    assert_eq!(query_values(&urls[0], "key"), vec!["test-key"]);
    assert_eq!(query_values(&urls[0], "source"), vec!["en"]);
    assert_eq!(query_values(&urls[0], "target"), vec!["de"]);
    assert_eq!(query_values(&urls[0], "format"), vec!["text"]);
    assert_eq!(query_values(&urls[0], "q"), vec!["Hello world"]);
    assert_eq!(targets(&request), some(&["Hallo Welt"]));
}

#[test]
fn test_segment_limit_splits_in_order() {
    let transport = FakeTransport::new();
    transport.push_translations(&["A", "B"]);
    transport.push_translations(&["C", "D"]);
    transport.push_translations(&["E"]);

    let config = GoogleConfig {
        max_segments: 2,
        ..google_config()
    };
    let backend = GoogleTranslationBackend::with_transport(config, &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a", "b", "c", "d", "e"]);
    backend.translate(&mut request).unwrap();

    assert_eq!(
        transport.queries(),
        vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]
    );
    assert_eq!(targets(&request), some(&["A", "B", "C", "D", "E"]));
}

#[test]
fn test_url_length_limit_splits_requests() {
    let transport = FakeTransport::new();
    transport.push_translations(&["eins"]);
    transport.push_translations(&["zwei"]);
    transport.push_translations(&["drei"]);

    // 前缀 77 字节，每段 "&q=" 加 10 字节文本
    let config = GoogleConfig {
        max_url_length: 100,
        ..google_config()
    };
    let backend = GoogleTranslationBackend::with_transport(config, &transport).unwrap();

    let mut request =
        TranslationRequest::from_sources("en", "de", ["one-------", "two-------", "three-----"]);
    backend.translate(&mut request).unwrap();

    let urls = transport.urls();
    assert_eq!(urls.len(), 3);
    for url in &urls {
        assert!(url.len() <= 100, "{} is {} bytes", url, url.len());
    }
    assert_eq!(targets(&request), some(&["eins", "zwei", "drei"]));
}

#[test]
fn test_whitespace_restored_from_source() {
    let transport = FakeTransport::new();
    transport.push_translations(&["Hallo", "Welt", "  Tschüss"]);
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut request =
        TranslationRequest::from_sources("en", "de", [" Hello ", "\tWorld", "\n bye"]);
    backend.translate(&mut request).unwrap();

    assert_eq!(targets(&request), some(&[" Hallo ", "\tWelt", "\n Tschüss"]));
}

#[test]
fn test_short_response_leaves_tail_untranslated() {
    let transport = FakeTransport::new();
    transport.push_translations(&["A"]);
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a", "b"]);
    backend.translate(&mut request).unwrap();

    assert_eq!(targets(&request), vec![Some("A".to_string()), None]);
}

#[test]
fn test_empty_request_sends_nothing() {
    let transport = FakeTransport::new();
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut request = TranslationRequest::new("en", "de");
    backend.translate(&mut request).unwrap();

    assert!(transport.urls().is_empty());
}

#[test]
fn test_failed_batch_stops_later_batches() {
    let transport = FakeTransport::new();
    transport.push_translations(&["A"]);
    transport.push_status(500, "Internal Server Error");
    transport.push_translations(&["C"]);

    let config = GoogleConfig {
        max_segments: 1,
        ..google_config()
    };
    let backend = GoogleTranslationBackend::with_transport(config, &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a", "b", "c"]);
    let result = backend.translate(&mut request);

    assert!(matches!(
        result,
        Err(TranslationError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(transport.urls().len(), 2);
}

#[test]
fn test_retryable_error_is_retried() {
    let transport = FakeTransport::new();
    transport.push_network_error();
    transport.push_translations(&["A"]);

    let config = GoogleConfig {
        max_retries: 1,
        ..google_config()
    };
    let backend = GoogleTranslationBackend::with_transport(config, &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a"]);
    backend.translate(&mut request).unwrap();

    let urls = transport.urls();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0], urls[1]);
    assert_eq!(targets(&request), some(&["A"]));
}

#[test]
fn test_no_retry_by_default() {
    let transport = FakeTransport::new();
    transport.push_network_error();
    transport.push_translations(&["A"]);
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a"]);
    let result = backend.translate(&mut request);

    assert!(matches!(result, Err(TranslationError::NetworkError(_))));
    assert_eq!(transport.urls().len(), 1);
}

#[test]
fn test_client_error_is_not_retried() {
    let transport = FakeTransport::new();
    transport.push_status(403, "Forbidden");

    let config = GoogleConfig {
        max_retries: 3,
        ..google_config()
    };
    let backend = GoogleTranslationBackend::with_transport(config, &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a"]);
    let result = backend.translate(&mut request);

    assert!(matches!(
        result,
        Err(TranslationError::HttpStatus { status: 403, .. })
    ));
    assert_eq!(transport.urls().len(), 1);
}

#[test]
fn test_malformed_bodies() {
    let transport = FakeTransport::new();
    transport.push_body(200, "{}");
    transport.push_translations(&["A", "B"]);
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut request = TranslationRequest::from_sources("en", "de", ["a"]);
    assert!(matches!(
        backend.translate(&mut request),
        Err(TranslationError::MalformedResponse(_))
    ));

    // 译文多于请求
    let mut request = TranslationRequest::from_sources("en", "de", ["a"]);
    assert!(matches!(
        backend.translate(&mut request),
        Err(TranslationError::MalformedResponse(_))
    ));
}

#[test]
fn test_filter_end_to_end() {
    let transport = FakeTransport::new();
    transport.push_translations(&["Hallo", "Hallo", "Los"]);
    let backend = GoogleTranslationBackend::with_transport(google_config(), &transport).unwrap();

    let mut filter = TranslationFilter::new(Vec::new(), backend, "en", "de");
    filter
        .write_chunk(b"<html><body><p> Hello </p><p>Hello</p><p>Hello</p>")
        .unwrap();
    filter
        .write_chunk(br#"<input type="button" value="Go"></body></html>"#)
        .unwrap();

    let output = String::from_utf8(filter.finish().unwrap()).unwrap();
    assert_eq!(
        output,
        r#"<html><head></head><body><p> Hallo </p><p>Hallo</p><p>Hallo</p><input type="button" value="Los"></body></html>"#
    );
    assert_eq!(transport.queries(), vec![vec![" Hello ", "Hello", "Go"]]);
}
