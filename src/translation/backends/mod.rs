//! 翻译后端实现

pub mod google;

pub use google::{GoogleTranslationBackend, ReqwestTransport, Transport, TransportResponse};
