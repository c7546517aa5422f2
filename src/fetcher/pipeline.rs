use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use url::Url;

/// How far into the body `<meta>` charset declarations are looked for.
const SNIFF_LEN: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("charset regex")
});

static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).expect("meta regex")
});

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#)
        .expect("http-equiv regex")
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset)?;

    Ok(PageResponse {
        url_final,
        status,
        headers,
        body_raw: body_bytes,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    })
}

/// Header charset, then `<meta charset>`, then `<meta http-equiv>`, then a
/// statistical guess.
fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(charset) = label_from(&CHARSET_REGEX, content_type) {
        return charset;
    }

    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = label_from(&META_CHARSET_REGEX, &search_str)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &search_str))
    {
        return charset;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, body_bytes.len() <= SNIFF_LEN);
    Charset::from_encoding(detector.guess(None, true))
}

fn label_from(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "Failed to decode content with encoding: {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}
