//! Response decompression for HTTP content encoding.
//!
//! Feed responses may arrive br/zstd/gzip encoded; these helpers advertise
//! support and unwrap the received body before it reaches the XML layer.

use anyhow::Result;
use async_compression::tokio::bufread::{BrotliDecoder, GzipDecoder, ZstdDecoder};
use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::BodyStream;
use hyper::body::Incoming;
use hyper::{HeaderMap, header, http};
use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

/// Content encodings the response path understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Br,
    Gzip,
    Zstd,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Br => "br",
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Zstd => "zstd",
        }
    }
}

/// Detect the response `Content-Encoding` header and return the ordered chain of encodings.
///
/// The vector is ordered from outermost encoding to innermost (as received). When empty, the
/// payload is identity encoded.
pub fn detect_encodings(headers: &HeaderMap) -> Vec<ContentEncoding> {
    let Some(val) = headers.get(header::CONTENT_ENCODING) else {
        return Vec::new();
    };

    let Ok(raw) = val.to_str() else {
        return Vec::new();
    };

    raw.split(',')
        .filter_map(|token| {
            let enc = token.trim().to_ascii_lowercase();
            Some(match enc.as_str() {
                "br" => ContentEncoding::Br,
                "gzip" => ContentEncoding::Gzip,
                "zstd" | "zst" => ContentEncoding::Zstd,
                "identity" => return None,
                _ => return None,
            })
        })
        .collect()
}

/// Insert an `Accept-Encoding` header (`br, zstd, gzip`) if not already present.
pub fn add_accept_encoding(h: &mut HeaderMap) {
    if !h.contains_key(header::ACCEPT_ENCODING) {
        h.insert(
            header::ACCEPT_ENCODING,
            http::HeaderValue::from_static("br, zstd, gzip"),
        );
    }
}

/// Decompress an aggregated response body according to the detected encoding
/// chain, innermost decoder applied last.
pub async fn decompress_body(body: Incoming, encodings: &[ContentEncoding]) -> Result<Bytes> {
    let stream = BodyStream::new(body)
        .map_ok(|frame| frame.into_data().unwrap_or_default())
        .map_err(std::io::Error::other);
    let reader = StreamReader::new(stream);
    let reader = BufReader::new(reader);
    let mut out = Vec::with_capacity(32 * 1024);
    let mut current: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);

    for encoding in encodings.iter().rev() {
        current = match encoding {
            ContentEncoding::Identity => current,
            ContentEncoding::Br => Box::new(BufReader::new(BrotliDecoder::new(current))),
            ContentEncoding::Gzip => Box::new(BufReader::new(GzipDecoder::new(current))),
            ContentEncoding::Zstd => Box::new(BufReader::new(ZstdDecoder::new(current))),
        };
    }

    let mut decoder = current;
    decoder.read_to_end(&mut out).await?;

    Ok(Bytes::from(out))
}
