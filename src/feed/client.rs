use anyhow::{Result, anyhow};
use bytes::Bytes;
use futures::{StreamExt, stream::FuturesOrdered};
use http_body_util::Full;
use hyper::{HeaderMap, Method, Request, Response, Uri, header};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{Duration, timeout};

use crate::common::compression::{
    ContentEncoding, add_accept_encoding, decompress_body, detect_encodings,
};
use crate::common::http::{HyperClient, build_hyper_client};
use crate::feed::types::BatchItem;

/// Protocol version header sent with every request.
const GDATA_VERSION_HEADER: &str = "GData-Version";

/// Transport for GData Atom feeds.
///
/// Carries a base URL and an optional prebuilt `Authorization` header value;
/// obtaining that value (OAuth or otherwise) is the caller's business. Every
/// request is versioned with `GData-Version: 2` and response bodies are
/// transparently decompressed (br/zstd/gzip).
#[derive(Clone)]
pub struct FeedClient {
    base: Uri,
    client: HyperClient,
    auth_header: Option<header::HeaderValue>,
    default_timeout: Duration,
}

impl FeedClient {
    /// Create a new client from a **base URL** (feed collection) and an
    /// optional ready-to-send `Authorization` value.
    ///
    /// The base may be `https://` **or** `http://` (both are supported by the connector).
    pub fn new(base_url: &str, auth_header: Option<&str>) -> Result<Self> {
        let client = build_hyper_client()?;

        let base: Uri = base_url.parse()?;
        let auth_header = auth_header
            .map(header::HeaderValue::from_str)
            .transpose()?;

        Ok(Self {
            base,
            client,
            auth_header,
            default_timeout: Duration::from_secs(20),
        })
    }

    pub fn build_uri(&self, path: &str) -> Result<Uri> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.parse()?);
        }

        let mut parts = self.base.clone().into_parts();
        let existing_path = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path())
            .unwrap_or("/");

        let (path_only, query) = if let Some((p, q)) = path.split_once('?') {
            (p, Some(q))
        } else {
            (path, None)
        };

        let mut combined = if path_only.is_empty() {
            existing_path.to_string()
        } else if path_only.starts_with('/') {
            path_only.to_string()
        } else {
            let mut base = existing_path.trim_end_matches('/').to_string();
            if base.is_empty() {
                base.push('/');
            }
            if !base.ends_with('/') {
                base.push('/');
            }
            base.push_str(path_only);
            base
        };

        if combined.is_empty() {
            combined.push('/');
        }

        let path_and_query = if let Some(q) = query {
            format!("{}?{}", combined, q).parse()?
        } else {
            combined.parse()?
        };

        parts.path_and_query = Some(path_and_query);
        Ok(Uri::from_parts(parts)?)
    }

    fn normalize_decompressed_headers(
        &self,
        headers: &mut HeaderMap,
        encodings: &[ContentEncoding],
        body_len: usize,
    ) {
        if encodings.is_empty() {
            return;
        }

        headers.remove(header::CONTENT_ENCODING);
        if let Ok(value) = header::HeaderValue::from_str(&body_len.to_string()) {
            headers.insert(header::CONTENT_LENGTH, value);
        } else {
            headers.remove(header::CONTENT_LENGTH);
        }
    }

    /// Generic **aggregated send** with automatic decompression (br/zstd/gzip).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body_bytes: Option<Bytes>,
        per_req_timeout: Option<Duration>,
    ) -> Result<Response<Bytes>> {
        let uri = self.build_uri(path)?;
        tracing::debug!(%method, %uri, "sending feed request");

        let mut headers = headers;
        add_accept_encoding(&mut headers);

        let mut req_builder = Request::builder().method(method).uri(uri);

        if let Some(ref auth_header) = self.auth_header {
            req_builder = req_builder.header(header::AUTHORIZATION, auth_header);
        }
        req_builder = req_builder.header(
            GDATA_VERSION_HEADER,
            header::HeaderValue::from_static("2"),
        );

        if body_bytes.is_some() && !headers.contains_key(header::CONTENT_TYPE) {
            req_builder = req_builder.header(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/atom+xml; charset=utf-8"),
            );
        }

        for (k, v) in headers.iter() {
            req_builder = req_builder.header(k, v);
        }

        let req = match body_bytes {
            Some(b) => req_builder.body(Full::new(b))?,
            None => req_builder.body(Full::new(Bytes::new()))?,
        };

        let fut = self.client.request(req);
        let resp = timeout(per_req_timeout.unwrap_or(self.default_timeout), fut)
            .await
            .map_err(|_| anyhow!("request timed out"))??;

        let encodings = detect_encodings(resp.headers());
        let (mut parts, body) = resp.into_parts();

        let decompressed = decompress_body(body, &encodings).await?;
        self.normalize_decompressed_headers(&mut parts.headers, &encodings, decompressed.len());

        Ok(Response::from_parts(parts, decompressed))
    }

    // ----------- Feed verbs -----------

    /// `GET` a feed or entry document, fully aggregated and decompressed.
    pub async fn get_xml(&self, path: &str) -> Result<Response<Bytes>> {
        self.send(Method::GET, path, HeaderMap::new(), None, None)
            .await
    }

    /// `POST` an entry body to a collection (create).
    pub async fn post_entry(&self, path: &str, xml_body: &str) -> Result<Response<Bytes>> {
        self.send(
            Method::POST,
            path,
            HeaderMap::new(),
            Some(Bytes::from(xml_body.to_owned())),
            None,
        )
        .await
    }

    /// Conditional `PUT` of an entry body to its edit URI, guarded by `If-Match`.
    pub async fn put_entry(
        &self,
        edit_uri: &str,
        etag: &str,
        xml_body: &str,
    ) -> Result<Response<Bytes>> {
        let mut h = HeaderMap::new();
        h.insert(header::IF_MATCH, header::HeaderValue::from_str(etag)?);
        self.send(
            Method::PUT,
            edit_uri,
            h,
            Some(Bytes::from(xml_body.to_owned())),
            None,
        )
        .await
    }

    /// Conditional `DELETE` of an entry at its edit URI, guarded by `If-Match`.
    pub async fn delete_entry(&self, edit_uri: &str, etag: &str) -> Result<Response<Bytes>> {
        let mut h = HeaderMap::new();
        h.insert(header::IF_MATCH, header::HeaderValue::from_str(etag)?);
        self.send(Method::DELETE, edit_uri, h, None, None).await
    }

    /// Extract the `ETag` from a response header map, if present.
    pub fn etag_from_headers(headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    /// Run many `GET`s concurrently with a semaphore-bound concurrency limit,
    /// preserving input order in the output. Useful for paged feeds.
    pub async fn get_many(
        &self,
        paths: impl IntoIterator<Item = String>,
        max_concurrency: usize,
    ) -> Vec<BatchItem<Response<Bytes>>> {
        let sem = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let mut tasks = FuturesOrdered::new();

        for path in paths {
            let sem_clone = sem.clone();
            let this = self.clone();
            tasks.push_back(async move {
                let _permit: OwnedSemaphorePermit =
                    sem_clone.acquire_owned().await.expect("semaphore closed");
                let res = this
                    .send(Method::GET, &path, HeaderMap::new(), None, None)
                    .await;
                BatchItem { path, result: res }
            });
        }

        let mut out = Vec::new();
        while let Some(item) = tasks.next().await {
            out.push(item);
        }
        out
    }
}
