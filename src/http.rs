// ABOUTME: Minimal HTTP/1 client over a plain TCP connection.
// ABOUTME: Shared by the health checker and the Caddy admin client.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::net::TcpStream;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("HTTP error talking to {url}: {source}")]
    Protocol { url: String, source: hyper::Error },

    #[error("failed to build request for {url}: {source}")]
    Build {
        url: String,
        source: hyper::http::Error,
    },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

/// Status and full body of a response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Response {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct Outgoing<'a> {
    pub method: Method,
    pub url: &'a str,
    pub content_type: Option<&'a str>,
    pub body: Bytes,
}

impl<'a> Outgoing<'a> {
    pub fn get(url: &'a str) -> Self {
        Self {
            method: Method::GET,
            url,
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn post(url: &'a str, content_type: &'a str, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::POST,
            url,
            content_type: Some(content_type),
            body: body.into(),
        }
    }
}

/// Send a request and read the whole response, bounded by `timeout`.
pub async fn send(request: Outgoing<'_>, timeout: Duration) -> Result<Response, HttpError> {
    let url = request.url.to_string();
    tokio::time::timeout(timeout, exchange(request))
        .await
        .map_err(|_| HttpError::Timeout { url, timeout })?
}

async fn exchange(request: Outgoing<'_>) -> Result<Response, HttpError> {
    let url = request.url;
    let (addr, path) = split_url(url)?;

    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| HttpError::Connect {
            addr: addr.clone(),
            source,
        })?;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|source| HttpError::Protocol {
            url: url.to_string(),
            source,
        })?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(error = %e, "http connection closed with error");
        }
    });

    let mut builder = Request::builder()
        .method(request.method)
        .uri(path)
        .header("host", &addr)
        .header("user-agent", concat!("slick/", env!("CARGO_PKG_VERSION")));
    if let Some(content_type) = request.content_type {
        builder = builder.header("content-type", content_type);
    }
    let req = builder
        .body(Full::new(request.body))
        .map_err(|source| HttpError::Build {
            url: url.to_string(),
            source,
        })?;

    let resp = sender
        .send_request(req)
        .await
        .map_err(|source| HttpError::Protocol {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|source| HttpError::Protocol {
            url: url.to_string(),
            source,
        })?
        .to_bytes();

    Ok(Response { status, body })
}

/// Split an `http://` URL into a `host:port` address and an origin-form path.
fn split_url(url: &str) -> Result<(String, String), HttpError> {
    let invalid = |reason: &str| HttpError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let uri: Uri = url.parse().map_err(|_| invalid("unparseable"))?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => return Err(invalid(&format!("unsupported scheme {other}"))),
        None => return Err(invalid("missing scheme")),
    }

    let host = uri.host().ok_or_else(|| invalid("missing host"))?;
    let port = uri.port_u16().unwrap_or(80);
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .filter(|p| !p.is_empty())
        .unwrap_or("/");

    Ok((format!("{host}:{port}"), path.to_string()))
}
