// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 client over TCP with bearer-token authentication.
//!
//! One connection per request (`Connection: close`). Every request is bounded
//! by the configured timeout; non-2xx responses become
//! [`TransportError::Status`].

use crate::credential::Credential;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Backend unreachable, timed out, or answered with a non-success status.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid backend address {0:?}")]
    InvalidAddress(String),
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid HTTP response: {0}")]
    InvalidResponse(String),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("push channel: {0}")]
    WebSocket(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

hc_core::simple_display! {
    Method {
        Get => "GET",
        Post => "POST",
        Put => "PUT",
        Delete => "DELETE",
    }
}

/// Status line and body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Largest response body accepted from the backend.
pub const DEFAULT_MAX_BODY: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpClient {
    /// `host:port` to connect to
    addr: String,
    credential: Credential,
    timeout: Duration,
    max_body: usize,
}

impl HttpClient {
    /// `base_url` is `host:port`, optionally prefixed with `http://`.
    pub fn new(
        base_url: &str,
        credential: Credential,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        Ok(Self { addr: parse_addr(base_url)?, credential, timeout, max_body: DEFAULT_MAX_BODY })
    }

    pub fn with_max_body(mut self, bytes: usize) -> Self {
        self.max_body = bytes;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let body = self.send(Method::Get, path, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let payload = serde_json::to_string(body)?;
        let body = self.send(method, path, Some(&payload)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request and return the body of a 2xx response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&str>,
    ) -> Result<String, TransportError> {
        let request = build_request(method, &self.addr, path, &self.credential, body);
        let response = tokio::time::timeout(self.timeout, self.round_trip(&request))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;

        tracing::debug!(%method, path, status = response.status, "backend response");
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(TransportError::Status { status: response.status, body: response.body })
        }
    }

    async fn round_trip(&self, request: &str) -> Result<HttpResponse, TransportError> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| TransportError::Connect { addr: self.addr.clone(), source })?;
        stream.write_all(request.as_bytes()).await?;

        let mut reader = BufReader::new(&mut stream);
        read_response(&mut reader, self.max_body).await
    }
}

/// Strip an optional `http://` scheme and trailing slash.
pub fn parse_addr(base_url: &str) -> Result<String, TransportError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let addr = trimmed.strip_prefix("http://").unwrap_or(trimmed);
    if addr.is_empty() || addr.contains("://") || addr.contains('/') {
        return Err(TransportError::InvalidAddress(base_url.to_string()));
    }
    Ok(addr.to_string())
}

pub(crate) fn build_request(
    method: Method,
    host: &str,
    path: &str,
    credential: &Credential,
    body: Option<&str>,
) -> String {
    let mut request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {host}\r\nAuthorization: {}\r\nAccept: application/json\r\nConnection: close\r\n",
        credential.header_value()
    );
    match body {
        Some(body) => {
            request.push_str(&format!(
                "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            ));
        }
        None => request.push_str("Content-Length: 0\r\n\r\n"),
    }
    request
}

/// Read a full response: status line, headers, then a body framed by
/// `Content-Length`, chunked encoding, or connection close. Bodies larger
/// than `max_body` are rejected before anything is allocated for them.
pub(crate) async fn read_response<R>(
    reader: &mut R,
    max_body: usize,
) -> Result<HttpResponse, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut status_line = String::new();
    reader.read_line(&mut status_line).await?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| TransportError::InvalidResponse(format!("status line {status_line:?}")))?;

    let mut content_length = None;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = Some(value.parse::<usize>().map_err(|_| {
                TransportError::InvalidResponse(format!("content-length {value:?}"))
            })?);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = value.eq_ignore_ascii_case("chunked");
        }
    }

    let bytes = if chunked {
        read_chunked(reader, max_body).await?
    } else if let Some(len) = content_length {
        if len > max_body {
            return Err(too_large(max_body));
        }
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).await?;
        buf
    } else {
        let mut buf = Vec::new();
        let limit = u64::try_from(max_body).unwrap_or(u64::MAX).saturating_add(1);
        (&mut *reader).take(limit).read_to_end(&mut buf).await?;
        if buf.len() > max_body {
            return Err(too_large(max_body));
        }
        buf
    };

    let body = String::from_utf8(bytes)
        .map_err(|_| TransportError::InvalidResponse("body is not UTF-8".into()))?;
    Ok(HttpResponse { status, body })
}

fn too_large(max_body: usize) -> TransportError {
    TransportError::InvalidResponse(format!("body exceeds {max_body} bytes"))
}

async fn read_chunked<R>(reader: &mut R, max_body: usize) -> Result<Vec<u8>, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).await?;
        let size_hex = size_line.trim().split(';').next().unwrap_or("");
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| TransportError::InvalidResponse(format!("chunk size {size_hex:?}")))?;
        if size == 0 {
            // Trailers, then the final CRLF.
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await? == 0 || line.trim().is_empty() {
                    break;
                }
            }
            return Ok(body);
        }
        let start = body.len();
        let end = start
            .checked_add(size)
            .filter(|end| *end <= max_body)
            .ok_or_else(|| too_large(max_body))?;
        body.resize(end, 0);
        reader.read_exact(&mut body[start..]).await?;
        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf).await?;
    }
}

/// Percent-encode a query component.
pub fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Percent-encode a single path segment.
pub fn encode_segment(value: &str) -> String {
    encode_query(value)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
