//! HTTP传输层
//!
//! client通过[`Transport`]发送请求，默认实现为`reqwest::Client`，测试或需要自定义连接行为时可以替换。
//! 传输层只负责一次请求/响应，不做重试。

use super::error::Error;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};
use url::Url;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<ByteStream>,
}

impl Debug for TransportRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl Debug for TransportResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, Error>;
}

#[async_trait::async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, Error> {
        let mut builder = self
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(reqwest::Body::wrap_stream(body));
        }
        let resp = builder.send().await?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes_stream().map(|item| item.map_err(Error::from));
        Ok(TransportResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}

/// 默认的reqwest client，header名称按首字母大写发送
///
/// `http::HeaderName`只保存小写名称，所以实际发出的是`X-Akamai-Acs-Action`、
/// `X-Akamai-Acs-Auth-Data`、`X-Akamai-Acs-Auth-Sign`，而不是`X-Akamai-ACS-*`。
/// HTTP header名称不区分大小写，服务端可以正常处理；如果中间的代理对header名称大小写敏感，
/// 需要通过[`Transport`]传入自己的实现
pub(crate) fn default_http_client() -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .http1_title_case_headers()
        .build()?;
    Ok(client)
}
