//! Akamai NetStorage sdk
//!
//! NetStorage HTTP API文档：<https://techdocs.akamai.com/netstorage-usage/reference/api>
//!
//! 注意：
//!
//! - 每个请求都使用账户的`key`计算签名，签名中包含当前时间戳和随机数，不会缓存
//! - 所有api都不会自动重试，也不会解释响应的状态码，由调用者根据[`Response::status`]判断
//! - 每个api都可以通过`.cancellation(token)`传入[`CancellationToken`]，取消后返回[`Error::Cancelled`]
//!
//! # Example
//! ```no_run
//! # async fn run() -> Result<(), ns_sdk::netstorage::Error> {
//! use ns_sdk::netstorage::Client;
//!
//! let client = Client::builder()
//!     .hostname("example-nsu.akamaihd.net")
//!     .key_name("key-name")
//!     .key("secret-key")
//!     .build()?;
//!
//! let resp = client.dir("/123456/dir").send().await?;
//! println!("{}: {}", resp.status, resp.body);
//! # Ok(())
//! # }
//! ```

pub mod auth_source;
mod dispatch;
mod error;
mod operation;
mod ops;
mod resolve;
pub mod sign;
pub mod transport;

pub use dispatch::Response;
pub use error::{ArgumentError, Error};
pub use tokio_util::sync::CancellationToken;

use crate::credentials::{Credentials, Scheme};
use auth_source::{AuthSource, SystemAuthSource};
use bon::bon;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use transport::{Transport, default_http_client};

/// 账户配置，可以从toml、json等格式反序列化
#[derive(Deserialize, Clone)]
pub struct Config {
    /// 形如`example-nsu.akamaihd.net`
    pub hostname: String,
    pub key_name: String,
    pub key: String,
    #[serde(default = "default_ssl")]
    pub ssl: bool,
}

fn default_ssl() -> bool {
    true
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("hostname", &self.hostname)
            .field("key_name", &self.key_name)
            .field("key", &"***")
            .field("ssl", &self.ssl)
            .finish()
    }
}

/// 构建后不可变，可以在多个任务之间共享（例如放到`Arc`中）
pub struct Client {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    auth_source: Arc<dyn AuthSource>,
}

/// 创建NetStorage客户端
#[bon]
impl Client {
    /// - `hostname`、`key_name`、`key`：NetStorage账户页面上的信息，都不能为空；
    ///   `key`按原始字节使用，`&str`、`String`、`&[u8]`都可以传入
    /// - `ssl`：默认为`true`，使用https
    /// - `transport`：默认使用`reqwest::Client`
    /// - `auth_source`：签名使用的时间戳和随机数来源，默认为[`SystemAuthSource`]
    #[builder(on(String, into))]
    pub fn new(
        hostname: String,
        key_name: String,
        #[builder(into)] key: Vec<u8>,
        #[builder(default = true)] ssl: bool,
        transport: Option<Arc<dyn Transport>>,
        auth_source: Option<Arc<dyn AuthSource>>,
    ) -> Result<Self, Error> {
        let credentials = Credentials::new(hostname, key_name, key, Scheme::from_ssl(ssl))?;
        let transport = match transport {
            Some(t) => t,
            None => Arc::new(default_http_client()?),
        };

        Ok(Self {
            credentials,
            transport,
            auth_source: auth_source.unwrap_or_else(|| Arc::new(SystemAuthSource)),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::builder()
            .hostname(config.hostname.as_str())
            .key_name(config.key_name.as_str())
            .key(config.key.as_bytes())
            .ssl(config.ssl)
            .build()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
